// Display formatting utilities

use crate::config::GridConfig;
use crate::grid::traits::CellDisplay;

/// Format one cell as a three-column slot
pub fn format_cell<C: CellDisplay>(cell: &C, show_hidden: bool) -> String {
    if cell.is_visible() || show_hidden {
        if cell.is_fixed() {
            format!("[{}]", cell.display_char())
        } else if cell.is_marker() || cell.is_drawn() {
            format!("<{}>", cell.display_char())
        } else {
            format!(" {} ", cell.display_char())
        }
    } else {
        " . ".to_string()
    }
}

/// Column header line for a grid
pub fn format_column_headers(cols: usize) -> String {
    let mut line = String::from("    ");
    for col in 0..cols {
        line.push_str(&format!(" {:2}", col));
    }
    line
}

pub fn format_row_prefix(row: usize) -> String {
    format!("{:2}: ", row)
}

/// Header with epoch, size and how many cells are showing
pub fn print_epoch_header(epoch: u64, config: &GridConfig, visible: usize) {
    println!();
    println!(
        "=== EPOCH {} GRID ({} x {}) ===",
        epoch, config.cols, config.rows
    );
    println!("Visible cells: {}/{}", visible, config.cell_count());
}
