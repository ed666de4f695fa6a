// Display module for grid formatting and visualization
pub mod formatters;

pub use formatters::{format_cell, format_column_headers, format_row_prefix, print_epoch_header};

use crate::config::GridConfig;
use crate::grid::traits::CellDisplay;

/// Standard grid display configuration
#[derive(Debug, Clone)]
pub struct GridDisplayConfig {
    pub show_headers: bool,
    /// Print hidden cells' characters instead of a placeholder
    pub show_hidden: bool,
}

impl Default for GridDisplayConfig {
    fn default() -> Self {
        Self {
            show_headers: true,
            show_hidden: false,
        }
    }
}

/// Render a row-major cell sequence as text lines
pub fn render_grid_lines<C: CellDisplay>(
    cells: &[C],
    config: &GridConfig,
    display_config: &GridDisplayConfig,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(config.rows + 1);
    if display_config.show_headers {
        lines.push(format_column_headers(config.cols));
    }

    for row in 0..config.rows {
        let mut line = if display_config.show_headers {
            format_row_prefix(row)
        } else {
            String::new()
        };
        for col in 0..config.cols {
            match cells.get(row * config.cols + col) {
                Some(cell) => line.push_str(&format_cell(cell, display_config.show_hidden)),
                None => line.push_str(" ? "), // Fallback for a short cell sequence
            }
        }
        lines.push(line);
    }
    lines
}

/// Print the grid to stdout
pub fn display_grid<C: CellDisplay>(
    cells: &[C],
    config: &GridConfig,
    display_config: &GridDisplayConfig,
) {
    for line in render_grid_lines(cells, config, display_config) {
        println!("{}", line);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::cell::Cell;

    #[test]
    fn test_hidden_cells_render_as_dots() {
        let mut cells: Vec<Cell> = (0..4).map(|i| Cell::new(i, '5')).collect();
        cells[0] = Cell::fixed(0, '1');
        cells[0].visible = true;
        let config = GridConfig::new(2, 2);
        let lines = render_grid_lines(
            &cells,
            &config,
            &GridDisplayConfig {
                show_headers: false,
                show_hidden: false,
            },
        );
        assert_eq!(lines, vec!["[1] . ".to_string(), " .  . ".to_string()]);
    }

    #[test]
    fn test_headers_and_short_sequence() {
        let cells = vec![Cell::new(0, '3')];
        let config = GridConfig::new(2, 1);
        let lines = render_grid_lines(
            &cells,
            &config,
            &GridDisplayConfig {
                show_headers: true,
                show_hidden: true,
            },
        );
        assert_eq!(lines[0], "      0  1");
        assert_eq!(lines[1], " 0:  3  ? ");
    }
}
