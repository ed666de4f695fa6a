// Dynamic grid configuration
use crate::grid::traits::{GridError, GridResult};

/// Grid dimensions for one epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridConfig {
    pub cols: usize,
    pub rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 12, // Default grid size
            rows: 8,
        }
    }
}

impl GridConfig {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Derive the grid from a canvas size and a minimum cell edge (in the same units).
    /// Always yields at least a 1x1 grid.
    pub fn from_viewport(width: f32, height: f32, min_cell_size: f32) -> Self {
        if !(min_cell_size > 0.0) {
            return Self::new(1, 1);
        }
        Self {
            cols: Self::fit(width, min_cell_size),
            rows: Self::fit(height, min_cell_size),
        }
    }

    /// Derive the grid from square cells sized as a fraction of the shorter canvas side.
    pub fn from_viewport_fraction(width: f32, height: f32, fraction: f32) -> Self {
        let cell = width.min(height) * fraction;
        Self::from_viewport(width, height, cell)
    }

    fn fit(length: f32, cell: f32) -> usize {
        let count = (length / cell).floor();
        if count.is_finite() && count >= 1.0 {
            count as usize
        } else {
            1
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn validate(&self) -> GridResult<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(GridError::InvalidDimensions {
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(())
    }

    /// Row-major (row, col) for a cell index
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}
