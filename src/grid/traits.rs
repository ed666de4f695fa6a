// Common traits and types for the reveal grid

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur during grid operations
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    InvalidDimensions { cols: usize, rows: usize },
    InvalidProgress(f32),
    ConfigurationError(String),
    IoError(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidDimensions { cols, rows } => {
                write!(f, "Invalid grid dimensions {}x{}, both must be at least 1", cols, rows)
            }
            GridError::InvalidProgress(progress) => {
                write!(f, "Invalid scroll progress {}", progress)
            }
            GridError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            GridError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

/// What a painting layer reads from a cell
pub trait CellDisplay {
    /// The symbol to paint
    fn display_char(&self) -> char;

    /// Whether the painter should show this cell at all
    fn is_visible(&self) -> bool;

    fn is_fixed(&self) -> bool {
        false
    }

    fn is_marker(&self) -> bool {
        false
    }

    fn is_drawn(&self) -> bool {
        false
    }
}
