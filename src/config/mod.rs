// Configuration module - grid dimensions and reveal tuning
pub mod grid_config;
pub mod reveal_config;

pub use grid_config::GridConfig;
pub use reveal_config::{
    DrawConfig, FixedChar, GridSpec, RevealOrder, RevealSettings, ScrollConfig, StaggerConfig,
    DEFAULT_FIXED_TEXT, DEFAULT_MARKER_WORD,
};
