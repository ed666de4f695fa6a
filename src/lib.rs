//! Grid reveal engine for generative hero sections.
//!
//! A rectangular grid of character cells is seeded with fixed literal text,
//! a marker word and digit filler, then revealed by a timer stagger, by
//! scroll progress, or by pointer drawing.

pub mod config;
pub mod display;
pub mod engine;
pub mod grid;

pub use config::{GridConfig, GridSpec, RevealSettings, ScrollConfig};
pub use engine::GridEngine;
pub use grid::{
    apply_scroll_progress, build_grid, draw_at_index, schedule_stagger_reveal, Cell, CellDisplay,
    DrawMode, DrawOutcome, GridBuild, GridError, GridResult, MarkerPlacement, Orientation,
    RevealEvent, StaggerSchedule,
};
