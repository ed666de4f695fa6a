// Grid module - cell layout plus the reveal processes that run over it
// Each reveal variant mutates the same cell sequence in its own way

pub mod builder;
pub mod cell;
pub mod draw;
pub mod scroll;
pub mod stagger;
pub mod stream;
pub mod traits;

pub use builder::{build_grid, GridBuild, GridBuilder, MarkerPlacement, Orientation};
pub use cell::Cell;
pub use draw::{draw_at_index, DrawContext, DrawGesture, DrawMode, DrawOutcome};
pub use scroll::{
    apply_scroll_progress, paint_opacity, scroll_opacity, ScrollPhase, ScrollStats, ScrollTracker,
};
pub use stagger::{
    schedule_ordered_reveal, schedule_reveal, schedule_stagger_reveal, CancelHandle, Epoch,
    RevealEvent, StaggerSchedule,
};
pub use stream::{SequenceStream, StreamTick};
pub use traits::{CellDisplay, GridError, GridResult};

pub use crate::config::{GridConfig, GridSpec};
