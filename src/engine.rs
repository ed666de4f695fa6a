// Grid engine - owns one epoch's cells and routes timer, scroll and pointer events into them

use crate::config::{GridConfig, RevealSettings};
use crate::grid::builder::{GridBuilder, MarkerPlacement};
use crate::grid::cell::Cell;
use crate::grid::draw::{splatter, DrawContext, DrawGesture, DrawMode, DrawOutcome};
use crate::grid::scroll::{apply_scroll_progress_in_place, ScrollStats, ScrollTracker};
use crate::grid::stagger::{schedule_reveal, CancelHandle, Epoch, RevealEvent, StaggerSchedule};
use crate::grid::traits::{GridError, GridResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

pub struct GridEngine {
    config: GridConfig,
    settings: RevealSettings,
    cells: Vec<Cell>,
    placement: MarkerPlacement,
    attempts: usize,
    epoch: Epoch,
    schedule: StaggerSchedule,
    scroll: ScrollTracker,
    gesture: DrawGesture,
    dismissed: bool,
    rng: StdRng,
}

impl GridEngine {
    pub fn new(config: GridConfig, settings: RevealSettings) -> GridResult<Self> {
        Self::with_rng(config, settings, StdRng::from_entropy())
    }

    /// Deterministic engine for tests and replays
    pub fn with_seed(config: GridConfig, settings: RevealSettings, seed: u64) -> GridResult<Self> {
        Self::with_rng(config, settings, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GridConfig, settings: RevealSettings, rng: StdRng) -> GridResult<Self> {
        settings.validate()?;
        config.validate()?;
        let mut engine = Self {
            config,
            settings,
            cells: Vec::new(),
            placement: MarkerPlacement::Empty,
            attempts: 0,
            epoch: 0,
            schedule: StaggerSchedule::new(Vec::new(), Duration::ZERO, 0),
            scroll: ScrollTracker::new(),
            gesture: DrawGesture::default(),
            dismissed: false,
            rng,
        };
        engine.start_epoch()?;
        Ok(engine)
    }

    /// Tear down the current epoch and build a fresh one.
    /// Pending reveals are cancelled before anything new is scheduled.
    fn start_epoch(&mut self) -> GridResult<()> {
        self.schedule.cancel();

        let build = GridBuilder::new(self.config, &self.settings.spec).build(&mut self.rng)?;
        self.epoch += 1;
        self.cells = build.cells;
        self.placement = build.placement;
        self.attempts = build.attempts;

        if self.settings.draw.splatter_count > 0 {
            let drawn = splatter(
                &mut self.cells,
                &self.settings.spec.marker_word,
                self.settings.draw.splatter_count,
                &mut self.rng,
            );
            debug!("Pre-drew {} cells", drawn.len());
        }

        self.schedule = schedule_reveal(
            self.settings.stagger.order,
            self.cells.len(),
            self.settings.stagger.delay(),
            self.epoch,
            &mut self.rng,
        );
        self.scroll.reset();
        self.gesture.pointer_up();
        self.dismissed = false;

        info!(
            "Epoch {}: built {}x{} grid ({} cells, marker {:?})",
            self.epoch,
            self.config.cols,
            self.config.rows,
            self.cells.len(),
            self.placement.orientation()
        );
        Ok(())
    }

    /// Rebuild for new viewport dimensions; same dimensions keep the current epoch
    pub fn resize(&mut self, config: GridConfig) -> GridResult<bool> {
        config.validate()?;
        if config == self.config {
            return Ok(false);
        }
        debug!(
            "Resizing {}x{} -> {}x{}",
            self.config.cols, self.config.rows, config.cols, config.rows
        );
        self.config = config;
        self.start_epoch()?;
        Ok(true)
    }

    /// Rebuild at the current dimensions
    pub fn rebuild(&mut self) -> GridResult<()> {
        self.start_epoch()
    }

    /// Pop reveals due at `elapsed` (measured from the epoch start) without applying them
    pub fn take_due(&mut self, elapsed: Duration) -> Vec<RevealEvent> {
        self.schedule.due(elapsed)
    }

    /// Apply one reveal; events from an earlier epoch are dropped
    pub fn apply_event(&mut self, event: RevealEvent) -> bool {
        if event.epoch != self.epoch {
            debug!(
                "Dropping stale reveal for cell {} from epoch {} (current {})",
                event.index, event.epoch, self.epoch
            );
            return false;
        }
        match self.cells.get_mut(event.index) {
            Some(cell) => {
                cell.visible = true;
                true
            }
            None => false,
        }
    }

    /// Fire every stagger reveal due by `elapsed`; returns the number applied
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let events = self.take_due(elapsed);
        events
            .into_iter()
            .filter(|&event| self.apply_event(event))
            .count()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.schedule.cancel_handle()
    }

    /// Feed one scroll-progress sample; repeats of the last value are ignored
    pub fn scroll(&mut self, progress: f32) -> GridResult<ScrollStats> {
        if progress.is_nan() {
            return Err(GridError::InvalidProgress(progress));
        }
        let Some(progress) = self.scroll.sample(progress) else {
            return Ok(ScrollStats::default());
        };
        Ok(apply_scroll_progress_in_place(
            &mut self.cells,
            progress,
            &self.settings.scroll,
            &mut self.rng,
        ))
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.gesture.set_mode(mode);
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.gesture.mode()
    }

    /// Top-right cell; pressing it dismisses the grid
    pub fn close_cell(&self) -> usize {
        self.config.cols - 1
    }

    pub fn is_close_cell(&self, index: usize) -> bool {
        index == self.close_cell()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_held()
    }

    pub fn pointer_down(&mut self, index: usize) -> DrawOutcome {
        if self.dismissed {
            return DrawOutcome::Noop;
        }
        if self.is_close_cell(index) {
            info!("Close cell pressed, dismissing epoch {}", self.epoch);
            self.dismissed = true;
            self.gesture.pointer_up();
            return DrawOutcome::Noop;
        }
        let ctx = DrawContext {
            cols: self.config.cols,
            word: &self.settings.spec.marker_word,
            sequential_chance: self.settings.draw.sequential_chance,
        };
        self.gesture
            .pointer_down(&mut self.cells, index, &ctx, &mut self.rng)
    }

    pub fn pointer_enter(&mut self, index: usize) -> DrawOutcome {
        if self.dismissed || self.is_close_cell(index) {
            return DrawOutcome::Noop;
        }
        let ctx = DrawContext {
            cols: self.config.cols,
            word: &self.settings.spec.marker_word,
            sequential_chance: self.settings.draw.sequential_chance,
        };
        self.gesture
            .pointer_enter(&mut self.cells, index, &ctx, &mut self.rng)
    }

    pub fn pointer_up(&mut self) {
        self.gesture.pointer_up();
    }

    pub fn cell_index(&self, row: usize, col: usize) -> Option<usize> {
        self.config.index(row, col)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn settings(&self) -> &RevealSettings {
        &self.settings
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn placement(&self) -> &MarkerPlacement {
        &self.placement
    }

    pub fn placement_attempts(&self) -> usize {
        self.attempts
    }

    pub fn fallback_used(&self) -> bool {
        matches!(
            self.placement,
            MarkerPlacement::Fallback { .. } | MarkerPlacement::Unplaced
        )
    }

    pub fn schedule(&self) -> &StaggerSchedule {
        &self.schedule
    }

    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visible).count()
    }

    pub fn drawn_count(&self) -> usize {
        self.cells.iter().filter(|c| c.drawn).count()
    }
}
