// Scroll-linked reveal - per-tick Bernoulli draw-in and fade-out driven by scroll progress
//
// Outcomes are random per tick and only meant for the visual "static" effect.
// Nothing should rely on which cells flip on a given sample.

use crate::config::ScrollConfig;
use crate::grid::cell::Cell;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    DrawIn,
    Hold,
    FadeOut,
}

/// Cells flipped by one sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollStats {
    pub shown: usize,
    pub hidden: usize,
}

impl ScrollStats {
    pub fn changed(&self) -> usize {
        self.shown + self.hidden
    }
}

/// Clamp to [0, 1]; NaN has no meaning as a scroll position
pub fn normalize_progress(progress: f32) -> Option<f32> {
    if progress.is_nan() {
        None
    } else {
        Some(progress.clamp(0.0, 1.0))
    }
}

pub fn phase_for(progress: f32, config: &ScrollConfig) -> ScrollPhase {
    if progress < config.draw_in_threshold {
        ScrollPhase::DrawIn
    } else if progress >= config.fade_out_threshold {
        ScrollPhase::FadeOut
    } else {
        ScrollPhase::Hold
    }
}

pub fn draw_in_probability(progress: f32, config: &ScrollConfig) -> f64 {
    if progress < config.draw_in_threshold {
        (progress * config.draw_in_rate).clamp(0.0, 1.0) as f64
    } else {
        0.0
    }
}

pub fn fade_out_probability(progress: f32, config: &ScrollConfig) -> f64 {
    if progress >= config.fade_out_threshold {
        ((progress - config.fade_out_threshold) * config.fade_out_rate).clamp(0.0, 1.0) as f64
    } else {
        0.0
    }
}

/// Whether a cell could change at this progress (ignores the dice)
pub fn is_eligible(cell: &Cell, progress: f32, config: &ScrollConfig) -> bool {
    let draw_in = draw_in_probability(progress, config) > 0.0 && !cell.visible && !cell.drawn;
    let fade_out = fade_out_probability(progress, config) > 0.0 && cell.visible;
    draw_in || fade_out
}

fn roll<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    p > 0.0 && rng.gen_bool(p)
}

pub fn apply_scroll_progress_in_place<R: Rng + ?Sized>(
    cells: &mut [Cell],
    progress: f32,
    config: &ScrollConfig,
    rng: &mut R,
) -> ScrollStats {
    let mut stats = ScrollStats::default();
    let Some(progress) = normalize_progress(progress) else {
        return stats;
    };

    let p_in = draw_in_probability(progress, config);
    let p_out = fade_out_probability(progress, config);
    if p_in <= 0.0 && p_out <= 0.0 {
        return stats;
    }

    for cell in cells.iter_mut() {
        if !cell.visible && !cell.drawn && roll(rng, p_in) {
            cell.visible = true;
            cell.drawn = true;
            stats.shown += 1;
            continue;
        }
        if cell.visible && roll(rng, p_out) {
            cell.visible = false;
            cell.drawn = true;
            stats.hidden += 1;
        }
    }
    stats
}

/// Pure form: returns the transformed cells and leaves the input alone
pub fn apply_scroll_progress<R: Rng + ?Sized>(
    cells: &[Cell],
    progress: f32,
    config: &ScrollConfig,
    rng: &mut R,
) -> Vec<Cell> {
    let mut next = cells.to_vec();
    apply_scroll_progress_in_place(&mut next, progress, config, rng);
    next
}

/// Drops repeated samples so a re-delivered value doesn't roll the dice twice
#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    last: Option<f32>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized progress if it differs from the previous sample
    pub fn sample(&mut self, progress: f32) -> Option<f32> {
        let progress = normalize_progress(progress)?;
        if self.last == Some(progress) {
            return None;
        }
        self.last = Some(progress);
        Some(progress)
    }

    pub fn last(&self) -> Option<f32> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Opacity window over scroll progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeWindow {
    pub start: f32,
    pub end: f32,
}

/// Drawn cells fade out first
pub const DRAWN_FADE: FadeWindow = FadeWindow {
    start: 0.01,
    end: 0.1,
};
pub const UNDRAWN_FADE: FadeWindow = FadeWindow {
    start: 0.06,
    end: 0.2,
};

impl FadeWindow {
    /// 1 before the window, cubic ease to 0 across it
    pub fn opacity(&self, progress: f32) -> f32 {
        if progress <= self.start {
            return 1.0;
        }
        // Zero-width window is a hard cut at `start`
        if self.end <= self.start {
            return 0.0;
        }
        let t = ((progress - self.start) / (self.end - self.start)).min(1.0);
        (1.0 - t).powi(3)
    }
}

/// Painter-side opacity for a cell at a scroll position
pub fn scroll_opacity(cell: &Cell, progress: f32) -> f32 {
    if cell.drawn {
        DRAWN_FADE.opacity(progress)
    } else {
        UNDRAWN_FADE.opacity(progress)
    }
}

/// Opacity to paint a cell at, or `None` when the cell is hidden.
/// Visibility is the reveal state alone; the fade curve only dims.
pub fn paint_opacity(cell: &Cell, progress: f32) -> Option<f32> {
    cell.visible.then(|| scroll_opacity(cell, progress))
}
