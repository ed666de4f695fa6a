// Pointer drawing - turns filler cells into marker letters under a drag gesture

use crate::grid::builder::Orientation;
use crate::grid::cell::Cell;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Most cells a single splash may claim
pub const SPLASH_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A straight run spelling the word from the pointer cell
    Sequential {
        orientation: Orientation,
        indices: Vec<usize>,
    },
    /// Random claim of the pointer cell and its neighbours
    Splash { indices: Vec<usize> },
    Toggled { index: usize },
    Noop,
}

impl DrawOutcome {
    /// Cells written by this draw
    pub fn indices(&self) -> &[usize] {
        match self {
            DrawOutcome::Sequential { indices, .. } | DrawOutcome::Splash { indices } => indices,
            DrawOutcome::Toggled { index } => std::slice::from_ref(index),
            DrawOutcome::Noop => &[],
        }
    }
}

/// Grid geometry and word shared by every event of a gesture
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub cols: usize,
    pub word: &'a [char],
    pub sequential_chance: f64,
}

fn sequential_run(
    cells: &[Cell],
    index: usize,
    cols: usize,
    len: usize,
    orientation: Orientation,
) -> Option<Vec<usize>> {
    let indices: Vec<usize> = match orientation {
        // Horizontal runs stay on the pointer's row
        Orientation::Horizontal if index % cols + len > cols => return None,
        Orientation::Horizontal => (0..len).map(|k| index + k).collect(),
        Orientation::Vertical => (0..len).map(|k| index + k * cols).collect(),
    };
    let valid = indices
        .iter()
        .all(|&i| cells.get(i).map_or(false, Cell::is_drawable));
    valid.then_some(indices)
}

/// The cell itself followed by its in-bounds Moore neighbours
fn neighbourhood(index: usize, cols: usize, len: usize) -> Vec<usize> {
    let row = (index / cols) as isize;
    let col = (index % cols) as isize;
    let mut out = vec![index];
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let (r, c) = (row + dr, col + dc);
            if r < 0 || c < 0 || c >= cols as isize {
                continue;
            }
            let idx = r as usize * cols + c as usize;
            if idx < len {
                out.push(idx);
            }
        }
    }
    out
}

pub fn draw_at_index_in_place<R: Rng + ?Sized>(
    cells: &mut [Cell],
    index: usize,
    ctx: &DrawContext<'_>,
    rng: &mut R,
) -> DrawOutcome {
    let word = ctx.word;
    if ctx.cols == 0 || word.is_empty() || index >= cells.len() {
        return DrawOutcome::Noop;
    }

    if ctx.sequential_chance > 0.0 && rng.gen_bool(ctx.sequential_chance.min(1.0)) {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            if let Some(indices) = sequential_run(cells, index, ctx.cols, word.len(), orientation) {
                for (&i, &ch) in indices.iter().zip(word) {
                    cells[i].draw(ch);
                }
                return DrawOutcome::Sequential {
                    orientation,
                    indices,
                };
            }
        }
    }

    let mut eligible: Vec<usize> = neighbourhood(index, ctx.cols, cells.len())
        .into_iter()
        .filter(|&i| cells[i].is_drawable())
        .collect();
    if eligible.is_empty() {
        return DrawOutcome::Noop;
    }
    eligible.shuffle(rng);
    eligible.truncate(SPLASH_LIMIT);
    for (k, &i) in eligible.iter().enumerate() {
        cells[i].draw(word[k % word.len()]);
    }
    DrawOutcome::Splash { indices: eligible }
}

/// Pure form of a single pointer draw
pub fn draw_at_index<R: Rng + ?Sized>(
    cells: &[Cell],
    index: usize,
    cols: usize,
    word: &[char],
    sequential_chance: f64,
    rng: &mut R,
) -> (Vec<Cell>, DrawOutcome) {
    let mut next = cells.to_vec();
    let ctx = DrawContext {
        cols,
        word,
        sequential_chance,
    };
    let outcome = draw_at_index_in_place(&mut next, index, &ctx, rng);
    (next, outcome)
}

/// Flip a cell between its filler and the word letter for its position
pub fn toggle_at_index(cells: &mut [Cell], index: usize, word: &[char]) -> bool {
    if word.is_empty() {
        return false;
    }
    match cells.get_mut(index) {
        Some(cell) if !cell.fixed => {
            if cell.drawn {
                cell.character = cell.filler;
                cell.drawn = false;
            } else {
                cell.draw(word[index % word.len()]);
            }
            true
        }
        _ => false,
    }
}

/// Pre-draw `count` random filler cells with successive word letters
pub fn splatter<R: Rng + ?Sized>(
    cells: &mut [Cell],
    word: &[char],
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    if word.is_empty() {
        return Vec::new();
    }
    let candidates: Vec<usize> = cells
        .iter()
        .filter(|c| c.is_drawable() && !c.marker)
        .map(|c| c.index)
        .collect();
    let chosen: Vec<usize> = candidates.choose_multiple(rng, count).copied().collect();
    for (k, &i) in chosen.iter().enumerate() {
        cells[i].draw(word[k % word.len()]);
    }
    chosen
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Paint,
    Toggle,
}

/// Tracks one press-drag-release gesture
#[derive(Debug, Clone, Default)]
pub struct DrawGesture {
    mode: DrawMode,
    held: bool,
    last: Option<usize>,
    toggled: HashSet<usize>,
}

impl DrawGesture {
    pub fn new(mode: DrawMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
        self.pointer_up();
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn pointer_down<R: Rng + ?Sized>(
        &mut self,
        cells: &mut [Cell],
        index: usize,
        ctx: &DrawContext<'_>,
        rng: &mut R,
    ) -> DrawOutcome {
        self.held = true;
        self.toggled.clear();
        self.last = None;
        self.hit(cells, index, ctx, rng)
    }

    /// Only draws while held, and only once per newly entered cell
    pub fn pointer_enter<R: Rng + ?Sized>(
        &mut self,
        cells: &mut [Cell],
        index: usize,
        ctx: &DrawContext<'_>,
        rng: &mut R,
    ) -> DrawOutcome {
        if !self.held || self.last == Some(index) {
            return DrawOutcome::Noop;
        }
        self.hit(cells, index, ctx, rng)
    }

    pub fn pointer_up(&mut self) {
        self.held = false;
        self.last = None;
        self.toggled.clear();
    }

    fn hit<R: Rng + ?Sized>(
        &mut self,
        cells: &mut [Cell],
        index: usize,
        ctx: &DrawContext<'_>,
        rng: &mut R,
    ) -> DrawOutcome {
        self.last = Some(index);
        match self.mode {
            DrawMode::Paint => draw_at_index_in_place(cells, index, ctx, rng),
            DrawMode::Toggle => {
                if self.toggled.contains(&index) {
                    return DrawOutcome::Noop;
                }
                if toggle_at_index(cells, index, ctx.word) {
                    self.toggled.insert(index);
                    DrawOutcome::Toggled { index }
                } else {
                    DrawOutcome::Noop
                }
            }
        }
    }
}
