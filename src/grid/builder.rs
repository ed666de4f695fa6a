// Grid builder - lays out fixed text, the marker word and digit filler for one epoch

use crate::config::{GridConfig, GridSpec};
use crate::grid::cell::Cell;
use crate::grid::traits::GridResult;
use log::{debug, warn};
use rand::Rng;

/// Random placement tries before falling back to a deterministic scan
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Where the marker word ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerPlacement {
    /// No marker word was requested
    Empty,
    Random {
        indices: Vec<usize>,
        orientation: Orientation,
    },
    Fallback {
        indices: Vec<usize>,
        orientation: Orientation,
    },
    /// No run of the word's length avoids the fixed text
    Unplaced,
}

impl MarkerPlacement {
    pub fn indices(&self) -> &[usize] {
        match self {
            MarkerPlacement::Random { indices, .. } | MarkerPlacement::Fallback { indices, .. } => {
                indices
            }
            MarkerPlacement::Empty | MarkerPlacement::Unplaced => &[],
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            MarkerPlacement::Random { orientation, .. }
            | MarkerPlacement::Fallback { orientation, .. } => Some(*orientation),
            MarkerPlacement::Empty | MarkerPlacement::Unplaced => None,
        }
    }
}

/// Result of building one epoch's grid
#[derive(Debug, Clone)]
pub struct GridBuild {
    pub cells: Vec<Cell>,
    pub placement: MarkerPlacement,
    /// Random placement tries consumed
    pub attempts: usize,
}

impl GridBuild {
    pub fn fallback_used(&self) -> bool {
        matches!(
            self.placement,
            MarkerPlacement::Fallback { .. } | MarkerPlacement::Unplaced
        )
    }

    pub fn marker_indices(&self) -> &[usize] {
        self.placement.indices()
    }
}

pub struct GridBuilder<'a> {
    config: GridConfig,
    spec: &'a GridSpec,
    max_attempts: usize,
}

impl<'a> GridBuilder<'a> {
    pub fn new(config: GridConfig, spec: &'a GridSpec) -> Self {
        Self {
            config,
            spec,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }

    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> GridResult<GridBuild> {
        self.config.validate()?;
        let total = self.config.cell_count();

        let mut fixed: Vec<Option<char>> = vec![None; total];
        for entry in &self.spec.fixed_text {
            match fixed.get_mut(entry.index) {
                Some(slot) if slot.is_none() => *slot = Some(entry.character),
                Some(_) => {
                    debug!("Duplicate fixed index {} ignored", entry.index);
                }
                None => warn!(
                    "Fixed character {:?} at index {} lies outside the {}x{} grid",
                    entry.character, entry.index, self.config.cols, self.config.rows
                ),
            }
        }

        let (placement, attempts) = self.place_marker(&fixed, rng);

        let mut marker: Vec<Option<char>> = vec![None; total];
        for (&idx, &ch) in placement.indices().iter().zip(&self.spec.marker_word) {
            marker[idx] = Some(ch);
        }

        let cells = (0..total)
            .map(|i| match (fixed[i], marker[i]) {
                (Some(ch), _) => Cell::fixed(i, ch),
                (None, Some(ch)) => Cell::marker(i, ch),
                (None, None) => Cell::new(i, random_digit(rng)),
            })
            .collect();

        Ok(GridBuild {
            cells,
            placement,
            attempts,
        })
    }

    fn place_marker<R: Rng + ?Sized>(
        &self,
        fixed: &[Option<char>],
        rng: &mut R,
    ) -> (MarkerPlacement, usize) {
        let len = self.spec.marker_word.len();
        if len == 0 {
            return (MarkerPlacement::Empty, 0);
        }

        let overlaps = |indices: &[usize]| indices.iter().any(|&i| fixed[i].is_some());
        let any_fit = self.fits(Orientation::Horizontal, len) || self.fits(Orientation::Vertical, len);

        let mut attempts = 0;
        while any_fit && attempts < self.max_attempts {
            attempts += 1;

            let mut orientation = if rng.gen_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if !self.fits(orientation, len) {
                orientation = orientation.flipped();
            }

            let (line, start) = match orientation {
                Orientation::Horizontal => (
                    rng.gen_range(0..self.config.rows),
                    rng.gen_range(0..=self.config.cols - len),
                ),
                Orientation::Vertical => (
                    rng.gen_range(0..self.config.cols),
                    rng.gen_range(0..=self.config.rows - len),
                ),
            };
            let indices = self.run(orientation, line, start, len);
            if !overlaps(&indices) {
                debug!(
                    "Marker placed {:?} at {:?} after {} attempt(s)",
                    orientation, indices, attempts
                );
                return (
                    MarkerPlacement::Random {
                        indices,
                        orientation,
                    },
                    attempts,
                );
            }
        }

        for (orientation, line, start) in self.fallback_candidates(len) {
            let indices = self.run(orientation, line, start, len);
            if !overlaps(&indices) {
                warn!(
                    "Marker placement fell back to {:?} at {:?} after {} attempt(s)",
                    orientation, indices, attempts
                );
                return (
                    MarkerPlacement::Fallback {
                        indices,
                        orientation,
                    },
                    attempts,
                );
            }
        }

        warn!(
            "Marker word of length {} does not fit a {}x{} grid without touching fixed text",
            len, self.config.cols, self.config.rows
        );
        (MarkerPlacement::Unplaced, attempts)
    }

    fn fits(&self, orientation: Orientation, len: usize) -> bool {
        match orientation {
            Orientation::Horizontal => len <= self.config.cols,
            Orientation::Vertical => len <= self.config.rows,
        }
    }

    /// Row 1 column 0 first, then every horizontal run, then every vertical run
    fn fallback_candidates(&self, len: usize) -> Vec<(Orientation, usize, usize)> {
        let GridConfig { cols, rows } = self.config;
        let mut candidates = Vec::new();

        if self.fits(Orientation::Horizontal, len) {
            if rows > 1 {
                candidates.push((Orientation::Horizontal, 1, 0));
            }
            for row in 0..rows {
                for col in 0..=cols - len {
                    candidates.push((Orientation::Horizontal, row, col));
                }
            }
        }
        if self.fits(Orientation::Vertical, len) {
            for col in 0..cols {
                for row in 0..=rows - len {
                    candidates.push((Orientation::Vertical, col, row));
                }
            }
        }
        candidates
    }

    /// `line` is the row for horizontal runs and the column for vertical ones
    fn run(&self, orientation: Orientation, line: usize, start: usize, len: usize) -> Vec<usize> {
        let cols = self.config.cols;
        (0..len)
            .map(|k| match orientation {
                Orientation::Horizontal => line * cols + start + k,
                Orientation::Vertical => (start + k) * cols + line,
            })
            .collect()
    }
}

/// Build a grid with the default placement budget
pub fn build_grid<R: Rng + ?Sized>(
    config: &GridConfig,
    spec: &GridSpec,
    rng: &mut R,
) -> GridResult<GridBuild> {
    GridBuilder::new(*config, spec).build(rng)
}

pub fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    (b'0' + rng.gen_range(0..10u8)) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::traits::GridError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_grid() {
        let config = GridConfig::new(10, 10);
        let spec = GridSpec::default();
        let a = build_grid(&config, &spec, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = build_grid(&config, &spec, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.placement, b.placement);
    }

    #[test]
    fn test_zero_attempts_uses_row_one_fallback() {
        let config = GridConfig::new(10, 10);
        let spec = GridSpec::default();
        let build = GridBuilder::new(config, &spec)
            .max_attempts(0)
            .build(&mut StdRng::seed_from_u64(1))
            .unwrap();

        assert!(build.fallback_used());
        assert_eq!(build.attempts, 0);
        assert_eq!(build.marker_indices(), &[10, 11, 12, 13, 14, 15]);
        assert_eq!(build.placement.orientation(), Some(Orientation::Horizontal));
        let word: String = build.marker_indices().iter().map(|&i| build.cells[i].character).collect();
        assert_eq!(word, "MULTI2");
    }

    #[test]
    fn test_fallback_skips_blocked_row_one() {
        // Fixed text covers the start of row 1, so the scan moves on
        let config = GridConfig::new(6, 3);
        let spec = GridSpec::new("", "ABC").with_fixed_text(vec![crate::config::FixedChar {
            index: 6,
            character: '=',
        }]);
        let build = GridBuilder::new(config, &spec)
            .max_attempts(0)
            .build(&mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(build.marker_indices(), &[0, 1, 2]);
        assert!(!build.marker_indices().contains(&6));
    }

    #[test]
    fn test_word_longer_than_grid_is_unplaced() {
        let config = GridConfig::new(3, 3);
        let spec = GridSpec::new("1+", "MULTI2");
        let build = build_grid(&config, &spec, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(build.placement, MarkerPlacement::Unplaced);
        assert_eq!(build.attempts, 0);
        assert_eq!(build.cells.len(), 9);
        assert!(build.cells.iter().all(|c| !c.marker));
    }

    #[test]
    fn test_word_only_fits_vertically() {
        let config = GridConfig::new(2, 8);
        let spec = GridSpec::new("", "MULTI2");
        for seed in 0..50 {
            let build = build_grid(&config, &spec, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(build.placement.orientation(), Some(Orientation::Vertical));
        }
    }

    #[test]
    fn test_out_of_range_fixed_index_dropped() {
        let config = GridConfig::new(2, 2);
        let spec = GridSpec::new("", "").with_fixed_text(vec![
            crate::config::FixedChar { index: 1, character: '+' },
            crate::config::FixedChar { index: 40, character: '=' },
        ]);
        let build = build_grid(&config, &spec, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(build.placement, MarkerPlacement::Empty);
        assert_eq!(build.cells.iter().filter(|c| c.fixed).count(), 1);
        assert_eq!(build.cells[1].character, '+');
    }

    #[test]
    fn test_zero_sized_grid_is_an_error() {
        let spec = GridSpec::default();
        let result = build_grid(&GridConfig::new(0, 5), &spec, &mut StdRng::seed_from_u64(0));
        assert_eq!(result.unwrap_err(), GridError::InvalidDimensions { cols: 0, rows: 5 });
    }

    #[test]
    fn test_filler_is_digits_and_cells_start_hidden() {
        let build = build_grid(
            &GridConfig::new(8, 8),
            &GridSpec::default(),
            &mut StdRng::seed_from_u64(11),
        )
        .unwrap();
        for cell in &build.cells {
            assert!(!cell.visible);
            assert!(!cell.drawn);
            if !cell.fixed && !cell.marker {
                assert!(cell.character.is_ascii_digit());
            }
        }
    }
}
