//! Tests for grid construction and marker placement
use rand::rngs::StdRng;
use rand::SeedableRng;
use reveal_grid::config::FixedChar;
use reveal_grid::grid::builder::GridBuilder;
use reveal_grid::{build_grid, GridConfig, GridSpec, MarkerPlacement, Orientation};

fn spec_1_plus_1() -> GridSpec {
    GridSpec::new("", "MULTI2").with_fixed_text(vec![
        FixedChar { index: 0, character: '1' },
        FixedChar { index: 1, character: '+' },
        FixedChar { index: 2, character: '1' },
        FixedChar { index: 3, character: '=' },
    ])
}

/// Contiguous in one row or one column, in the reported orientation
fn assert_contiguous(indices: &[usize], cols: usize, orientation: Orientation) {
    for pair in indices.windows(2) {
        match orientation {
            Orientation::Horizontal => {
                assert_eq!(pair[1], pair[0] + 1);
                assert_eq!(pair[0] / cols, pair[1] / cols, "run wraps rows: {:?}", indices);
            }
            Orientation::Vertical => assert_eq!(pair[1], pair[0] + cols),
        }
    }
}

#[test]
fn test_cell_count_and_unique_indices() {
    let spec = GridSpec::default();
    for (cols, rows) in [(1, 1), (1, 7), (7, 1), (6, 6), (13, 4), (30, 20)] {
        let config = GridConfig::new(cols, rows);
        let build = build_grid(&config, &spec, &mut StdRng::seed_from_u64(cols as u64 * 31 + rows as u64)).unwrap();
        assert_eq!(build.cells.len(), cols * rows);
        for (i, cell) in build.cells.iter().enumerate() {
            assert_eq!(cell.index, i);
        }
    }
}

#[test]
fn test_fixed_text_survives_every_seed() {
    let config = GridConfig::new(10, 10);
    let spec = spec_1_plus_1();
    for seed in 0..200 {
        let build = build_grid(&config, &spec, &mut StdRng::seed_from_u64(seed)).unwrap();
        let fixed: String = build.cells[..4].iter().map(|c| c.character).collect();
        assert_eq!(fixed, "1+1=");
        assert!(build.cells[..4].iter().all(|c| c.fixed && !c.marker));
        assert_eq!(build.cells.iter().filter(|c| c.fixed).count(), 4);
    }
}

#[test]
fn test_marker_never_overlaps_fixed_over_1000_builds() {
    let config = GridConfig::new(10, 10);
    let spec = spec_1_plus_1();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for _ in 0..1000 {
        let build = build_grid(&config, &spec, &mut rng).unwrap();
        let indices = build.marker_indices();
        assert_eq!(indices.len(), 6);
        assert!(indices.iter().all(|&i| i >= 4), "overlap: {:?}", indices);

        let orientation = build.placement.orientation().unwrap();
        assert_contiguous(indices, config.cols, orientation);

        let word: String = indices.iter().map(|&i| build.cells[i].character).collect();
        assert_eq!(word, "MULTI2");
        assert_eq!(build.cells.iter().filter(|c| c.marker).count(), 6);
    }
}

#[test]
fn test_both_orientations_occur() {
    let config = GridConfig::new(10, 10);
    let spec = spec_1_plus_1();
    let mut rng = StdRng::seed_from_u64(99);
    let mut horizontal = 0;
    let mut vertical = 0;
    for _ in 0..200 {
        match build_grid(&config, &spec, &mut rng).unwrap().placement.orientation() {
            Some(Orientation::Horizontal) => horizontal += 1,
            Some(Orientation::Vertical) => vertical += 1,
            None => panic!("marker should always fit a 10x10 grid"),
        }
    }
    assert!(horizontal > 50 && vertical > 50, "{} / {}", horizontal, vertical);
}

#[test]
fn test_fallback_is_reported_and_clear_of_fixed_text() {
    let config = GridConfig::new(8, 4);
    let spec = GridSpec::new("1+1=", "MULTI2");
    let build = GridBuilder::new(config, &spec)
        .max_attempts(0)
        .build(&mut StdRng::seed_from_u64(5))
        .unwrap();
    assert!(build.fallback_used());
    assert!(matches!(build.placement, MarkerPlacement::Fallback { .. }));
    assert_eq!(build.marker_indices(), &[8, 9, 10, 11, 12, 13]);
}

#[test]
fn test_single_row_grid_falls_back_past_fixed_text() {
    // One row: the run must start after the fixed text
    let config = GridConfig::new(10, 1);
    let spec = GridSpec::new("1+1=", "MULTI2");
    let build = GridBuilder::new(config, &spec)
        .max_attempts(0)
        .build(&mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(build.marker_indices(), &[4, 5, 6, 7, 8, 9]);
}

#[test]
fn test_fully_blocked_grid_is_unplaced_not_a_panic() {
    // Every row and column of a 3x3 grid crosses the diagonal
    let config = GridConfig::new(3, 3);
    let spec = GridSpec::new("", "ABC").with_fixed_text(vec![
        FixedChar { index: 0, character: '1' },
        FixedChar { index: 4, character: '+' },
        FixedChar { index: 8, character: '=' },
    ]);
    let build = build_grid(&config, &spec, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(build.placement, MarkerPlacement::Unplaced);
    assert_eq!(build.attempts, 100);
    assert!(build.fallback_used());
    assert_eq!(build.cells.len(), 9);
}
