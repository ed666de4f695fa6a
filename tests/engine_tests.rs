//! Tests for the grid engine's epoch handling and event routing
use reveal_grid::config::{DrawConfig, RevealOrder, StaggerConfig};
use reveal_grid::grid::paint_opacity;
use reveal_grid::{DrawMode, DrawOutcome, GridConfig, GridEngine, RevealEvent, RevealSettings};
use std::time::Duration;

fn engine(seed: u64) -> GridEngine {
    GridEngine::with_seed(GridConfig::new(10, 10), RevealSettings::default(), seed).unwrap()
}

#[test]
fn test_tick_follows_stagger_delay() {
    let mut engine = engine(1);
    // default 25ms delay: reveals at 0, 25, 50, 75, 100
    assert_eq!(engine.tick(Duration::from_millis(100)), 5);
    assert_eq!(engine.visible_count(), 5);
    assert_eq!(engine.tick(Duration::from_millis(100)), 0);

    let span = engine.schedule().total_duration();
    assert_eq!(span, Duration::from_millis(25 * 99));
    engine.tick(span);
    assert_eq!(engine.visible_count(), 100);
}

#[test]
fn test_resize_discards_state_and_drops_stale_events() {
    let mut engine = engine(2);
    let stale: Vec<RevealEvent> = engine.take_due(Duration::from_millis(200));
    assert_eq!(stale.len(), 9);
    let old_handle = engine.cancel_handle();

    assert!(engine.resize(GridConfig::new(6, 4)).unwrap());
    assert_eq!(engine.epoch(), 2);
    assert!(old_handle.is_cancelled());
    assert_eq!(engine.cells().len(), 24);
    assert_eq!(engine.visible_count(), 0);

    for event in stale {
        assert!(!engine.apply_event(event));
    }
    assert_eq!(engine.visible_count(), 0);

    // The new epoch has its own full schedule
    assert_eq!(engine.schedule().pending(), 24);
    assert_eq!(engine.schedule().epoch(), 2);
}

#[test]
fn test_current_epoch_events_apply() {
    let mut engine = engine(3);
    let events = engine.take_due(Duration::from_millis(50));
    assert_eq!(events.len(), 3);
    for event in events {
        assert!(engine.apply_event(event));
    }
    assert_eq!(engine.visible_count(), 3);
}

#[test]
fn test_cancel_handle_stops_ticks() {
    let mut engine = engine(4);
    engine.tick(Duration::from_millis(30));
    engine.cancel_handle().cancel();
    assert_eq!(engine.tick(Duration::from_secs(30)), 0);
    assert_eq!(engine.visible_count(), 2);
}

#[test]
fn test_repeated_scroll_sample_is_ignored() {
    let mut engine = engine(5);
    engine.tick(Duration::from_secs(10));
    let first = engine.scroll(1.0).unwrap();
    assert!(first.hidden > 0);
    let visible = engine.visible_count();

    let repeat = engine.scroll(1.0).unwrap();
    assert_eq!(repeat.changed(), 0);
    assert_eq!(engine.visible_count(), visible);
}

#[test]
fn test_drag_draws_only_while_held() {
    let mut engine = engine(6);
    assert_eq!(engine.pointer_enter(55), DrawOutcome::Noop);

    let down = engine.pointer_down(55);
    assert!(!down.indices().is_empty());
    assert!(engine.is_drawing());
    let drawn = engine.drawn_count();

    // Re-entering the same cell is not a new hit
    assert_eq!(engine.pointer_enter(55), DrawOutcome::Noop);
    assert_eq!(engine.drawn_count(), drawn);

    engine.pointer_enter(77);
    assert!(engine.drawn_count() > drawn);

    engine.pointer_up();
    assert!(!engine.is_drawing());
    let after_up = engine.drawn_count();
    assert_eq!(engine.pointer_enter(33), DrawOutcome::Noop);
    assert_eq!(engine.drawn_count(), after_up);
}

#[test]
fn test_toggle_mode_never_touches_fixed_text() {
    let mut engine = engine(7);
    engine.set_draw_mode(DrawMode::Toggle);
    assert_eq!(engine.pointer_down(0), DrawOutcome::Noop);
    for index in 1..9 {
        engine.pointer_enter(index);
    }
    engine.pointer_up();
    let fixed: String = engine.cells()[..4].iter().map(|c| c.character).collect();
    assert_eq!(fixed, "1+1=");
    assert!(engine.cells()[4..9].iter().all(|c| c.drawn));
}

#[test]
fn test_splatter_predraws_each_epoch() {
    let settings = RevealSettings {
        draw: DrawConfig {
            sequential_chance: 0.2,
            splatter_count: 6,
        },
        ..RevealSettings::default()
    };
    let mut engine = GridEngine::with_seed(GridConfig::new(10, 10), settings, 8).unwrap();
    assert_eq!(engine.drawn_count(), 6);
    engine.rebuild().unwrap();
    assert_eq!(engine.epoch(), 2);
    assert_eq!(engine.drawn_count(), 6);
}

#[test]
fn test_invalid_settings_rejected() {
    let mut settings = RevealSettings::default();
    settings.scroll.fade_out_rate = -1.0;
    assert!(GridEngine::with_seed(GridConfig::new(4, 4), settings, 0).is_err());
}

#[test]
fn test_row_major_order_reveals_by_index() {
    let settings = RevealSettings {
        stagger: StaggerConfig {
            delay_ms: 10,
            order: RevealOrder::RowMajor,
        },
        ..RevealSettings::default()
    };
    let mut engine = GridEngine::with_seed(GridConfig::new(5, 5), settings, 9).unwrap();
    assert_eq!(engine.tick(Duration::from_millis(35)), 4);
    let visible: Vec<usize> = engine
        .cells()
        .iter()
        .filter(|c| c.visible)
        .map(|c| c.index)
        .collect();
    assert_eq!(visible, vec![0, 1, 2, 3]);

    // Rebuilds keep the configured order
    engine.resize(GridConfig::new(4, 4)).unwrap();
    assert_eq!(engine.schedule().order(), (0..16).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_fade_out_stays_visible_to_the_painter() {
    let mut engine = engine(5);
    engine.tick(Duration::from_secs(10));

    let mut progress = 0.0_f32;
    while progress < 0.32 {
        progress += 0.02;
        engine.scroll(progress).unwrap();
    }

    let painted = engine
        .cells()
        .iter()
        .filter(|c| paint_opacity(c, progress).is_some())
        .count();
    assert!(engine.visible_count() > 0);
    assert_eq!(painted, engine.visible_count());
}

#[test]
fn test_close_cell_dismisses_without_drawing() {
    let mut engine = engine(10);
    let close = engine.close_cell();
    assert_eq!(close, 9);

    engine.pointer_down(20);
    assert_eq!(engine.pointer_enter(close), DrawOutcome::Noop);
    assert!(!engine.cells()[close].drawn);
    engine.pointer_up();

    let drawn = engine.drawn_count();
    assert_eq!(engine.pointer_down(close), DrawOutcome::Noop);
    assert!(engine.is_dismissed());
    assert_eq!(engine.pointer_down(55), DrawOutcome::Noop);
    assert_eq!(engine.drawn_count(), drawn);

    // A new epoch brings the grid back
    engine.rebuild().unwrap();
    assert!(!engine.is_dismissed());
}
