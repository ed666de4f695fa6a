// Simple grid walkthrough - prints each reveal stage of one epoch to stdout

use reveal_grid::display::{display_grid, print_epoch_header, GridDisplayConfig};
use reveal_grid::grid::stream::{SequenceStream, StreamTick};
use reveal_grid::{GridConfig, GridEngine, RevealSettings};
use std::time::Duration;

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = GridConfig::new(parse_arg(&args, 0, 12), parse_arg(&args, 1, 8));
    let seed: u64 = parse_arg(&args, 2, 2024);

    let settings = RevealSettings::default();
    let delay = settings.stagger.delay();
    let mut engine = GridEngine::with_seed(config, settings, seed)?;
    let display_config = GridDisplayConfig::default();

    println!("Reveal grid walkthrough (seed {})", seed);
    println!(
        "Marker placement: {:?} after {} attempt(s)",
        engine.placement(),
        engine.placement_attempts()
    );

    print_epoch_header(engine.epoch(), engine.config(), engine.visible_count());
    display_grid(
        engine.cells(),
        engine.config(),
        &GridDisplayConfig {
            show_hidden: true,
            ..GridDisplayConfig::default()
        },
    );

    // Stagger reveal: half way, then complete
    let span = engine.schedule().total_duration();
    for elapsed in [span / 2, span] {
        let fired = engine.tick(elapsed);
        println!("t = {:?}: {} reveal(s) fired", elapsed, fired);
        print_epoch_header(engine.epoch(), engine.config(), engine.visible_count());
        display_grid(engine.cells(), engine.config(), &display_config);
    }

    // Scroll past the fade-out threshold a few times
    for progress in [0.4_f32, 0.6, 0.9] {
        let stats = engine.scroll(progress)?;
        println!("scroll {:.1}: {} hidden", progress, stats.hidden);
    }
    display_grid(engine.cells(), engine.config(), &display_config);

    // Drag across the middle row
    let row = engine.config().rows / 2;
    if let Some(start) = engine.cell_index(row, 0) {
        engine.pointer_down(start);
        for col in 1..engine.config().cols {
            if let Some(index) = engine.cell_index(row, col) {
                engine.pointer_enter(index);
            }
        }
        engine.pointer_up();
    }
    println!("After dragging row {}: {} drawn cells", row, engine.drawn_count());
    display_grid(
        engine.cells(),
        engine.config(),
        &GridDisplayConfig {
            show_hidden: true,
            ..GridDisplayConfig::default()
        },
    );

    // Typed stream variant, one character per stagger delay
    let mut rng = rand::thread_rng();
    let mut stream = SequenceStream::new(engine.config(), "MULTI2", delay).with_word_target(2);
    let mut now = Duration::ZERO;
    let mut resets = 0;
    for _ in 0..40 {
        now += delay;
        if let Some(StreamTick::Reset) = stream.advance(now, &mut rng) {
            resets += 1;
        }
    }
    println!(
        "Stream after {:?} ({} reset(s), {} word(s)): {}",
        now,
        resets,
        stream.word_count(),
        stream.text().iter().collect::<String>()
    );

    Ok(())
}
