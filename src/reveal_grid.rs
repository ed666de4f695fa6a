use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info};
use ratatui::{
    prelude::*,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use reveal_grid::config::RevealOrder;
use reveal_grid::grid::scroll::{paint_opacity, phase_for, ScrollPhase};
use reveal_grid::grid::stream::{SequenceStream, StreamTick};
use reveal_grid::{Cell, DrawMode, DrawOutcome, GridConfig, GridEngine, RevealSettings};
use std::{
    collections::VecDeque,
    io,
    time::{Duration, Instant},
};

const CELL_WIDTH: u16 = 3;
const SCROLL_STEP: f32 = 0.02;
const MAX_STATUS_ENTRIES: usize = 4;
const TICK_RATE: Duration = Duration::from_millis(16);
const CLOSE_GLYPH: char = '×';

struct AppState {
    engine: GridEngine,
    stream: SequenceStream,
    show_stream: bool,
    started: Instant,
    epoch_start: Instant,
    scroll_progress: f32,
    status: VecDeque<String>,
    should_quit: bool,
    show_help: bool,
}

impl AppState {
    fn new(engine: GridEngine) -> Self {
        let word: String = engine.settings().spec.marker_word.iter().collect();
        let stream = SequenceStream::new(engine.config(), &word, engine.settings().stagger.delay());
        Self {
            engine,
            stream,
            show_stream: false,
            started: Instant::now(),
            epoch_start: Instant::now(),
            scroll_progress: 0.0,
            status: VecDeque::new(),
            should_quit: false,
            show_help: false,
        }
    }

    fn add_status(&mut self, message: String) {
        self.status.push_back(message);
        if self.status.len() > MAX_STATUS_ENTRIES {
            self.status.pop_front();
        }
    }

    fn restart_epoch(&mut self) {
        self.epoch_start = Instant::now();
        self.scroll_progress = 0.0;
        let placement = if self.engine.fallback_used() {
            "fallback"
        } else {
            "random"
        };
        self.add_status(format!(
            "Epoch {}: {}x{} grid, marker placed at {} position",
            self.engine.epoch(),
            self.engine.config().cols,
            self.engine.config().rows,
            placement
        ));
    }

    fn resize(&mut self, width: u16, height: u16) {
        match self.engine.resize(grid_config_for(width, height)) {
            Ok(true) => {
                self.stream.resize(self.engine.config());
                self.restart_epoch();
            }
            Ok(false) => {}
            Err(e) => {
                error!("Resize failed: {}", e);
                self.add_status(format!("Resize failed: {}", e));
            }
        }
    }

    fn rebuild(&mut self) {
        match self.engine.rebuild() {
            Ok(()) => self.restart_epoch(),
            Err(e) => self.add_status(format!("Rebuild failed: {}", e)),
        }
    }

    fn scroll_by(&mut self, delta: f32) {
        self.scroll_progress = (self.scroll_progress + delta).clamp(0.0, 1.0);
        match self.engine.scroll(self.scroll_progress) {
            Ok(stats) if stats.changed() > 0 => {
                debug!(
                    "Scroll {:.2}: {} shown, {} hidden",
                    self.scroll_progress, stats.shown, stats.hidden
                );
            }
            Ok(_) => {}
            Err(e) => self.add_status(format!("Scroll rejected: {}", e)),
        }
    }

    fn toggle_stream(&mut self) {
        self.show_stream = !self.show_stream;
        let view = if self.show_stream { "sequence stream" } else { "grid" };
        self.add_status(format!("Showing the {}", view));
    }

    fn advance_stream(&mut self) {
        let now = self.started.elapsed();
        if let Some(StreamTick::Reset) = self.stream.advance(now, &mut rand::thread_rng()) {
            debug!("Sequence stream filled the grid and restarted");
        }
    }

    fn toggle_draw_mode(&mut self) {
        let mode = match self.engine.draw_mode() {
            DrawMode::Paint => DrawMode::Toggle,
            DrawMode::Toggle => DrawMode::Paint,
        };
        self.engine.set_draw_mode(mode);
        self.add_status(format!("Draw mode: {:?}", mode));
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        let was_dismissed = self.engine.is_dismissed();
        let index = cell_at(area, self.engine.config(), mouse.column, mouse.row);
        let outcome = match (mouse.kind, index) {
            (MouseEventKind::Down(MouseButton::Left), Some(i)) => self.engine.pointer_down(i),
            (MouseEventKind::Drag(MouseButton::Left), Some(i)) => self.engine.pointer_enter(i),
            (MouseEventKind::Up(MouseButton::Left), _) => {
                self.engine.pointer_up();
                DrawOutcome::Noop
            }
            (MouseEventKind::ScrollDown, _) => {
                self.scroll_by(SCROLL_STEP);
                DrawOutcome::Noop
            }
            (MouseEventKind::ScrollUp, _) => {
                self.scroll_by(-SCROLL_STEP);
                DrawOutcome::Noop
            }
            _ => DrawOutcome::Noop,
        };
        if let DrawOutcome::Sequential { orientation, .. } = outcome {
            self.add_status(format!("Drew the word {:?}", orientation));
        }
        if self.engine.is_dismissed() && !was_dismissed {
            self.add_status("Grid dismissed, 'r' starts a new epoch".to_string());
        }
    }
}

/// Grid that fits the grid pane of a terminal of this size
fn grid_config_for(width: u16, height: u16) -> GridConfig {
    // Borders take one cell on each side
    let pane = grid_pane(Rect::new(0, 0, width, height));
    let inner_width = pane.width.saturating_sub(2);
    let inner_height = pane.height.saturating_sub(2);
    GridConfig::new(
        ((inner_width / CELL_WIDTH) as usize).max(1),
        (inner_height as usize).max(1),
    )
}

fn main_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Grid area
            Constraint::Length(MAX_STATUS_ENTRIES as u16 + 2), // Status
        ])
        .split(area)
}

fn grid_pane(area: Rect) -> Rect {
    main_chunks(area)[1]
}

/// Map a terminal position inside the grid pane to a cell index
fn cell_at(area: Rect, config: &GridConfig, column: u16, row: u16) -> Option<usize> {
    let pane = grid_pane(area);
    let left = pane.x + 1;
    let top = pane.y + 1;
    if column < left || row < top {
        return None;
    }
    let col = ((column - left) / CELL_WIDTH) as usize;
    let row = (row - top) as usize;
    config.index(row, col)
}

fn cell_style(cell: &Cell, opacity: f32) -> Style {
    let style = if cell.fixed {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if cell.marker || cell.drawn {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::Green)
    };
    // Past the fade curve a visible cell is dimmed, never blanked
    if opacity < 0.5 {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Keep log output off the TUI unless RUST_LOG asks for it
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let mut settings = RevealSettings::default();
    let mut seed: Option<u64> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a file path")?;
                settings = RevealSettings::load_from_file(&path)?;
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a number")?;
                seed = Some(value.parse()?);
            }
            "--splash-only" => settings.draw.sequential_chance = 0.0,
            "--row-major" => settings.stagger.order = RevealOrder::RowMajor,
            "--print-config" => {
                println!("{}", settings.to_json_pretty()?);
                return Ok(());
            }
            "--splatter" => {
                let value = args.next().ok_or("--splatter needs a count")?;
                settings.draw.splatter_count = value.parse()?;
            }
            "help" | "--help" | "-h" => {
                show_help();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                show_help();
                return Ok(());
            }
        }
    }

    let (width, height) = crossterm::terminal::size()?;
    let config = grid_config_for(width, height);
    let engine = match seed {
        Some(seed) => GridEngine::with_seed(config, settings, seed)?,
        None => GridEngine::new(config, settings)?,
    };
    info!("Starting reveal grid at {}x{}", config.cols, config.rows);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(engine);
    app.restart_epoch();
    app.add_status("Drag to draw, scroll to fade, 'h' for help, 'q' to quit".to_string());

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_tick = Instant::now();

    loop {
        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let (width, height) = crossterm::terminal::size()?;
            let area = Rect::new(0, 0, width, height);
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                    KeyCode::Char('h') => app.show_help = !app.show_help,
                    KeyCode::Char('r') => app.rebuild(),
                    KeyCode::Char('t') => app.toggle_draw_mode(),
                    KeyCode::Char('s') => app.toggle_stream(),
                    KeyCode::Down | KeyCode::PageDown => app.scroll_by(SCROLL_STEP),
                    KeyCode::Up | KeyCode::PageUp => app.scroll_by(-SCROLL_STEP),
                    KeyCode::Home => app.scroll_by(-1.0),
                    _ => {}
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse, area),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.engine.tick(app.epoch_start.elapsed());
            if app.show_stream {
                app.advance_stream();
            }
            last_tick = Instant::now();
        }

        let state: &AppState = app;
        terminal.draw(|f| {
            render_main_ui(f, state);
            if state.show_help {
                render_help(f);
            }
        })?;

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render_main_ui(f: &mut Frame, app: &AppState) {
    let chunks = main_chunks(f.area());
    render_header(f, chunks[0], app);
    render_grid(f, chunks[1], app);
    render_status(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let engine = &app.engine;
    let phase = match phase_for(app.scroll_progress, &engine.settings().scroll) {
        ScrollPhase::DrawIn => "draw-in",
        ScrollPhase::Hold => "hold",
        ScrollPhase::FadeOut => "fade-out",
    };
    let line = Line::from(vec![
        Span::styled("Epoch ", Style::default().fg(Color::Cyan)),
        Span::raw(engine.epoch().to_string()),
        Span::styled("  Visible ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{}/{}", engine.visible_count(), engine.cells().len())),
        Span::styled("  Drawn ", Style::default().fg(Color::Cyan)),
        Span::raw(engine.drawn_count().to_string()),
        Span::styled("  Scroll ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{:.2} ({})", app.scroll_progress, phase)),
        Span::styled("  Mode ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{:?}", engine.draw_mode())),
        Span::raw(if engine.is_drawing() { " (drawing)" } else { "" }),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Reveal Grid"),
    );
    f.render_widget(header, area);
}

fn render_grid(f: &mut Frame, area: Rect, app: &AppState) {
    let engine = &app.engine;
    if engine.is_dismissed() {
        let notice = Paragraph::new("Grid dismissed. Press 'r' for a new epoch.")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(notice, area);
        return;
    }
    if app.show_stream {
        render_stream(f, area, app);
        return;
    }

    let config = engine.config();
    let lines: Vec<Line> = engine
        .cells()
        .chunks(config.cols)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| {
                    if engine.is_close_cell(cell.index) {
                        return Span::styled(
                            format!(" {} ", CLOSE_GLYPH),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        );
                    }
                    match paint_opacity(cell, app.scroll_progress) {
                        Some(opacity) => Span::styled(
                            format!(" {} ", cell.character),
                            cell_style(cell, opacity),
                        ),
                        None => Span::raw("   "),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let grid = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(grid, area);
}

fn render_stream(f: &mut Frame, area: Rect, app: &AppState) {
    let config = app.engine.config();
    let mut rows = vec![vec![' '; config.cols]; config.rows];
    for (position, &ch) in app.stream.text().iter().enumerate() {
        if let Some((row, col)) = SequenceStream::cell_at(position, config) {
            rows[row][col] = ch;
        }
    }
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|ch| {
                    let style = if ch.is_ascii_digit() {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::Black).bg(Color::White)
                    };
                    Span::styled(format!(" {} ", ch), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = format!(
        "Sequence {}/{} ({} words)",
        app.stream.len(),
        app.stream.capacity(),
        app.stream.word_count()
    );
    let stream = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(stream, area);
}

fn render_status(f: &mut Frame, area: Rect, app: &AppState) {
    let lines: Vec<Line> = app
        .status
        .iter()
        .map(|msg| Line::from(Span::raw(msg.as_str())))
        .collect();
    let status = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
    f.render_widget(status, area);
}

fn render_help(f: &mut Frame) {
    let area = centered_rect(60, 50, f.area());
    let text = vec![
        Line::from("Mouse drag     draw the marker word"),
        Line::from("Wheel / Up/Dn  move scroll progress"),
        Line::from("Home           scroll back to the top"),
        Line::from("t              switch paint / toggle drawing"),
        Line::from("s              show the sequence stream"),
        Line::from("top-right ×    dismiss the grid"),
        Line::from("r              rebuild the grid (new epoch)"),
        Line::from("h              close this help"),
        Line::from("q / Esc        quit"),
    ];
    let help = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn show_help() {
    println!("Usage: reveal_grid [options]");
    println!();
    println!("Options:");
    println!("  --config <file>   Load reveal settings from a JSON file");
    println!("  --seed <n>        Use a fixed random seed");
    println!("  --splash-only     Never draw straight runs");
    println!("  --splatter <n>    Pre-draw n marker letters on every build");
    println!("  --row-major       Reveal cells in index order instead of shuffled");
    println!("  --print-config    Print the effective settings as JSON and exit");
    println!("  help              Show this help message");
    println!();
    println!("Set RUST_LOG=debug to see placement and epoch logging.");
}
