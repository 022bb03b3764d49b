use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use travel_map::app::{App, Focus, TICK_MS};
use travel_map::data::{self, DataError, DataSource, WorldData};
use travel_map::ui;

/// Terminal travel tracker: mark visited countries on a Braille world map
#[derive(Parser)]
#[command(name = "travel-map", version, about)]
struct Cli {
    /// Load a local GeoJSON FeatureCollection instead of fetching the atlas
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Override the world-atlas URL
    #[arg(long, value_name = "URL", default_value = data::WORLD_ATLAS_URL)]
    url: String,

    /// Write diagnostics to this file (RUST_LOG controls verbosity)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal owns stdout, so diagnostics go to a file, and only when
    // asked for
    if let Some(path) = &cli.log_file {
        let file = Arc::new(File::create(path)?);
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_writer(file)
            .with_ansi(false)
            .init();
    }

    let source = match cli.data {
        Some(path) => DataSource::File(path),
        None => DataSource::Url(cli.url),
    };

    // Kick off the one-shot geometry load before the UI comes up
    let (tx, rx) = mpsc::channel();
    data::spawn_load(source, tx);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, rx);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn run(terminal: &mut DefaultTerminal, rx: Receiver<Result<WorldData, DataError>>) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height);

    loop {
        // The load completes exactly once; afterwards the channel stays quiet
        if let Ok(loaded) = rx.try_recv() {
            match loaded {
                Ok(world) => app.on_world_loaded(world),
                Err(err) => app.on_world_failed(err),
            }
        }

        // Draw
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(TICK_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        handle_key(&mut app, key.code);
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width, height);
                }
                _ => {}
            }
        }

        // Advance splash and flight animations
        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode) {
    match app.focus {
        Focus::List => match code {
            KeyCode::Tab => app.focus = Focus::Map,
            KeyCode::Up => app.list.move_up(),
            KeyCode::Down => app.list.move_down(),
            KeyCode::Enter => app.toggle_cursor_row(),
            KeyCode::Backspace => app.list.backspace(),
            // Esc clears an active search before it quits
            KeyCode::Esc => {
                if app.list.search().is_empty() {
                    app.quit();
                } else {
                    app.list.clear_search();
                }
            }
            KeyCode::Char(c) => app.list.push_char(c),
            _ => {}
        },
        Focus::Map => match code {
            KeyCode::Tab | KeyCode::Char('/') => app.focus = Focus::List,
            KeyCode::Char('c') | KeyCode::Char('C') => app.cycle_color(),
            KeyCode::Char('e') | KeyCode::Char('E') => app.export(),
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            _ => {}
        },
    }
}

/// Route mouse events to whichever panel they land on
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.map_area.contains((mouse.column, mouse.row).into()) {
                app.focus = Focus::Map;
                app.click_map(mouse.column, mouse.row);
            } else if app.list_rows_area.contains((mouse.column, mouse.row).into()) {
                app.focus = Focus::List;
                app.click_list(mouse.row);
            }
        }
        // Wheel over the list moves the cursor
        MouseEventKind::ScrollUp => {
            if app.list_rows_area.contains((mouse.column, mouse.row).into()) {
                app.list.move_up();
            }
        }
        MouseEventKind::ScrollDown => {
            if app.list_rows_area.contains((mouse.column, mouse.row).into()) {
                app.list.move_down();
            }
        }
        _ => {}
    }
}
