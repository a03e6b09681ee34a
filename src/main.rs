//! JobB - Job Application Board
//!
//! A terminal kanban board for tracking job applications. Applications move
//! through fixed hiring stages by drag-and-drop on wide terminals or by
//! stepping forward and back on narrow ones. Everything lives in memory for
//! the lifetime of the process.

use std::io;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use jobb::application::{App, AppMode, StoreScope};
use jobb::infrastructure::{logging, Config};
use jobb::presentation::{render_ui, InputHandler};

/// Entry point for the JobB terminal board.
///
/// Parses launch options, sets up logging and the terminal, creates the
/// application store at the root of the program and runs the event loop
/// until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    let _logging = logging::init(config.log_dir.as_deref());
    tracing::info!(?config, "starting jobb");

    let scope = StoreScope::new();
    let mut app = App::new(scope.handle(), config.settings());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if config.mouse_enabled() {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "event loop failed");
        println!("{err:?}");
    }

    tracing::info!(applications = app.store.len(), "exiting, board discarded");
    Ok(())
}

/// Main application event loop.
///
/// Each event is handled to completion before the next frame is drawn.
/// Continues running until the user presses 'q' on the board.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.update_viewport_size(size.width, size.height);
        terminal.draw(|f| render_ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') if app.mode == AppMode::Normal && app.dragging.is_none() => {
                    return Ok(());
                }
                _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
            },
            Event::Mouse(mouse) => InputHandler::handle_mouse_event(app, mouse),
            Event::Resize(width, height) => app.update_viewport_size(width, height),
            _ => {}
        }
    }
}
