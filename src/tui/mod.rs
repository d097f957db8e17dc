//! Terminal user interface for the thread header bar

pub mod input;
pub mod render;

use crate::app::{App, Event, Handler};
use anyhow::Result;
use ratatui::crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tracing::info;

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn to or restored
pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = Handler::new(app.config.poll_interval_ms);
    let result = run_loop(&mut terminal, &mut app, &event_handler);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &Handler,
) -> Result<()> {
    // Fetched on the first tick; the header shows the loading state until then
    app.start_loading();

    loop {
        app.viewport_width = terminal.size()?.width;
        terminal.draw(|frame| render::render(frame, app))?;
        app.run_post_render_effects();

        match event_handler.next()? {
            Event::Tick => app.tick(),
            Event::Key(key) => input::handle_key_event(app, key.code, key.modifiers),
            Event::Resize(width, _) => app.viewport_width = width,
            Event::FocusLost => input::handle_focus_lost(app),
        }

        if app.should_quit {
            break;
        }
    }

    app.apply_rename_completions();
    if app.renames_in_flight() > 0 {
        info!(pending = app.renames_in_flight(), "Exiting with renames in flight");
    }
    Ok(())
}
