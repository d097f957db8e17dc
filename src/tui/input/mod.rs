//! Mode-specific key handling
//!
//! Keys go to whichever surface is on top, see [`Mode`].

mod menu;
mod title;

use crate::app::{App, Mode, handle_action};
use ratatui::crossterm::event::{KeyCode, KeyModifiers};

/// Handle a key event based on the current mode
pub fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match app.mode() {
        Mode::Editing => title::handle_title_edit(app, code, modifiers),
        Mode::Help => app.help_open = false,
        Mode::Share => {
            if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
                app.header.close_share();
            }
        }
        Mode::Billing => match code {
            KeyCode::Enter => app.upgrade(),
            KeyCode::Esc | KeyCode::Char('q') => app.header.close_billing(),
            _ => {}
        },
        Mode::Menu => menu::handle_menu(app, code, modifiers),
        Mode::Tools => menu::handle_tools(app, code, modifiers),
        Mode::Normal => {
            if code == KeyCode::Esc {
                app.toasts.clear();
            } else if let Some(action) = app.config.keys.get_action(code, modifiers) {
                handle_action(app, action);
            }
        }
    }
}

/// Commit an open title edit when the terminal loses focus
pub fn handle_focus_lost(app: &mut App) {
    if app.mode() == Mode::Editing {
        app.commit_rename();
    }
}
