//! Agent menu and tools popover key handling

use crate::app::App;
use crate::config::Action;
use ratatui::crossterm::event::{KeyCode, KeyModifiers};

/// Handle a key while the agent menu is open
pub fn handle_menu(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.selector.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.selector.cursor_down(),
        KeyCode::Enter => app.activate_menu_row(),
        KeyCode::Esc => app.selector.close_menu(),
        _ => {
            if app.config.keys.get_action(code, modifiers) == Some(Action::AgentMenu) {
                app.selector.close_menu();
            }
        }
    }
}

/// Handle a key while the tools popover is open
pub fn handle_tools(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if code == KeyCode::Esc
        || app.config.keys.get_action(code, modifiers) == Some(Action::ToolsPopover)
    {
        app.selector.close_tools();
    }
}
