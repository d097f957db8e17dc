//! Title edit field key handling

use crate::app::App;
use ratatui::crossterm::event::{KeyCode, KeyModifiers};

/// Handle a key while the title is being edited
///
/// Enter saves, Esc cancels and Tab saves while moving focus away, which is
/// how a terminal expresses blurring the field.
pub fn handle_title_edit(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Enter | KeyCode::Tab, _) => {
            app.commit_rename();
            return;
        }
        (KeyCode::Esc, _) => {
            app.cancel_rename();
            return;
        }
        _ => {}
    }

    let Some(input) = app.header.rename.input_mut() else {
        return;
    };
    match (code, modifiers) {
        (KeyCode::Char('w'), m) if m.contains(KeyModifiers::CONTROL) => input.delete_word(),
        (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => input.select_all(),
        (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
            input.select_all();
            input.backspace();
        }
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => input.insert_char(c),
        (KeyCode::Backspace, _) => input.backspace(),
        (KeyCode::Delete, _) => input.delete(),
        (KeyCode::Left, _) => input.cursor_left(),
        (KeyCode::Right, _) => input.cursor_right(),
        (KeyCode::Home, _) => input.cursor_home(),
        (KeyCode::End, _) => input.cursor_end(),
        _ => {}
    }
}
