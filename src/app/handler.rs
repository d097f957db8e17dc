//! Normal-mode action dispatch

use super::state::App;
use crate::config::Action;
use tracing::debug;

/// Apply a keybinding action to the app
///
/// Actions whose control is hidden in the current layout are ignored, the
/// same as clicking a control that is not drawn.
pub fn handle_action(app: &mut App, action: Action) {
    debug!(?action, "Handling action");
    match action {
        Action::RenameProject => {
            app.start_rename();
        }
        Action::AgentMenu => {
            app.selector.close_tools();
            app.selector.toggle_menu();
        }
        Action::ToolsPopover => {
            app.selector.close_menu();
            let selected = app.selected_agent_id.clone();
            app.selector.toggle_tools(selected.as_deref());
        }
        Action::ViewFiles => {
            if !app.is_compact() {
                app.toggle_files();
            }
        }
        Action::Share => {
            if !app.is_compact() {
                app.header.open_share();
            }
        }
        Action::ToggleSidePanel => app.toggle_side_panel(),
        Action::Usage => {
            let usage = app.usage();
            app.header.activate_usage(&usage);
        }
        Action::OpenSidebar => {
            if app.is_compact() {
                app.sidebar_open = !app.sidebar_open;
            }
        }
        Action::RefreshAgents => app.request_agents_refresh(),
        Action::Help => app.help_open = true,
        Action::Quit => app.should_quit = true,
    }
}
