//! Keybinding configuration

use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start renaming the project
    RenameProject,
    /// Open the agent selector menu
    AgentMenu,
    /// Toggle the MCP tools popover
    ToolsPopover,
    /// Toggle the file browser
    ViewFiles,
    /// Open the share dialog
    Share,
    /// Toggle the side panel
    ToggleSidePanel,
    /// Activate the usage badge (opens billing when an upgrade applies)
    Usage,
    /// Open the sidebar (compact layout only)
    OpenSidebar,
    /// Refetch the agent list
    RefreshAgents,
    /// Show help
    Help,
    /// Quit application
    Quit,
}

/// Categories for grouping actions in help display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGroup {
    /// Thread header controls
    Thread,
    /// Agent selection
    Agents,
    /// Miscellaneous actions
    Other,
}

impl ActionGroup {
    /// Get the display title for this group
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Thread => "Thread",
            Self::Agents => "Agents",
            Self::Other => "Other",
        }
    }
}

impl Action {
    /// Get the display description for this action
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::RenameProject => "Rename project",
            Self::AgentMenu => "Choose agent",
            Self::ToolsPopover => "View MCP tools",
            Self::ViewFiles => "View files in task",
            Self::Share => "Share chat",
            Self::ToggleSidePanel => "Toggle computer preview",
            Self::Usage => "Usage and billing",
            Self::OpenSidebar => "Open sidebar",
            Self::RefreshAgents => "Reload agents",
            Self::Help => "Show this help",
            Self::Quit => "Quit",
        }
    }

    /// Get the group this action belongs to
    #[must_use]
    pub const fn group(self) -> ActionGroup {
        match self {
            Self::RenameProject
            | Self::ViewFiles
            | Self::Share
            | Self::ToggleSidePanel
            | Self::Usage
            | Self::OpenSidebar => ActionGroup::Thread,
            Self::AgentMenu | Self::ToolsPopover | Self::RefreshAgents => ActionGroup::Agents,
            Self::Help | Self::Quit => ActionGroup::Other,
        }
    }

    /// All actions in display order for help
    pub const ALL_FOR_HELP: &'static [Self] = &[
        // Thread
        Self::RenameProject,
        Self::ViewFiles,
        Self::Share,
        Self::ToggleSidePanel,
        Self::Usage,
        Self::OpenSidebar,
        // Agents
        Self::AgentMenu,
        Self::ToolsPopover,
        Self::RefreshAgents,
        // Other
        Self::Help,
        Self::Quit,
    ];
}

/// Keybinding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Map of key strings to actions (for serialization)
    bindings: HashMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert("r".to_string(), Action::RenameProject);
        bindings.insert("F2".to_string(), Action::RenameProject);
        bindings.insert("a".to_string(), Action::AgentMenu);
        bindings.insert("t".to_string(), Action::ToolsPopover);
        bindings.insert("f".to_string(), Action::ViewFiles);
        bindings.insert("s".to_string(), Action::Share);
        bindings.insert("p".to_string(), Action::ToggleSidePanel);
        bindings.insert("u".to_string(), Action::Usage);
        bindings.insert("m".to_string(), Action::OpenSidebar);
        bindings.insert("R".to_string(), Action::RefreshAgents);
        bindings.insert("?".to_string(), Action::Help);
        bindings.insert("q".to_string(), Action::Quit);
        bindings.insert("Ctrl+c".to_string(), Action::Quit);

        Self { bindings }
    }
}

impl KeyBindings {
    /// Bind every default key the loaded config leaves unbound
    pub fn merge_defaults(&mut self) {
        let defaults = Self::default();
        for (key, action) in defaults.bindings {
            self.bindings.entry(key).or_insert(action);
        }
    }

    /// Get the action for a key event
    #[must_use]
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let key_str = key_to_string(code, modifiers);
        self.bindings.get(&key_str).copied()
    }

    /// Set a keybinding
    pub fn set(&mut self, key: &str, action: Action) {
        self.bindings.insert(key.to_string(), action);
    }

    /// Get all bindings for an action
    #[must_use]
    pub fn keys_for_action(&self, action: Action) -> Vec<String> {
        self.bindings
            .iter()
            .filter_map(|(k, &v)| if v == action { Some(k.clone()) } else { None })
            .collect()
    }

    /// Format key(s) for an action for display (e.g., "r/F2")
    #[must_use]
    pub fn format_keys(&self, action: Action) -> String {
        let mut keys = self.keys_for_action(action);
        // Prefer single chars over multi-char keys
        keys.sort_by(|a, b| match (a.len() == 1, b.len() == 1) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.cmp(b),
        });
        keys.join("/")
    }

    /// Shortest key bound to an action, for inline hints
    #[must_use]
    pub fn primary_key(&self, action: Action) -> String {
        let mut keys = self.keys_for_action(action);
        keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        keys.into_iter().next().unwrap_or_default()
    }

    /// Generate a formatted help line for an action: "  keys    description"
    #[must_use]
    pub fn help_line(&self, action: Action) -> String {
        let keys = self.format_keys(action);
        format!("  {keys:<10} {}", action.description())
    }

    /// Generate status bar hint text
    #[must_use]
    pub fn status_hints(&self) -> String {
        let hints = [
            (Action::RenameProject, "rename"),
            (Action::AgentMenu, "agent"),
            (Action::Share, "share"),
            (Action::Help, "help"),
            (Action::Quit, "quit"),
        ];

        hints
            .iter()
            .map(|(action, label)| format!("[{}]{label}", self.primary_key(*action)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Convert a key code and modifiers to a string representation
#[must_use]
pub fn key_to_string(code: KeyCode, modifiers: KeyModifiers) -> String {
    let mut parts = Vec::new();

    if modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if modifiers.contains(KeyModifiers::SHIFT) && !matches!(code, KeyCode::Char(_)) {
        parts.push("Shift".to_string());
    }

    let key_part = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return String::new(),
    };

    parts.push(key_part);
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keybindings() {
        let keys = KeyBindings::default();

        assert_eq!(
            keys.get_action(KeyCode::Char('r'), KeyModifiers::NONE),
            Some(Action::RenameProject)
        );
        assert_eq!(
            keys.get_action(KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
        assert_eq!(
            keys.get_action(KeyCode::F(2), KeyModifiers::NONE),
            Some(Action::RenameProject)
        );
    }

    #[test]
    fn test_modifier_keys() {
        let keys = KeyBindings::default();

        assert_eq!(
            keys.get_action(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_uppercase_keybindings() {
        let keys = KeyBindings::default();

        // Some terminals send SHIFT with uppercase chars, some don't
        assert_eq!(
            keys.get_action(KeyCode::Char('R'), KeyModifiers::SHIFT),
            Some(Action::RefreshAgents)
        );
        assert_eq!(
            keys.get_action(KeyCode::Char('R'), KeyModifiers::NONE),
            Some(Action::RefreshAgents)
        );
    }

    #[test]
    fn test_unknown_key() {
        let keys = KeyBindings::default();

        assert_eq!(
            keys.get_action(KeyCode::Char('x'), KeyModifiers::NONE),
            None
        );
    }

    #[test]
    fn test_set_keybinding() {
        let mut keys = KeyBindings::default();
        keys.set("x", Action::Share);

        assert_eq!(
            keys.get_action(KeyCode::Char('x'), KeyModifiers::NONE),
            Some(Action::Share)
        );
    }

    #[test]
    fn test_format_keys_and_help_line() {
        let keys = KeyBindings::default();

        assert_eq!(keys.format_keys(Action::RenameProject), "r/F2");

        let help = keys.help_line(Action::RenameProject);
        assert!(help.contains("r/F2"));
        assert!(help.contains("Rename project"));
    }

    #[test]
    fn test_status_hints_prefer_short_keys() {
        let keys = KeyBindings::default();
        let hints = keys.status_hints();
        assert!(hints.contains("[r]rename"));
        assert!(hints.contains("[q]quit"));
    }

    #[test]
    fn test_merge_defaults() {
        let mut keys = KeyBindings {
            bindings: [("x".to_string(), Action::Quit)].into_iter().collect(),
        };

        assert_eq!(
            keys.get_action(KeyCode::Char('a'), KeyModifiers::NONE),
            None
        );

        keys.merge_defaults();
        assert_eq!(
            keys.get_action(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(Action::AgentMenu)
        );
        // Existing bindings are preserved
        assert_eq!(
            keys.get_action(KeyCode::Char('x'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(KeyCode::Char('a'), KeyModifiers::NONE), "a");
        assert_eq!(
            key_to_string(KeyCode::Char('a'), KeyModifiers::CONTROL),
            "Ctrl+a"
        );
        assert_eq!(key_to_string(KeyCode::Enter, KeyModifiers::NONE), "Enter");
        assert_eq!(key_to_string(KeyCode::F(2), KeyModifiers::NONE), "F2");
    }

    #[test]
    fn test_serde_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let keys = KeyBindings::default();
        let json = serde_json::to_string(&keys)?;
        let parsed: KeyBindings = serde_json::from_str(&json)?;
        assert_eq!(keys, parsed);
        Ok(())
    }
}
