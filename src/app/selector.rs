//! Agent selector: dropdown menu and tools popover

use crate::agent::{Agent, Resolution};
use crate::api::Navigator;
use tracing::debug;

/// Route of the agent creation page
pub const CREATE_AGENT_ROUTE: &str = "/agents";

/// A row of the selector menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRow<'a> {
    /// "Default agent" / no explicit selection
    None,
    /// A concrete agent
    Agent(&'a Agent),
    /// Navigate to agent creation
    Create,
}

/// Selector state: the agent list plus two independent overlays
#[derive(Debug, Default)]
pub struct AgentSelector {
    agents: Vec<Agent>,
    loading: bool,
    menu_open: bool,
    tools_open: bool,
    cursor: usize,
    disabled: bool,
}

impl AgentSelector {
    /// Create a selector whose list is still loading
    #[must_use]
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Replace the agent list and mark loading done
    pub fn set_agents(&mut self, agents: Vec<Agent>) {
        debug!(count = agents.len(), "Agent list updated");
        self.agents = agents;
        self.loading = false;
        self.clamp_cursor();
    }

    /// Mark loading done without agents (fetch failed)
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Known agents; empty while loading
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Whether the list has not arrived yet
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Resolve `selected_id` against the current list
    #[must_use]
    pub fn resolve<'a>(&'a self, selected_id: Option<&str>) -> Resolution<'a> {
        Resolution::resolve(&self.agents, selected_id)
    }

    /// Whether interaction is disabled
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable the selector; disabling closes both overlays
    pub const fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.menu_open = false;
            self.tools_open = false;
        }
    }

    /// Whether the menu is open
    #[must_use]
    pub const fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Whether the tools popover is open
    #[must_use]
    pub const fn is_tools_open(&self) -> bool {
        self.tools_open
    }

    /// Open the menu with the cursor on the first row
    pub const fn open_menu(&mut self) {
        if !self.disabled {
            self.menu_open = true;
            self.cursor = 0;
        }
    }

    /// Close the menu
    pub const fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Toggle the menu
    pub const fn toggle_menu(&mut self) {
        if self.menu_open {
            self.close_menu();
        } else {
            self.open_menu();
        }
    }

    /// Menu rows in display order
    #[must_use]
    pub fn rows(&self) -> Vec<MenuRow<'_>> {
        std::iter::once(MenuRow::None)
            .chain(self.agents.iter().map(MenuRow::Agent))
            .chain(std::iter::once(MenuRow::Create))
            .collect()
    }

    fn row_count(&self) -> usize {
        self.agents.len() + 2
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.row_count() - 1);
    }

    /// Highlighted row index
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the highlight down, wrapping
    pub fn cursor_down(&mut self) {
        self.cursor = (self.cursor + 1) % self.row_count();
    }

    /// Move the highlight up, wrapping
    pub fn cursor_up(&mut self) {
        let count = self.row_count();
        self.cursor = (self.cursor + count - 1) % count;
    }

    /// Select "no explicit agent" and close the menu
    pub fn choose_none(&mut self, on_select: impl FnOnce(Option<String>)) {
        debug!("Agent selection cleared");
        on_select(None);
        self.close_menu();
    }

    /// Select `agent_id` and close the menu
    pub fn choose_entity(&mut self, agent_id: &str, on_select: impl FnOnce(Option<String>)) {
        debug!(%agent_id, "Agent selected");
        on_select(Some(agent_id.to_string()));
        self.close_menu();
    }

    /// Close the menu and open agent creation
    pub fn navigate_to_creation(&mut self, navigator: &dyn Navigator) {
        self.close_menu();
        navigator.navigate(CREATE_AGENT_ROUTE);
    }

    /// Activate the highlighted row
    pub fn activate_cursor(
        &mut self,
        navigator: &dyn Navigator,
        on_select: impl FnOnce(Option<String>),
    ) {
        if self.cursor == 0 {
            self.choose_none(on_select);
        } else if let Some(id) = self.agents.get(self.cursor - 1).map(|a| a.agent_id.clone()) {
            self.choose_entity(&id, on_select);
        } else {
            self.navigate_to_creation(navigator);
        }
    }

    /// Toggle the tools popover for the effective agent
    ///
    /// No-op unless that agent has tools, in which case the control is not
    /// drawn at all.
    pub fn toggle_tools(&mut self, selected_id: Option<&str>) {
        if self.tools_open {
            self.tools_open = false;
        } else if !self.disabled && self.resolve(selected_id).shows_tools() {
            self.tools_open = true;
        }
    }

    /// Close the tools popover
    pub const fn close_tools(&mut self) {
        self.tools_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::McpIntegration;
    use crate::api::RecordingNavigator;
    use pretty_assertions::assert_eq;

    fn loaded() -> AgentSelector {
        let mut selector = AgentSelector::new();
        selector.set_agents(vec![
            Agent::new("a1", "Writer"),
            Agent::new("a2", "Researcher")
                .as_default()
                .with_configured(McpIntegration::new("Exa", None, 3)),
        ]);
        selector
    }

    #[test]
    fn test_new_selector_is_loading_and_empty() {
        let selector = AgentSelector::new();
        assert!(selector.is_loading());
        assert!(selector.agents().is_empty());
        assert_eq!(selector.rows(), vec![MenuRow::None, MenuRow::Create]);
        assert_eq!(selector.resolve(None).display_name(), "Agent");
    }

    #[test]
    fn test_choose_entity_reports_and_closes() {
        let mut selector = loaded();
        selector.open_menu();

        let mut chosen = None;
        selector.choose_entity("a1", |id| chosen = Some(id));

        assert_eq!(chosen, Some(Some("a1".to_string())));
        assert!(!selector.is_menu_open());
    }

    #[test]
    fn test_choose_none_reports_and_closes() {
        let mut selector = loaded();
        selector.open_menu();

        let mut chosen = None;
        selector.choose_none(|id| chosen = Some(id));

        assert_eq!(chosen, Some(None));
        assert!(!selector.is_menu_open());
    }

    #[test]
    fn test_navigate_to_creation_closes_menu() {
        let mut selector = loaded();
        let nav = RecordingNavigator::new();
        selector.open_menu();
        selector.navigate_to_creation(&nav);

        assert!(!selector.is_menu_open());
        assert_eq!(nav.routes(), vec![CREATE_AGENT_ROUTE]);
    }

    #[test]
    fn test_cursor_wraps_over_rows() {
        let mut selector = loaded();
        selector.open_menu();
        // None, Writer, Researcher, Create
        selector.cursor_up();
        assert_eq!(selector.cursor(), 3);
        selector.cursor_down();
        assert_eq!(selector.cursor(), 0);
    }

    #[test]
    fn test_activate_cursor_dispatches_by_row() {
        let nav = RecordingNavigator::new();
        let mut selector = loaded();

        selector.open_menu();
        let mut chosen = None;
        selector.activate_cursor(&nav, |id| chosen = Some(id));
        assert_eq!(chosen, Some(None));

        selector.open_menu();
        selector.cursor_down();
        selector.cursor_down();
        let mut chosen = None;
        selector.activate_cursor(&nav, |id| chosen = Some(id));
        assert_eq!(chosen, Some(Some("a2".to_string())));

        selector.open_menu();
        selector.cursor_up();
        let mut chosen = None;
        selector.activate_cursor(&nav, |id| chosen = Some(id));
        assert_eq!(chosen, None);
        assert_eq!(nav.routes(), vec![CREATE_AGENT_ROUTE]);
        assert!(!selector.is_menu_open());
    }

    #[test]
    fn test_overlays_are_independent() {
        let mut selector = loaded();
        selector.open_menu();
        selector.toggle_tools(None);

        assert!(selector.is_menu_open());
        assert!(selector.is_tools_open());

        selector.close_menu();
        assert!(selector.is_tools_open());
    }

    #[test]
    fn test_toggle_tools_requires_tools() {
        let mut selector = loaded();
        // Writer has no integrations
        selector.toggle_tools(Some("a1"));
        assert!(!selector.is_tools_open());

        // Falls back to the default, which has one
        selector.toggle_tools(Some("missing"));
        assert!(selector.is_tools_open());
        selector.toggle_tools(Some("missing"));
        assert!(!selector.is_tools_open());
    }

    #[test]
    fn test_disabled_selector_never_opens() {
        let mut selector = loaded();
        selector.set_disabled(true);
        selector.open_menu();
        selector.toggle_tools(None);
        assert!(!selector.is_menu_open());
        assert!(!selector.is_tools_open());
    }

    #[test]
    fn test_cursor_clamped_when_list_shrinks() {
        let mut selector = loaded();
        selector.open_menu();
        selector.cursor_up();
        selector.set_agents(Vec::new());
        assert_eq!(selector.cursor(), 1);
    }
}
