//! Resolving the effective agent from a list and an optional selection

use super::Agent;

/// Label shown when neither a selected nor a default agent exists
pub const PLACEHOLDER_NAME: &str = "Agent";

/// Whether an agent exposes any MCP tool integration
#[must_use]
pub fn has_tools(agent: &Agent) -> bool {
    !agent.configured_mcps.is_empty() || !agent.custom_mcps.is_empty()
}

/// The selected and default agents resolved against the current list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Agent whose id matches the selection, if any
    pub selected: Option<&'a Agent>,
    /// First agent flagged as default, if any
    pub default: Option<&'a Agent>,
}

impl<'a> Resolution<'a> {
    /// Resolve `selected_id` against `agents`
    ///
    /// An id that matches nothing in the list resolves to no selection, so a
    /// stale id falls back to the default exactly like an unset one.
    #[must_use]
    pub fn resolve(agents: &'a [Agent], selected_id: Option<&str>) -> Self {
        let selected = selected_id.and_then(|id| agents.iter().find(|a| a.agent_id == id));
        let default = agents.iter().find(|a| a.is_default);
        Self { selected, default }
    }

    /// The agent used for display and tool checks
    #[must_use]
    pub fn effective(&self) -> Option<&'a Agent> {
        self.selected.or(self.default)
    }

    /// Name shown on the selector button
    #[must_use]
    pub fn display_name(&self) -> &'a str {
        [self.selected, self.default]
            .into_iter()
            .flatten()
            .map(|a| a.name.as_str())
            .find(|name| !name.is_empty())
            .unwrap_or(PLACEHOLDER_NAME)
    }

    /// Whether the "default agent" row carries the check mark
    #[must_use]
    pub const fn default_row_checked(&self) -> bool {
        self.selected.is_none()
    }

    /// Whether the row for `agent` carries the check mark
    #[must_use]
    pub fn is_checked(&self, agent: &Agent) -> bool {
        self.selected.is_some_and(|s| s.agent_id == agent.agent_id)
    }

    /// Whether the tools control should be rendered
    #[must_use]
    pub fn shows_tools(&self) -> bool {
        self.effective().is_some_and(has_tools)
    }
}
