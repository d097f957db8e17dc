//! Agent profiles as returned by the backend
//!
//! Agents are read-only from the UI's point of view. Tool integration
//! records arrive loosely shaped (`enabledTools` arrays, nullable lists) and
//! are normalized here, at deserialization time, so rendering code only ever
//! sees [`McpIntegration`] values.

mod selection;

pub use selection::{PLACEHOLDER_NAME, Resolution, has_tools};

use serde::{Deserialize, Deserializer, Serialize};

/// A configurable assistant profile selectable for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Agent {
    /// Backend identifier
    pub agent_id: String,
    /// Display name
    pub name: String,
    /// Optional avatar glyph (usually a single emoji)
    #[serde(default)]
    pub avatar: Option<String>,
    /// Optional one-line description
    #[serde(default)]
    pub description: Option<String>,
    /// Whether this is the account's default agent
    #[serde(default)]
    pub is_default: bool,
    /// MCP servers configured from the catalog
    #[serde(default, deserialize_with = "null_as_empty")]
    pub configured_mcps: Vec<McpIntegration>,
    /// MCP servers added by the user
    #[serde(default, deserialize_with = "null_as_empty")]
    pub custom_mcps: Vec<McpIntegration>,
}

impl Agent {
    /// Create an agent with no tools, avatar, or description
    #[must_use]
    pub fn new(agent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            avatar: None,
            description: None,
            is_default: false,
            configured_mcps: Vec::new(),
            custom_mcps: Vec::new(),
        }
    }

    /// Mark the agent as the account default
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a configured MCP integration
    #[must_use]
    pub fn with_configured(mut self, mcp: McpIntegration) -> Self {
        self.configured_mcps.push(mcp);
        self
    }

    /// Attach a custom MCP integration
    #[must_use]
    pub fn with_custom(mut self, mcp: McpIntegration) -> Self {
        self.custom_mcps.push(mcp);
        self
    }
}

/// A tool-integration (MCP server) attached to an agent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMcp")]
pub struct McpIntegration {
    /// Server name
    pub name: String,
    /// Transport/type tag (e.g. `sse`, `http`); present on custom servers
    pub kind: Option<String>,
    /// Number of tools enabled on this server
    pub enabled_tools_count: usize,
}

impl McpIntegration {
    /// Create an integration record
    #[must_use]
    pub fn new(name: impl Into<String>, kind: Option<&str>, enabled_tools_count: usize) -> Self {
        Self {
            name: name.into(),
            kind: kind.map(str::to_string),
            enabled_tools_count,
        }
    }
}

#[derive(Deserialize)]
struct RawMcp {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default, rename = "enabledTools", alias = "enabled_tools")]
    enabled_tools: Option<Vec<serde_json::Value>>,
}

impl From<RawMcp> for McpIntegration {
    fn from(raw: RawMcp) -> Self {
        Self {
            name: raw.name,
            kind: raw.kind.filter(|k| !k.is_empty()),
            enabled_tools_count: raw.enabled_tools.map_or(0, |tools| tools.len()),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Sort direction for the agent list query
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Query-string value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Pagination and ordering for the agent list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentListParams {
    /// Page size
    pub limit: u32,
    /// Field to sort by
    pub sort_by: String,
    /// Sort direction
    pub sort_order: SortOrder,
}

impl Default for AgentListParams {
    fn default() -> Self {
        Self {
            limit: 100,
            sort_by: "name".to_string(),
            sort_order: SortOrder::Asc,
        }
    }
}

/// Response body of the agent list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentsResponse {
    /// Agents on this page
    #[serde(default, deserialize_with = "null_as_empty")]
    pub agents: Vec<Agent>,
}

/// Compact agent view printed by `threadbar agents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    /// Backend identifier
    pub agent_id: String,
    /// Display name
    pub name: String,
    /// Whether this is the default agent
    pub is_default: bool,
    /// Number of attached MCP servers
    pub mcp_servers: usize,
    /// Total tools enabled across all servers
    pub enabled_tools: usize,
}

impl From<&Agent> for AgentSummary {
    fn from(agent: &Agent) -> Self {
        let servers = agent.configured_mcps.iter().chain(&agent.custom_mcps);
        Self {
            agent_id: agent.agent_id.clone(),
            name: agent.name.clone(),
            is_default: agent.is_default,
            mcp_servers: agent.configured_mcps.len() + agent.custom_mcps.len(),
            enabled_tools: servers.map(|m| m.enabled_tools_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_agent() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"{
            "agent_id": "a1",
            "name": "Writer",
            "avatar": "✍️",
            "description": "Drafts long-form text",
            "is_default": false,
            "configured_mcps": [
                {"name": "Exa Search", "enabledTools": ["search", "crawl"]}
            ],
            "custom_mcps": [
                {"name": "Internal Wiki", "type": "sse", "enabledTools": []}
            ]
        }"#;
        let agent: Agent = serde_json::from_str(json)?;

        assert_eq!(agent.agent_id, "a1");
        assert_eq!(agent.avatar.as_deref(), Some("✍️"));
        assert_eq!(
            agent.configured_mcps,
            vec![McpIntegration::new("Exa Search", None, 2)]
        );
        assert_eq!(
            agent.custom_mcps,
            vec![McpIntegration::new("Internal Wiki", Some("sse"), 0)]
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_null_and_missing_lists() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"{"agent_id": "a2", "name": "Bare", "configured_mcps": null}"#;
        let agent: Agent = serde_json::from_str(json)?;

        assert!(agent.configured_mcps.is_empty());
        assert!(agent.custom_mcps.is_empty());
        assert!(!agent.is_default);
        Ok(())
    }

    #[test]
    fn test_mcp_without_enabled_tools_counts_zero() -> Result<(), Box<dyn std::error::Error>> {
        let mcp: McpIntegration = serde_json::from_str(r#"{"name": "x", "type": ""}"#)?;
        assert_eq!(mcp.enabled_tools_count, 0);
        assert_eq!(mcp.kind, None);
        Ok(())
    }

    #[test]
    fn test_agents_response_tolerates_null() -> Result<(), Box<dyn std::error::Error>> {
        let response: AgentsResponse = serde_json::from_str(r#"{"agents": null}"#)?;
        assert!(response.agents.is_empty());
        Ok(())
    }

    #[test]
    fn test_summary_counts_tools() {
        let agent = Agent::new("a1", "Writer")
            .with_configured(McpIntegration::new("Exa", None, 3))
            .with_custom(McpIntegration::new("Wiki", Some("http"), 2));
        let summary = AgentSummary::from(&agent);
        assert_eq!(summary.mcp_servers, 2);
        assert_eq!(summary.enabled_tools, 5);
    }

    #[test]
    fn test_default_params() {
        let params = AgentListParams::default();
        assert_eq!(params.limit, 100);
        assert_eq!(params.sort_by, "name");
        assert_eq!(params.sort_order.as_str(), "asc");
    }
}
