//! Agent selector resolution, menu and tools control

use crate::common::{Backend, RenameMode, build_app};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use threadbar::agent::{PLACEHOLDER_NAME, Resolution};
use threadbar::app::{AgentSelector, MenuRow, Mode, handle_action};
use threadbar::config::Action;
use threadbar::usage::UsageSnapshot;
use threadbar::{Agent, McpIntegration};

fn agents() -> Vec<Agent> {
    vec![
        Agent::new("a1", "Writer"),
        Agent::new("a2", "Researcher")
            .as_default()
            .with_custom(McpIntegration::new("Linear", Some("sse"), 3)),
        Agent::new("a3", ""),
    ]
}

fn loaded_selector() -> AgentSelector {
    let mut selector = AgentSelector::new();
    selector.set_agents(agents());
    selector
}

#[rstest]
#[case::unset(None, "Researcher")]
#[case::selected(Some("a1"), "Writer")]
#[case::stale(Some("deleted"), "Researcher")]
#[case::blank_name_falls_back(Some("a3"), "Researcher")]
fn test_display_name(#[case] selected: Option<&str>, #[case] expected: &str) {
    let selector = loaded_selector();
    assert_eq!(selector.resolve(selected).display_name(), expected);
}

#[test]
fn test_display_name_placeholder_without_agents() {
    let resolution = Resolution::resolve(&[], Some("a1"));
    assert_eq!(resolution.display_name(), PLACEHOLDER_NAME);
    assert!(!resolution.shows_tools());
}

#[rstest]
#[case::unset(None, true, None)]
#[case::stale(Some("deleted"), true, None)]
#[case::writer(Some("a1"), false, Some("a1"))]
#[case::default_agent(Some("a2"), false, Some("a2"))]
fn test_exactly_one_check_mark(
    #[case] selected: Option<&str>,
    #[case] default_row: bool,
    #[case] checked_agent: Option<&str>,
) {
    let selector = loaded_selector();
    let resolution = selector.resolve(selected);

    assert_eq!(resolution.default_row_checked(), default_row);
    let checked: Vec<&str> = selector
        .agents()
        .iter()
        .filter(|a| resolution.is_checked(a))
        .map(|a| a.agent_id.as_str())
        .collect();
    assert_eq!(checked, checked_agent.into_iter().collect::<Vec<_>>());
}

#[rstest]
#[case::default_has_tools(None, true)]
#[case::selected_without_tools(Some("a1"), false)]
#[case::stale_uses_default(Some("deleted"), true)]
fn test_tools_control_follows_effective_agent(
    #[case] selected: Option<&str>,
    #[case] shows_tools: bool,
) {
    let selector = loaded_selector();
    assert_eq!(selector.resolve(selected).shows_tools(), shows_tools);
}

#[test]
fn test_menu_rows_order() {
    let selector = loaded_selector();
    let rows = selector.rows();

    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0], MenuRow::None);
    assert!(matches!(rows[1], MenuRow::Agent(a) if a.agent_id == "a1"));
    assert_eq!(rows[4], MenuRow::Create);
}

#[test]
fn test_disabled_selector_ignores_menu_and_tools() {
    let backend = Arc::new(Backend::new(agents(), RenameMode::Succeed));
    let (mut app, _nav) = build_app(&backend, Some("p1"), "Roadmap", UsageSnapshot::loading());
    app.selector.set_disabled(true);

    handle_action(&mut app, Action::AgentMenu);
    assert_eq!(app.mode(), Mode::Normal);
    handle_action(&mut app, Action::ToolsPopover);
    assert_eq!(app.mode(), Mode::Normal);
}

#[test]
fn test_choose_none_clears_selection() {
    let backend = Arc::new(Backend::new(agents(), RenameMode::Succeed));
    let (mut app, nav) = build_app(&backend, Some("p1"), "Roadmap", UsageSnapshot::loading());
    app.select_agent(Some("a1".to_string()));

    handle_action(&mut app, Action::AgentMenu);
    assert_eq!(app.selector.cursor(), 0);
    app.activate_menu_row();

    assert_eq!(app.selected_agent_id, None);
    assert_eq!(app.mode(), Mode::Normal);
    assert!(nav.routes().is_empty());
}
