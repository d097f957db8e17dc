//! The app wired to the HTTP client, against a local mock server

use mockito::Matcher;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use threadbar::api::{HttpClient, RecordingNavigator, Services};
use threadbar::app::{ApplyOutcome, ThreadContext};
use threadbar::{App, Config};

fn app_for(server: &mockito::Server) -> App {
    let config = Config {
        api_url: server.url(),
        api_token: Some("tok".to_string()),
        ..Config::default()
    };
    let services = Services::from_http(
        HttpClient::from_config(&config),
        Box::new(RecordingNavigator::new()),
    );
    App::new(
        config,
        ThreadContext {
            thread_id: "t1".to_string(),
            project_id: Some("p1".to_string()),
            project_name: "Roadmap".to_string(),
            agent_id: None,
        },
        services,
    )
}

/// Apply completions until one arrives or the deadline passes
fn wait_for_rename(app: &mut App) -> Vec<ApplyOutcome> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let outcomes = app.apply_rename_completions();
        if !outcomes.is_empty() || Instant::now() > deadline {
            return outcomes;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_rename_round_trip_over_http() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/projects/p1")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(serde_json::json!({"name": "Launch plan"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"project_id": "p1", "name": "Launch plan"}"#)
        .create();

    let mut app = app_for(&server);
    assert!(app.start_rename());
    app.run_post_render_effects();
    if let Some(input) = app.header.rename.input_mut() {
        for c in "Launch plan".chars() {
            input.insert_char(c);
        }
    }
    app.commit_rename();

    let outcomes = wait_for_rename(&mut app);
    mock.assert();
    assert_eq!(outcomes, vec![ApplyOutcome::Renamed("Launch plan".to_string())]);
    assert_eq!(app.project_name, "Launch plan");
    assert_eq!(app.renames_in_flight(), 0);
}

#[test]
fn test_rename_rejected_over_http_shows_server_message() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("PUT", "/projects/p1")
        .with_status(422)
        .with_body(r#"{"detail": "Name too long"}"#)
        .create();

    let mut app = app_for(&server);
    assert!(app.start_rename());
    if let Some(input) = app.header.rename.input_mut() {
        input.insert_char('!');
    }
    app.commit_rename();

    let outcomes = wait_for_rename(&mut app);
    assert_eq!(outcomes, vec![ApplyOutcome::Failed("Name too long".to_string())]);
    assert_eq!(app.project_name, "Roadmap");
    assert_eq!(
        app.toasts.latest().map(|t| t.message),
        Some("Name too long".to_string())
    );
}

#[test]
fn test_agents_and_usage_load_over_http() {
    let mut server = mockito::Server::new();
    let agents = server
        .mock("GET", "/agents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"agents": [
                {"agent_id": "a1", "name": "Writer"},
                {"agent_id": "a2", "name": "Researcher", "is_default": true,
                 "custom_mcps": [{"name": "Linear", "type": "sse", "enabledTools": ["x"]}]}
            ]}"#,
        )
        .create();
    let usage = server
        .mock("GET", "/billing/usage")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"tier": "free", "runs_this_month": 4}"#)
        .create();

    let mut app = app_for(&server);
    app.load_agents();
    app.refresh_usage(chrono::Utc::now());
    agents.assert();
    usage.assert();

    let resolution = app.selector.resolve(None);
    assert_eq!(resolution.display_name(), "Researcher");
    assert!(resolution.shows_tools());
    assert_eq!(
        app.usage().label().map(|l| l.text()),
        Some("6 runs remaining".to_string())
    );
}

#[test]
fn test_agent_load_failure_is_reported() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/agents")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();

    let mut app = app_for(&server);
    app.load_agents();

    assert!(!app.selector.is_loading());
    assert!(app.selector.agents().is_empty());
    assert_eq!(
        app.toasts.latest().map(|t| t.message),
        Some("Failed to load agents: Request failed with status 500".to_string())
    );
}
