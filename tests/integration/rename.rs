//! Inline project rename, end to end through the app and the state machine

use crate::common::{Backend, RecordingInvalidator, RecordingNotifier, RenameMode, build_app};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use threadbar::App;
use threadbar::app::rename::{PendingRename, RenameCompletion};
use threadbar::app::{ApplyOutcome, CommitOutcome, RenameFlow};
use threadbar::cache::CacheKey;
use threadbar::error::RENAME_FAILED_MESSAGE;
use threadbar::usage::UsageSnapshot;
use threadbar::{ApiError, api::Project};

fn app_with(mode: RenameMode, project_id: Option<&str>) -> (App, Arc<Backend>) {
    let backend = Arc::new(Backend::new(Vec::new(), mode));
    let (app, _nav) = build_app(&backend, project_id, "Roadmap", UsageSnapshot::loading());
    (app, backend)
}

fn set_draft(app: &mut App, text: &str) {
    assert!(app.start_rename());
    app.run_post_render_effects();
    if let Some(input) = app.header.rename.input_mut() {
        for c in text.chars() {
            input.insert_char(c);
        }
    }
}

#[test]
fn test_unchanged_draft_makes_no_request() {
    let (mut app, backend) = app_with(RenameMode::Succeed, Some("p1"));
    assert!(app.start_rename());

    assert_eq!(app.commit_rename(), CommitOutcome::Unchanged);
    assert!(!app.header.rename.is_editing());
    assert_eq!(backend.update_count(), 0);
}

#[test]
fn test_missing_project_id_reports_once_without_request() {
    let (mut app, backend) = app_with(RenameMode::Succeed, None);
    set_draft(&mut app, "New name");

    assert_eq!(app.commit_rename(), CommitOutcome::MissingProjectId);
    assert_eq!(backend.update_count(), 0);

    let toasts = app.toasts.all();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, ApiError::MissingProjectId.to_string());
    assert_eq!(app.project_name, "Roadmap");
}

#[test]
fn test_successful_rename_commits_and_invalidates() {
    let (mut app, backend) = app_with(RenameMode::Succeed, Some("p1"));
    set_draft(&mut app, "Roadmap 2026");

    assert!(matches!(app.commit_rename(), CommitOutcome::Dispatched(_)));
    assert_eq!(
        backend.updates.lock().clone(),
        vec![("p1".to_string(), "Roadmap 2026".to_string())]
    );

    let outcomes = app.apply_rename_completions();
    assert_eq!(outcomes, vec![ApplyOutcome::Renamed("Roadmap 2026".to_string())]);
    assert_eq!(app.project_name, "Roadmap 2026");
    assert_eq!(
        app.cache.stale_keys(),
        vec![CacheKey::Project("p1".to_string())]
    );
}

#[test]
fn test_failed_rename_reports_once_and_keeps_name() {
    let (mut app, backend) = app_with(RenameMode::Fail, Some("p1"));
    set_draft(&mut app, "Broken");
    app.commit_rename();

    let outcomes = app.apply_rename_completions();
    assert_eq!(backend.update_count(), 1);
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], ApplyOutcome::Failed(_)));
    assert_eq!(app.project_name, "Roadmap");
    assert_eq!(app.toasts.all().len(), 1);
    assert!(app.cache.stale_keys().is_empty());
}

#[test]
fn test_empty_update_result_counts_as_failure() {
    let (mut app, _backend) = app_with(RenameMode::Empty, Some("p1"));
    set_draft(&mut app, "Nothing back");
    app.commit_rename();

    let outcomes = app.apply_rename_completions();
    assert_eq!(
        outcomes,
        vec![ApplyOutcome::Failed("Failed to update project".to_string())]
    );
    assert_eq!(app.project_name, "Roadmap");
}

#[test]
fn test_failure_resets_reopened_draft_to_previous_name() {
    let notifier = RecordingNotifier::default();
    let invalidator = RecordingInvalidator::default();
    let mut flow = RenameFlow::new(false);

    assert!(flow.start("Roadmap"));
    if let Some(input) = flow.input_mut() {
        input.insert_char('!');
    }
    let CommitOutcome::Dispatched(request) = flow.commit("Roadmap", Some("p1"), &notifier) else {
        panic!("expected a dispatched rename");
    };

    // User reopens the field before the response arrives
    assert!(flow.start("Roadmap"));
    if let Some(input) = flow.input_mut() {
        input.insert_char('?');
    }
    let outcome = flow.apply(
        RenameCompletion {
            request,
            result: Err(ApiError::Transport("reset by peer".to_string())),
        },
        &notifier,
        &invalidator,
        |_| panic!("failure must not commit a name"),
    );

    assert!(matches!(outcome, ApplyOutcome::Failed(_)));
    assert_eq!(flow.draft("Roadmap"), "Roadmap");
    assert_eq!(notifier.errors.lock().len(), 1);
    assert!(invalidator.keys.lock().is_empty());
}

#[test]
fn test_strict_ordering_drops_older_completion() {
    let notifier = RecordingNotifier::default();
    let invalidator = RecordingInvalidator::default();
    let mut flow = RenameFlow::new(true);
    let request = |generation: u64, name: &str| PendingRename {
        generation,
        project_id: "p1".to_string(),
        previous_name: "Roadmap".to_string(),
        new_name: name.to_string(),
    };
    let ok = |name: &str| {
        Ok(Some(Project {
            project_id: "p1".to_string(),
            name: name.to_string(),
            description: None,
        }))
    };

    let mut committed = Vec::new();
    let newer = flow.apply(
        RenameCompletion {
            request: request(2, "Second"),
            result: ok("Second"),
        },
        &notifier,
        &invalidator,
        |name| committed.push(name.to_string()),
    );
    let older = flow.apply(
        RenameCompletion {
            request: request(1, "First"),
            result: ok("First"),
        },
        &notifier,
        &invalidator,
        |name| committed.push(name.to_string()),
    );

    assert_eq!(newer, ApplyOutcome::Renamed("Second".to_string()));
    assert_eq!(older, ApplyOutcome::Stale);
    assert_eq!(committed, vec!["Second".to_string()]);
    assert_eq!(invalidator.keys.lock().len(), 1);
}

#[test]
fn test_server_message_wins_over_fallback() {
    let notifier = RecordingNotifier::default();
    let invalidator = RecordingInvalidator::default();
    let mut flow = RenameFlow::new(false);

    flow.apply(
        RenameCompletion {
            request: PendingRename {
                generation: 1,
                project_id: "p1".to_string(),
                previous_name: "Roadmap".to_string(),
                new_name: "Taken".to_string(),
            },
            result: Err(ApiError::Status {
                status: 409,
                message: "Name already taken".to_string(),
            }),
        },
        &notifier,
        &invalidator,
        |_| {},
    );

    let errors = notifier.errors.lock().clone();
    assert_eq!(errors, vec!["Name already taken".to_string()]);
    assert_ne!(errors[0], RENAME_FAILED_MESSAGE);
}

proptest! {
    #[test]
    fn test_blank_drafts_never_reach_the_backend(draft in "[ \t]{0,12}") {
        let (mut app, backend) = app_with(RenameMode::Succeed, Some("p1"));
        prop_assert!(app.start_rename());
        app.run_post_render_effects();
        if let Some(input) = app.header.rename.input_mut() {
            input.backspace();
            for c in draft.chars() {
                input.insert_char(c);
            }
        }

        prop_assert_eq!(app.commit_rename(), CommitOutcome::EmptyDraft);
        prop_assert_eq!(backend.update_count(), 0);
        prop_assert_eq!(app.project_name.as_str(), "Roadmap");
    }
}
