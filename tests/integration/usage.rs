//! Usage badge and the billing overlay

use crate::common::{Backend, RenameMode, build_app};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use threadbar::app::{Mode, handle_action};
use threadbar::config::Action;
use threadbar::usage::{SubscriptionTier, UsageSnapshot};

#[rstest]
#[case::free_with_runs(SubscriptionTier::Free, 7, Some("3 runs remaining"))]
#[case::free_one_left(SubscriptionTier::Free, 9, Some("1 runs remaining"))]
#[case::free_exhausted(SubscriptionTier::Free, 10, Some("Upgrade for more messages"))]
#[case::pro_exhausted(SubscriptionTier::Pro75, 150, Some("Monthly limit reached"))]
#[case::admin(SubscriptionTier::Admin, 0, Some("100000 runs remaining"))]
fn test_usage_label(
    #[case] tier: SubscriptionTier,
    #[case] runs: u32,
    #[case] expected: Option<&str>,
) {
    let label = UsageSnapshot::from_runs(tier, runs).label().map(|l| l.text());
    assert_eq!(label.as_deref(), expected);
}

#[test]
fn test_loading_usage_has_no_label() {
    assert_eq!(UsageSnapshot::loading().label(), None);
    assert!(!UsageSnapshot::loading().is_clickable());
}

#[rstest]
#[case::upgrade_prompt(SubscriptionTier::Free, 10, true)]
#[case::limit_reached(SubscriptionTier::Pro75, 150, true)]
#[case::admin(SubscriptionTier::Admin, 0, false)]
fn test_usage_badge_opens_billing_only_when_relevant(
    #[case] tier: SubscriptionTier,
    #[case] runs: u32,
    #[case] opens: bool,
) {
    let backend = Arc::new(Backend::new(Vec::new(), RenameMode::Succeed));
    let (mut app, _nav) = build_app(
        &backend,
        Some("p1"),
        "Roadmap",
        UsageSnapshot::from_runs(tier, runs),
    );

    handle_action(&mut app, Action::Usage);
    assert_eq!(app.mode() == Mode::Billing, opens);
}

#[test]
fn test_upgrade_returns_to_thread() {
    let backend = Arc::new(Backend::new(Vec::new(), RenameMode::Succeed));
    let (mut app, nav) = build_app(
        &backend,
        None,
        "Roadmap",
        UsageSnapshot::from_runs(SubscriptionTier::Free, 12),
    );

    handle_action(&mut app, Action::Usage);
    app.upgrade();

    assert_eq!(app.mode(), Mode::Normal);
    assert_eq!(
        nav.routes(),
        vec!["/settings/billing?return_url=%2Fthread%2Ft1"]
    );
}
