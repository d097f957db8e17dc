//! Usage snapshot and the badge shown in the thread header

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tiers and their monthly run allowances
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionTier {
    /// Free tier
    #[default]
    #[serde(rename = "free")]
    Free,
    /// Paid tier
    #[serde(rename = "pro_75")]
    Pro75,
    /// Internal tier, effectively unlimited
    #[serde(rename = "admin")]
    Admin,
}

impl SubscriptionTier {
    /// All tiers, in display order.
    pub const ALL: &'static [Self] = &[Self::Free, Self::Pro75, Self::Admin];

    /// Runs allowed per calendar month
    #[must_use]
    pub const fn monthly_limit(self) -> u32 {
        match self {
            Self::Free => 10,
            Self::Pro75 => 150,
            Self::Admin => 100_000,
        }
    }

    /// Label shown in the billing dialog
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Pro75 => "Pro",
            Self::Admin => "Admin",
        }
    }
}

/// Usage as reported by the billing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Current subscription tier
    #[serde(default)]
    pub tier: SubscriptionTier,
    /// Runs started since the start of the billing month
    #[serde(default)]
    pub runs_this_month: u32,
}

/// What the header needs to know to draw the usage badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageSnapshot {
    /// Usage has not been fetched yet
    pub is_loading: bool,
    /// At least one run remains this month
    pub has_messages_left: bool,
    /// Remaining runs this month
    pub messages_left: u32,
    /// Account is on the free tier
    pub is_free_user: bool,
    /// Clicking the badge should open billing
    pub should_show_upgrade: bool,
}

/// The text variant drawn inside the usage badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLabel {
    /// `"<n> runs remaining"`
    RunsRemaining(u32),
    /// Free user out of runs
    UpgradePrompt,
    /// Paid user out of runs
    LimitReached,
}

impl UsageLabel {
    /// Badge text
    #[must_use]
    pub fn text(self) -> String {
        match self {
            Self::RunsRemaining(n) => format!("{n} runs remaining"),
            Self::UpgradePrompt => "Upgrade for more messages".to_string(),
            Self::LimitReached => "Monthly limit reached".to_string(),
        }
    }
}

impl UsageSnapshot {
    /// Snapshot used before the first fetch completes
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            is_loading: true,
            has_messages_left: false,
            messages_left: 0,
            is_free_user: false,
            should_show_upgrade: false,
        }
    }

    /// Derive a snapshot from a tier and the runs used this month
    #[must_use]
    pub fn from_runs(tier: SubscriptionTier, runs_this_month: u32) -> Self {
        let messages_left = tier.monthly_limit().saturating_sub(runs_this_month);
        let has_messages_left = messages_left > 0;
        let is_free_user = tier == SubscriptionTier::Free;
        Self {
            is_loading: false,
            has_messages_left,
            messages_left,
            is_free_user,
            should_show_upgrade: tier != SubscriptionTier::Admin
                && (is_free_user || !has_messages_left),
        }
    }

    /// The badge label, or `None` while loading
    #[must_use]
    pub const fn label(&self) -> Option<UsageLabel> {
        if self.is_loading {
            None
        } else if self.has_messages_left {
            Some(UsageLabel::RunsRemaining(self.messages_left))
        } else if self.is_free_user {
            Some(UsageLabel::UpgradePrompt)
        } else {
            Some(UsageLabel::LimitReached)
        }
    }

    /// Whether activating the badge opens the billing dialog
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        !self.is_loading && self.should_show_upgrade
    }
}

impl From<UsageReport> for UsageSnapshot {
    fn from(report: UsageReport) -> Self {
        Self::from_runs(report.tier, report.runs_this_month)
    }
}

/// Start of the billing month containing `now` (UTC midnight on the 1st)
#[must_use]
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
