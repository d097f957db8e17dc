//! Thread header: title, usage badge and the share/billing overlays

use super::rename::RenameFlow;
use crate::api::Navigator;
use crate::usage::UsageSnapshot;
use tracing::debug;

/// Below this terminal width the header switches to its compact layout
pub const COMPACT_WIDTH: u16 = 60;

/// Route of the billing settings page
pub const BILLING_ROUTE: &str = "/settings/billing";

/// Header state for one thread
#[derive(Debug, Default)]
pub struct HeaderState {
    /// Thread shown in this header
    pub thread_id: String,
    /// Project the thread belongs to, if known
    pub project_id: Option<String>,
    /// Inline rename state machine
    pub rename: RenameFlow,
    share_open: bool,
    billing_open: bool,
    force_compact: bool,
    debug: bool,
}

impl HeaderState {
    /// Create a header for `thread_id`
    #[must_use]
    pub fn new(thread_id: impl Into<String>, project_id: Option<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            project_id: project_id.filter(|id| !id.is_empty()),
            ..Self::default()
        }
    }

    /// Use strict ordering for rename results
    #[must_use]
    pub fn with_strict_ordering(mut self, strict: bool) -> Self {
        self.rename = RenameFlow::new(strict);
        self
    }

    /// Always use the compact layout
    #[must_use]
    pub const fn with_compact(mut self, compact: bool) -> Self {
        self.force_compact = compact;
        self
    }

    /// Show the debug badge
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Whether the compact layout applies at `width` columns
    #[must_use]
    pub const fn is_compact(&self, width: u16) -> bool {
        self.force_compact || width < COMPACT_WIDTH
    }

    /// Whether the debug badge is shown
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Whether the share overlay is open
    #[must_use]
    pub const fn is_share_open(&self) -> bool {
        self.share_open
    }

    /// Whether the billing overlay is open
    #[must_use]
    pub const fn is_billing_open(&self) -> bool {
        self.billing_open
    }

    /// Open the share overlay
    pub fn open_share(&mut self) {
        debug!(thread_id = %self.thread_id, "Opened share dialog");
        self.share_open = true;
    }

    /// Close the share overlay
    pub const fn close_share(&mut self) {
        self.share_open = false;
    }

    /// Activate the usage badge
    ///
    /// Opens billing only when the snapshot says an upgrade is relevant.
    /// Returns whether it opened.
    pub fn activate_usage(&mut self, usage: &UsageSnapshot) -> bool {
        let opens = usage.is_clickable();
        if opens {
            self.billing_open = true;
        }
        opens
    }

    /// Close the billing overlay
    pub const fn close_billing(&mut self) {
        self.billing_open = false;
    }

    /// Frontend route of this thread
    #[must_use]
    pub fn thread_route(&self) -> String {
        match &self.project_id {
            Some(project_id) => format!("/projects/{project_id}/thread/{}", self.thread_id),
            None => format!("/thread/{}", self.thread_id),
        }
    }

    /// Billing route that returns to this thread afterwards
    #[must_use]
    pub fn billing_route(&self) -> String {
        format!(
            "{BILLING_ROUTE}?return_url={}",
            urlencoding::encode(&self.thread_route())
        )
    }

    /// Leave the billing overlay for the billing page
    pub fn upgrade(&mut self, navigator: &dyn Navigator) {
        self.billing_open = false;
        navigator.navigate(&self.billing_route());
    }
}
