//! Application state

use super::header::HeaderState;
use super::notify::Toasts;
use super::rename::{ApplyOutcome, CommitOutcome};
use super::selector::AgentSelector;
use super::worker::{BackgroundExecutor, RefetchWorker, Refetched, RenameExecutor};
use crate::agent::{AgentSummary, AgentsResponse};
use crate::api::{Navigator, Notifier, Project, Services};
use crate::cache::{CacheInvalidator, CacheKey, QueryCache};
use crate::config::Config;
use crate::usage::UsageSnapshot;
use crate::error::ApiError;
use chrono::{DateTime, Duration, TimeDelta, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How often the usage badge is refetched
const USAGE_REFRESH_SECS: i64 = 60;

/// Toast lifetime when the configured one is out of range
const DEFAULT_TOAST_TTL_SECS: i64 = 4;

/// Which surface currently receives keys, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Title edit field has focus
    Editing,
    /// Help overlay
    Help,
    /// Share overlay
    Share,
    /// Billing overlay
    Billing,
    /// Agent menu
    Menu,
    /// Tools popover
    Tools,
    /// Nothing focused
    Normal,
}

/// Thread the app is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadContext {
    /// Thread id
    pub thread_id: String,
    /// Owning project, if known
    pub project_id: Option<String>,
    /// Committed project name as last known
    pub project_name: String,
    /// Initially selected agent
    pub agent_id: Option<String>,
}

/// Main application state
///
/// Owns everything the header and selector report back to: the committed
/// project name, the agent selection and the panel toggles.
#[derive(Debug)]
pub struct App {
    /// Application configuration
    pub config: Config,

    /// Committed project name
    pub project_name: String,

    /// Header state
    pub header: HeaderState,

    /// Agent selector state
    pub selector: AgentSelector,

    /// Explicitly selected agent; `None` means "use the default"
    pub selected_agent_id: Option<String>,

    /// Files panel visibility
    pub files_visible: bool,

    /// Side panel visibility
    pub side_panel_visible: bool,

    /// Sidebar visibility (compact layout)
    pub sidebar_open: bool,

    /// Help overlay visibility
    pub help_open: bool,

    /// Last rendered terminal width
    pub viewport_width: u16,

    /// Notifications
    pub toasts: Toasts,

    /// Fetched resources
    pub cache: QueryCache,

    /// Whether the application should quit
    pub should_quit: bool,

    services: Services,
    executor: Box<dyn RenameExecutor>,
    refetch: RefetchWorker,
    usage_refreshed_at: Option<DateTime<Utc>>,
}

impl App {
    /// Create an app for `thread`, running renames on a background thread
    #[must_use]
    pub fn new(config: Config, thread: ThreadContext, services: Services) -> Self {
        let executor = Box::new(BackgroundExecutor::new(services.updater.clone()));
        Self::with_executor(config, thread, services, executor)
    }

    /// Create an app with a specific rename executor
    ///
    /// Cache refetches run inline when the executor is synchronous and on
    /// background threads otherwise.
    #[must_use]
    pub fn with_executor(
        config: Config,
        thread: ThreadContext,
        services: Services,
        executor: Box<dyn RenameExecutor>,
    ) -> Self {
        let ttl = i64::try_from(config.toast_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_TOAST_TTL_SECS));
        let agents = Arc::clone(&services.agents);
        let projects = Arc::clone(&services.projects);
        let refetch = if executor.is_synchronous() {
            RefetchWorker::inline(agents, projects)
        } else {
            RefetchWorker::background(agents, projects)
        };
        let header = HeaderState::new(thread.thread_id, thread.project_id)
            .with_strict_ordering(config.strict_rename_ordering);
        Self {
            project_name: thread.project_name,
            header,
            selector: AgentSelector::new(),
            selected_agent_id: thread.agent_id,
            files_visible: false,
            side_panel_visible: false,
            sidebar_open: false,
            help_open: false,
            viewport_width: u16::MAX,
            toasts: Toasts::new(ttl),
            cache: QueryCache::new(),
            should_quit: false,
            services,
            executor,
            refetch,
            usage_refreshed_at: None,
            config,
        }
    }

    /// Current input mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.header.rename.is_editing() {
            Mode::Editing
        } else if self.help_open {
            Mode::Help
        } else if self.header.is_share_open() {
            Mode::Share
        } else if self.header.is_billing_open() {
            Mode::Billing
        } else if self.selector.is_menu_open() {
            Mode::Menu
        } else if self.selector.is_tools_open() {
            Mode::Tools
        } else {
            Mode::Normal
        }
    }

    /// Whether the compact layout is active
    #[must_use]
    pub const fn is_compact(&self) -> bool {
        self.header.is_compact(self.viewport_width)
    }

    /// Current usage snapshot
    #[must_use]
    pub fn usage(&self) -> UsageSnapshot {
        self.services.usage.snapshot()
    }

    /// Route opener
    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.services.navigator.as_ref()
    }

    /// Share link for this thread
    #[must_use]
    pub fn share_url(&self) -> String {
        self.config.share_url(&self.header.thread_id)
    }

    /// Renames dispatched but not yet applied
    #[must_use]
    pub fn renames_in_flight(&self) -> usize {
        self.executor.in_flight()
    }

    /// Begin editing the title
    pub fn start_rename(&mut self) -> bool {
        self.header.rename.start(&self.project_name)
    }

    /// Abandon the edit
    pub fn cancel_rename(&mut self) {
        self.header.rename.cancel();
    }

    /// Leave edit mode, dispatching a rename if the name changed
    pub fn commit_rename(&mut self) -> CommitOutcome {
        let outcome = self.header.rename.commit(
            &self.project_name,
            self.header.project_id.as_deref(),
            &self.toasts,
        );
        if let CommitOutcome::Dispatched(request) = &outcome {
            self.executor.dispatch(request.clone());
        }
        outcome
    }

    /// Apply every rename that has finished since the last call
    pub fn apply_rename_completions(&mut self) -> Vec<ApplyOutcome> {
        let completions = self.executor.drain();
        let mut outcomes = Vec::with_capacity(completions.len());
        for completion in completions {
            let mut renamed = None;
            let outcome =
                self.header
                    .rename
                    .apply(completion, &self.toasts, &self.cache, |name| {
                        renamed = Some(name.to_string());
                    });
            if let Some(name) = renamed {
                self.on_project_renamed(name);
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    fn on_project_renamed(&mut self, name: String) {
        info!(%name, "Project name committed");
        self.project_name = name;
    }

    /// Selection callback for the agent selector
    pub fn select_agent(&mut self, agent_id: Option<String>) {
        debug!(?agent_id, "Selection changed");
        self.selected_agent_id = agent_id;
    }

    /// Activate the highlighted agent menu row
    pub fn activate_menu_row(&mut self) {
        let mut chosen = None;
        self.selector
            .activate_cursor(self.services.navigator.as_ref(), |id| chosen = Some(id));
        if let Some(agent_id) = chosen {
            self.select_agent(agent_id);
        }
    }

    /// Leave billing for the upgrade page
    pub fn upgrade(&mut self) {
        self.header.upgrade(self.services.navigator.as_ref());
    }

    /// Fetch the agent list into the selector, blocking until it arrives
    ///
    /// A failed fetch is reported and leaves the list empty.
    pub fn load_agents(&mut self) {
        let result = self.services.agents.fetch_agents(&self.config.agents);
        self.apply_agents(result);
    }

    /// Schedule the first agent and project fetch for the next tick
    pub fn start_loading(&self) {
        self.cache.invalidate(&CacheKey::Agents);
        if let Some(project_id) = &self.header.project_id {
            self.cache.invalidate(&CacheKey::Project(project_id.clone()));
        }
    }

    fn apply_agents(&mut self, result: Result<AgentsResponse, ApiError>) {
        match result {
            Ok(response) => {
                let summaries: Vec<AgentSummary> =
                    response.agents.iter().map(AgentSummary::from).collect();
                self.cache.insert(
                    CacheKey::Agents,
                    serde_json::to_value(summaries).unwrap_or_default(),
                );
                self.selector.set_agents(response.agents);
            }
            Err(e) => {
                self.selector.finish_loading();
                self.toasts
                    .notify_error(&format!("Failed to load agents: {e}"));
            }
        }
    }

    /// Adopt a refetched project's name unless the title is being edited
    fn apply_project(&mut self, project_id: String, result: Result<Project, ApiError>) {
        match result {
            Ok(project) => {
                if self.header.project_id.as_deref() != Some(project_id.as_str()) {
                    return;
                }
                if !self.header.rename.is_editing() && !project.name.is_empty() {
                    self.project_name.clone_from(&project.name);
                }
                self.cache.insert(
                    CacheKey::Project(project_id),
                    serde_json::to_value(project).unwrap_or_default(),
                );
            }
            Err(e) => warn!(%project_id, "Failed to refetch project: {e}"),
        }
    }

    /// Start a fetch for every stale scope that has none outstanding
    fn dispatch_refetches(&mut self) {
        for key in self.cache.stale_keys() {
            if self.refetch.is_pending(&key) {
                continue;
            }
            if let CacheKey::Project(id) = &key
                && self.header.project_id.as_deref() != Some(id.as_str())
            {
                // Not ours; drop the marker
                self.cache.insert(key, serde_json::Value::Null);
                continue;
            }
            debug!(%key, "Refetching stale query");
            self.cache.clear_stale(&key);
            self.refetch.dispatch(key, &self.config.agents);
        }
    }

    fn apply_refetches(&mut self) {
        for fetched in self.refetch.drain() {
            match fetched {
                Refetched::Agents(result) => self.apply_agents(result),
                Refetched::Project(id, result) => self.apply_project(id, result),
            }
        }
    }

    /// Refetch usage if the last fetch is old enough
    pub fn refresh_usage(&mut self, now: DateTime<Utc>) {
        let due = self
            .usage_refreshed_at
            .is_none_or(|at| now - at >= Duration::seconds(USAGE_REFRESH_SECS));
        if due {
            self.services.usage.refresh();
            self.usage_refreshed_at = Some(now);
        }
    }

    /// Periodic work: apply renames, refetch stale data, expire toasts
    pub fn tick(&mut self) {
        self.apply_rename_completions();
        self.dispatch_refetches();
        self.apply_refetches();

        let now = Utc::now();
        self.refresh_usage(now);
        self.toasts.prune(now);
    }

    /// Effects that must run after a frame is drawn
    pub fn run_post_render_effects(&mut self) {
        if self.header.rename.take_focus_request() {
            debug!("Focused title field");
        }
    }

    /// Ask for the agent list to be refetched on the next tick
    pub fn request_agents_refresh(&self) {
        self.cache.invalidate(&CacheKey::Agents);
    }

    /// Flip the files panel
    pub const fn toggle_files(&mut self) {
        self.files_visible = !self.files_visible;
    }

    /// Flip the side panel
    pub const fn toggle_side_panel(&mut self) {
        self.side_panel_visible = !self.side_panel_visible;
    }

    /// Close whatever overlay is on top
    pub const fn close_overlay(&mut self) {
        match self.mode() {
            Mode::Help => self.help_open = false,
            Mode::Share => self.header.close_share(),
            Mode::Billing => self.header.close_billing(),
            Mode::Menu => self.selector.close_menu(),
            Mode::Tools => self.selector.close_tools(),
            Mode::Editing | Mode::Normal => {}
        }
    }
}
