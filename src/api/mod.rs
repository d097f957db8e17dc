//! Collaborator interfaces for the backend and the host environment
//!
//! The UI never talks to the network or the browser directly. Everything it
//! needs from the outside world comes through one of these traits, which keeps
//! the header and selector testable with in-memory doubles.

mod http;
mod navigate;

pub use http::{HttpClient, HttpUsageProvider};
pub use navigate::{BrowserNavigator, RecordingNavigator};

pub use crate::cache::CacheInvalidator;

use crate::agent::{AgentListParams, AgentsResponse};
use crate::error::ApiError;
use crate::usage::UsageSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A project as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Backend identifier
    pub project_id: String,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of a project update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectUpdate {
    /// New project name
    pub name: String,
}

/// Read-only agent listing
pub trait AgentQuery {
    /// Fetch a page of agents
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    fn fetch_agents(&self, params: &AgentListParams) -> Result<AgentsResponse, ApiError>;
}

/// Project lookup, used to refetch after invalidation
pub trait ProjectQuery {
    /// Fetch one project
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    fn fetch_project(&self, project_id: &str) -> Result<Project, ApiError>;
}

/// The rename operation
///
/// Implementations run on the rename worker thread, hence `Send + Sync`.
pub trait ProjectUpdater: Send + Sync {
    /// Persist `update` for `project_id`
    ///
    /// `Ok(None)` means the server accepted the request but returned no
    /// project; callers treat that as a failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<Option<Project>, ApiError>;
}

/// User-visible notification channel
pub trait Notifier {
    /// Report a failure
    fn notify_error(&self, message: &str);

    /// Report a success
    fn notify_success(&self, message: &str);
}

/// Opens frontend routes
pub trait Navigator {
    /// Navigate to `route` (e.g. `/agents`); fire-and-forget
    fn navigate(&self, route: &str);
}

/// Source of the usage snapshot shown in the header
pub trait UsageProvider {
    /// Latest snapshot; never blocks
    fn snapshot(&self) -> UsageSnapshot;

    /// Refetch usage from its source
    fn refresh(&self) {}
}

/// A fixed usage snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticUsage(pub UsageSnapshot);

impl UsageProvider for StaticUsage {
    fn snapshot(&self) -> UsageSnapshot {
        self.0
    }
}

/// The full set of collaborators the app talks to
pub struct Services {
    /// Agent listing
    pub agents: Arc<dyn AgentQuery + Send + Sync>,
    /// Project lookup
    pub projects: Arc<dyn ProjectQuery + Send + Sync>,
    /// Rename operation
    pub updater: Arc<dyn ProjectUpdater>,
    /// Usage snapshot source
    pub usage: Box<dyn UsageProvider>,
    /// Route opener
    pub navigator: Box<dyn Navigator>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("usage", &self.usage.snapshot())
            .finish_non_exhaustive()
    }
}

impl Services {
    /// Wire every backend collaborator to a single HTTP client
    #[must_use]
    pub fn from_http(client: HttpClient, navigator: Box<dyn Navigator>) -> Self {
        let client = Arc::new(client);
        Self {
            agents: client.clone(),
            projects: client.clone(),
            updater: client.clone(),
            usage: Box::new(HttpUsageProvider::new(client)),
            navigator,
        }
    }
}
