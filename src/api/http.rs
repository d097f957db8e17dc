//! Blocking HTTP client for the backend API

use super::{AgentQuery, Project, ProjectQuery, ProjectUpdate, ProjectUpdater, UsageProvider};
use crate::agent::{AgentListParams, AgentsResponse};
use crate::config::Config;
use crate::error::ApiError;
use crate::usage::{UsageReport, UsageSnapshot, month_start};
use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;
use ureq::http::Response;

/// Client for the chat backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client for `base_url`
    #[must_use]
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        let config = ureq::config::Config::builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.new_agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create a client from the app configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.api_url,
            config.resolved_token(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut request = self.agent.get(&url);
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        for (key, value) in query {
            request = request.query(*key, value);
        }

        debug!(%url, "GET");
        let response = request
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = read_body(response)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch usage for the billing month containing now
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub fn fetch_usage(&self) -> Result<UsageReport, ApiError> {
        let since = month_start(Utc::now());
        self.get_json("billing/usage", &[("since", since.to_rfc3339())])
    }
}

/// Read the body, turning non-success statuses into [`ApiError::Status`]
fn read_body(response: Response<ureq::Body>) -> Result<String, ApiError> {
    let status = response.status();
    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }
}

/// Pull a human-readable message out of an error body
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|field| value.get(*field)?.as_str().map(str::to_string))
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

impl AgentQuery for HttpClient {
    fn fetch_agents(&self, params: &AgentListParams) -> Result<AgentsResponse, ApiError> {
        self.get_json(
            "agents",
            &[
                ("limit", params.limit.to_string()),
                ("sort_by", params.sort_by.clone()),
                ("sort_order", params.sort_order.as_str().to_string()),
            ],
        )
    }
}

/// Path of one project, with the id encoded as a single segment
fn project_path(project_id: &str) -> String {
    format!("projects/{}", urlencoding::encode(project_id))
}

impl ProjectQuery for HttpClient {
    fn fetch_project(&self, project_id: &str) -> Result<Project, ApiError> {
        self.get_json(&project_path(project_id), &[])
    }
}

impl ProjectUpdater for HttpClient {
    fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<Option<Project>, ApiError> {
        let url = self.url(&project_path(project_id));
        let mut request = self.agent.put(&url);
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }

        debug!(%url, name = %update.name, "PUT");
        let response = request
            .send_json(update)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = read_body(response)?;

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Usage provider backed by the billing endpoint
///
/// Reports a loading snapshot until the first successful refresh.
#[derive(Debug)]
pub struct HttpUsageProvider {
    client: Arc<HttpClient>,
    snapshot: Mutex<UsageSnapshot>,
}

impl HttpUsageProvider {
    /// Create a provider that has not fetched yet
    #[must_use]
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            snapshot: Mutex::new(UsageSnapshot::loading()),
        }
    }
}

impl UsageProvider for HttpUsageProvider {
    fn snapshot(&self) -> UsageSnapshot {
        *self.snapshot.lock()
    }

    fn refresh(&self) {
        match self.client.fetch_usage() {
            Ok(report) => {
                debug!(?report, "Fetched usage");
                *self.snapshot.lock() = report.into();
            }
            Err(e) => warn!("Failed to fetch usage: {e}"),
        }
    }
}
