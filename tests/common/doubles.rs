//! In-memory collaborators for driving the library without a network

use parking_lot::Mutex;
use std::sync::Arc;
use threadbar::agent::{AgentListParams, AgentsResponse};
use threadbar::api::{
    AgentQuery, CacheInvalidator, Notifier, Project, ProjectQuery, ProjectUpdate,
    ProjectUpdater, RecordingNavigator, Services, StaticUsage,
};
use threadbar::app::{InlineExecutor, ThreadContext};
use threadbar::cache::CacheKey;
use threadbar::usage::UsageSnapshot;
use threadbar::{Agent, ApiError, App, Config};

/// How the stub backend answers rename requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameMode {
    /// Echo the project back with the new name
    Succeed,
    /// Reject with a status error
    Fail,
    /// Answer with an empty body
    Empty,
}

/// Stub backend recording every rename call
#[derive(Debug)]
pub struct Backend {
    pub agents: Vec<Agent>,
    pub rename_mode: RenameMode,
    pub updates: Mutex<Vec<(String, String)>>,
}

impl Backend {
    pub fn new(agents: Vec<Agent>, rename_mode: RenameMode) -> Self {
        Self {
            agents,
            rename_mode,
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().len()
    }
}

impl AgentQuery for Backend {
    fn fetch_agents(&self, _params: &AgentListParams) -> Result<AgentsResponse, ApiError> {
        Ok(AgentsResponse {
            agents: self.agents.clone(),
        })
    }
}

impl ProjectQuery for Backend {
    fn fetch_project(&self, project_id: &str) -> Result<Project, ApiError> {
        Err(ApiError::Transport(format!("no project {project_id}")))
    }
}

impl ProjectUpdater for Backend {
    fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<Option<Project>, ApiError> {
        self.updates
            .lock()
            .push((project_id.to_string(), update.name.clone()));
        match self.rename_mode {
            RenameMode::Succeed => Ok(Some(Project {
                project_id: project_id.to_string(),
                name: update.name.clone(),
                description: None,
            })),
            RenameMode::Fail => Err(ApiError::Status {
                status: 500,
                message: "Request failed with status 500".to_string(),
            }),
            RenameMode::Empty => Ok(None),
        }
    }
}

/// Notifier that keeps every message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub errors: Mutex<Vec<String>>,
    pub successes: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn notify_success(&self, message: &str) {
        self.successes.lock().push(message.to_string());
    }
}

/// Invalidator that keeps every key
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    pub keys: Mutex<Vec<CacheKey>>,
}

impl CacheInvalidator for RecordingInvalidator {
    fn invalidate(&self, key: &CacheKey) {
        self.keys.lock().push(key.clone());
    }
}

/// App wired to `backend`, running renames inline
pub fn build_app(
    backend: &Arc<Backend>,
    project_id: Option<&str>,
    project_name: &str,
    usage: UsageSnapshot,
) -> (App, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let services = Services {
        agents: backend.clone(),
        projects: backend.clone(),
        updater: backend.clone(),
        usage: Box::new(StaticUsage(usage)),
        navigator: Box::new(navigator.clone()),
    };
    let mut app = App::with_executor(
        Config::default(),
        ThreadContext {
            thread_id: "t1".to_string(),
            project_id: project_id.map(str::to_string),
            project_name: project_name.to_string(),
            agent_id: None,
        },
        services,
        Box::new(InlineExecutor::new(backend.clone())),
    );
    app.load_agents();
    (app, navigator)
}
