//! Running backend requests off the UI thread
//!
//! A dispatched rename runs on its own thread and reports back through a
//! channel. The event loop drains finished requests on every tick, so the
//! header keeps responding while requests are in flight and several requests
//! may be outstanding at once. Cache refetches go through [`RefetchWorker`]
//! the same way.

use super::rename::{PendingRename, RenameCompletion};
use crate::agent::{AgentListParams, AgentsResponse};
use crate::api::{AgentQuery, Project, ProjectQuery, ProjectUpdate, ProjectUpdater};
use crate::cache::CacheKey;
use crate::error::ApiError;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, error};

/// Runs rename requests and hands back their completions
pub trait RenameExecutor: fmt::Debug {
    /// Start `request`; must not block on the network
    fn dispatch(&mut self, request: PendingRename);

    /// Completions that finished since the last call, in arrival order
    fn drain(&mut self) -> Vec<RenameCompletion>;

    /// Requests dispatched but not yet drained
    fn in_flight(&self) -> usize;

    /// Whether requests complete before `dispatch` returns
    fn is_synchronous(&self) -> bool {
        false
    }
}

fn run(updater: &dyn ProjectUpdater, request: PendingRename) -> RenameCompletion {
    let update = ProjectUpdate {
        name: request.new_name.clone(),
    };
    let result = updater.update_project(&request.project_id, &update);
    RenameCompletion { request, result }
}

/// Executor that spawns a thread per request
pub struct BackgroundExecutor {
    updater: Arc<dyn ProjectUpdater>,
    tx: Sender<RenameCompletion>,
    rx: Receiver<RenameCompletion>,
    in_flight: usize,
}

impl fmt::Debug for BackgroundExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundExecutor")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl BackgroundExecutor {
    /// Create an executor calling `updater`
    #[must_use]
    pub fn new(updater: Arc<dyn ProjectUpdater>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            updater,
            tx,
            rx,
            in_flight: 0,
        }
    }
}

impl RenameExecutor for BackgroundExecutor {
    fn dispatch(&mut self, request: PendingRename) {
        let updater = Arc::clone(&self.updater);
        let tx = self.tx.clone();
        let generation = request.generation;
        self.in_flight += 1;

        std::thread::spawn(move || {
            let completion = run(updater.as_ref(), request);
            if tx.send(completion).is_err() {
                // Receiver gone: the app is shutting down
                debug!(generation, "Dropped rename completion after shutdown");
            }
        });
    }

    fn drain(&mut self) -> Vec<RenameCompletion> {
        let mut completions = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(completion) => completions.push(completion),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Rename channel disconnected");
                    break;
                }
            }
        }
        self.in_flight = self.in_flight.saturating_sub(completions.len());
        completions
    }

    fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Executor that runs requests synchronously and queues the results
///
/// Completions still only surface through [`RenameExecutor::drain`], so the
/// caller observes the same ordering as with [`BackgroundExecutor`].
pub struct InlineExecutor {
    updater: Arc<dyn ProjectUpdater>,
    done: VecDeque<RenameCompletion>,
}

impl fmt::Debug for InlineExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineExecutor")
            .field("done", &self.done.len())
            .finish_non_exhaustive()
    }
}

impl InlineExecutor {
    /// Create an executor calling `updater`
    #[must_use]
    pub fn new(updater: Arc<dyn ProjectUpdater>) -> Self {
        Self {
            updater,
            done: VecDeque::new(),
        }
    }
}

impl RenameExecutor for InlineExecutor {
    fn dispatch(&mut self, request: PendingRename) {
        let completion = run(self.updater.as_ref(), request);
        self.done.push_back(completion);
    }

    fn drain(&mut self) -> Vec<RenameCompletion> {
        self.done.drain(..).collect()
    }

    fn in_flight(&self) -> usize {
        self.done.len()
    }

    fn is_synchronous(&self) -> bool {
        true
    }
}

/// A finished cache refetch
#[derive(Debug)]
pub enum Refetched {
    /// The agent list
    Agents(Result<AgentsResponse, ApiError>),
    /// One project, by id
    Project(String, Result<Project, ApiError>),
}

impl Refetched {
    /// Cache scope this result belongs to
    #[must_use]
    pub fn key(&self) -> CacheKey {
        match self {
            Self::Agents(_) => CacheKey::Agents,
            Self::Project(id, _) => CacheKey::Project(id.clone()),
        }
    }
}

/// Refetches stale cache scopes, at most one request per scope at a time
pub struct RefetchWorker {
    agents: Arc<dyn AgentQuery + Send + Sync>,
    projects: Arc<dyn ProjectQuery + Send + Sync>,
    background: bool,
    tx: Sender<Refetched>,
    rx: Receiver<Refetched>,
    pending: HashSet<CacheKey>,
}

impl fmt::Debug for RefetchWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefetchWorker")
            .field("background", &self.background)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl RefetchWorker {
    /// Worker that fetches on a spawned thread per request
    #[must_use]
    pub fn background(
        agents: Arc<dyn AgentQuery + Send + Sync>,
        projects: Arc<dyn ProjectQuery + Send + Sync>,
    ) -> Self {
        Self::with_mode(agents, projects, true)
    }

    /// Worker that fetches before `dispatch` returns
    #[must_use]
    pub fn inline(
        agents: Arc<dyn AgentQuery + Send + Sync>,
        projects: Arc<dyn ProjectQuery + Send + Sync>,
    ) -> Self {
        Self::with_mode(agents, projects, false)
    }

    fn with_mode(
        agents: Arc<dyn AgentQuery + Send + Sync>,
        projects: Arc<dyn ProjectQuery + Send + Sync>,
        background: bool,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            agents,
            projects,
            background,
            tx,
            rx,
            pending: HashSet::new(),
        }
    }

    /// Whether a fetch for `key` is still outstanding
    #[must_use]
    pub fn is_pending(&self, key: &CacheKey) -> bool {
        self.pending.contains(key)
    }

    /// Start fetching `key`; returns false if one is already outstanding
    pub fn dispatch(&mut self, key: CacheKey, params: &AgentListParams) -> bool {
        if !self.pending.insert(key.clone()) {
            return false;
        }
        let agents = Arc::clone(&self.agents);
        let projects = Arc::clone(&self.projects);
        let params = params.clone();
        let job = move || match key {
            CacheKey::Agents => Refetched::Agents(agents.fetch_agents(&params)),
            CacheKey::Project(id) => {
                let result = projects.fetch_project(&id);
                Refetched::Project(id, result)
            }
        };

        if self.background {
            let tx = self.tx.clone();
            std::thread::spawn(move || {
                if tx.send(job()).is_err() {
                    debug!("Dropped refetch result after shutdown");
                }
            });
        } else if self.tx.send(job()).is_err() {
            error!("Refetch channel disconnected");
        }
        true
    }

    /// Results that arrived since the last call
    pub fn drain(&mut self) -> Vec<Refetched> {
        let mut done = Vec::new();
        while let Ok(fetched) = self.rx.try_recv() {
            self.pending.remove(&fetched.key());
            done.push(fetched);
        }
        done
    }
}
