use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock, Weak};
use std::time::Duration;
use tokio::time;
use tracing::{info, warn};

use super::errors::ClusterError;
use super::resources::ResourceVector;
use super::worker::Worker;

/// Lifecycle state of a pod. Transitions are strictly one-directional:
/// Starting -> Running -> Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodState {
    Starting,
    Running,
    Finished,
}

impl fmt::Display for PodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodState::Starting => write!(f, "STARTING"),
            PodState::Running => write!(f, "RUNNING"),
            PodState::Finished => write!(f, "FINISHED"),
        }
    }
}

/// Simulated durations a pod spends in each non-terminal state.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleDelays {
    pub start: Duration,
    pub run: Duration,
}

pub struct Pod {
    name: String,
    requested: ResourceVector,
    state: RwLock<PodState>,
    // Non-owning back-reference to the host, set once at placement.
    host: OnceLock<Weak<Worker>>,
}

impl Pod {
    pub fn new(name: impl Into<String>, requested: ResourceVector) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            requested,
            state: RwLock::new(PodState::Starting),
            host: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requested(&self) -> &ResourceVector {
        &self.requested
    }

    pub fn state(&self) -> PodState {
        *self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    pub fn host_name(&self) -> Option<String> {
        self.host
            .get()
            .and_then(Weak::upgrade)
            .map(|w| w.name().to_string())
    }

    /// Record the hosting worker. Returns false if a host was already bound;
    /// the assignment is never overwritten.
    pub(crate) fn bind_host(&self, worker: &Arc<Worker>) -> bool {
        self.host.set(Arc::downgrade(worker)).is_ok()
    }

    fn advance(&self, next: PodState) {
        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        *state = next;
    }

    /// The lifecycle task body. Waits through the two fixed delays, advancing
    /// the state at each step, then notifies the host exactly once. Nothing
    /// can fast-forward or cancel the sequence short of runtime shutdown, in
    /// which case the reserved capacity is never reclaimed.
    pub(crate) async fn run(self: Arc<Self>, delays: LifecycleDelays) {
        info!(pod = %self.name, "pod starting");
        time::sleep(delays.start).await;
        self.advance(PodState::Running);
        info!(pod = %self.name, "pod running");
        time::sleep(delays.run).await;
        self.advance(PodState::Finished);
        info!(pod = %self.name, "pod finished");

        match self.host.get().and_then(Weak::upgrade) {
            Some(worker) => worker.on_pod_finished(&self).await,
            None => {
                let err = ClusterError::LifecycleInterrupted {
                    pod: self.name.clone(),
                };
                warn!(pod = %self.name, "{err}; capacity not reclaimed");
            }
        }
    }
}

impl fmt::Debug for Pod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pod")
            .field("name", &self.name)
            .field("requested", &self.requested)
            .field("state", &self.state())
            .finish()
    }
}
