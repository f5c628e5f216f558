use std::sync::Arc;
use tracing::{debug, info, warn};

use super::pod::{LifecycleDelays, Pod, PodState};
use super::resources::ResourceVector;
use crate::AsyncMutex;

struct HostedPod {
    pod: Arc<Pod>,
    released: bool,
}

/// The worker's ledger: available capacity plus the pods charged against it.
/// Only ever touched while holding the worker's lock.
struct Ledger {
    available: ResourceVector,
    hosted: Vec<HostedPod>,
}

pub struct Worker {
    name: String,
    capacity: ResourceVector,
    ledger: AsyncMutex<Ledger>,
}

impl Worker {
    pub fn new(name: impl Into<String>, capacity: ResourceVector) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            capacity,
            ledger: AsyncMutex::new(Ledger {
                available: capacity,
                hosted: Vec::new(),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> &ResourceVector {
        &self.capacity
    }

    /// Current available capacity. A scoring read; may be stale by the time
    /// the caller acts on it, which is fine because `place` re-validates
    /// under the lock.
    pub async fn available(&self) -> ResourceVector {
        self.ledger.lock().await.available
    }

    /// Pure fit predicate against the current ledger.
    pub async fn can_host(&self, requested: &ResourceVector) -> bool {
        self.ledger.lock().await.available.fits(requested)
    }

    /// Attempt to place a pod on this worker. The fit check, the reservation,
    /// the hosted-set append and the host binding all happen inside one
    /// critical section; the lifecycle task is spawned before the lock is
    /// released so a completion can never race ahead of the reservation.
    ///
    /// Returns false (and changes nothing) when the pod does not fit. Callers
    /// that skip their own fit check get a silent non-placement, not an error.
    pub async fn place(self: &Arc<Self>, pod: Arc<Pod>, delays: LifecycleDelays) -> bool {
        let mut ledger = self.ledger.lock().await;

        if !ledger.available.fits(pod.requested()) {
            warn!(
                worker = %self.name,
                pod = %pod.name(),
                requested = %pod.requested(),
                available = %ledger.available,
                "placement rejected: requirement does not fit"
            );
            return false;
        }

        ledger.available.reserve(pod.requested());
        ledger.hosted.push(HostedPod {
            pod: Arc::clone(&pod),
            released: false,
        });
        pod.bind_host(self);

        info!(
            worker = %self.name,
            pod = %pod.name(),
            requested = %pod.requested(),
            "pod placed"
        );

        tokio::spawn(Arc::clone(&pod).run(delays));
        true
    }

    /// Completion callback invoked by a pod's lifecycle task. Releases the
    /// pod's reservation at most once: only for a pod this worker actually
    /// hosts, only once it is Finished, and never twice for the same pod.
    pub async fn on_pod_finished(&self, pod: &Arc<Pod>) {
        if pod.state() != PodState::Finished {
            return;
        }

        let mut guard = self.ledger.lock().await;
        let ledger = &mut *guard;
        let entry = ledger
            .hosted
            .iter_mut()
            .find(|h| Arc::ptr_eq(&h.pod, pod));

        match entry {
            Some(h) if !h.released => {
                h.released = true;
                ledger.available.release(pod.requested());
                debug!(worker = %self.name, pod = %pod.name(), "capacity released");
            }
            Some(_) => {
                debug!(worker = %self.name, pod = %pod.name(), "duplicate completion ignored");
            }
            None => {
                warn!(worker = %self.name, pod = %pod.name(), "completion for unknown pod");
            }
        }
    }

    /// Snapshot of (available, hosted pods) for status reporting. Holds the
    /// lock only long enough to copy; pod states keep moving afterwards.
    pub async fn snapshot(&self) -> (ResourceVector, Vec<Arc<Pod>>) {
        let ledger = self.ledger.lock().await;
        let pods = ledger.hosted.iter().map(|h| Arc::clone(&h.pod)).collect();
        (ledger.available, pods)
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .finish()
    }
}
