use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::core::{ClusterError, LifecycleDelays, Pod, ResourceVector, Worker};
use crate::AsyncMutex;

// Scoring weights: compute scarcity matters most, storage least.
const COMPUTE_WEIGHT: f64 = 0.3;
const MEMORY_WEIGHT: f64 = 0.2;
const STORAGE_WEIGHT: f64 = 0.1;

/// The scheduler. Owns the worker set (append-only, registration order is
/// significant for tie-breaking) and the cluster-wide admission counter.
pub struct ClusterManager {
    workers: AsyncMutex<Vec<Arc<Worker>>>,
    pods_admitted: AtomicU64,
    fallback_capacity: ResourceVector,
    delays: LifecycleDelays,
}

impl ClusterManager {
    pub fn new(settings: &Settings) -> Self {
        let workers: Vec<Arc<Worker>> = settings
            .cluster
            .initial_workers
            .iter()
            .map(|spec| Worker::new(&spec.name, spec.capacity()))
            .collect();

        info!(workers = workers.len(), "cluster initialized");

        Self {
            workers: AsyncMutex::new(workers),
            pods_admitted: AtomicU64::new(0),
            fallback_capacity: settings.cluster.fallback_capacity(),
            delays: settings.lifecycle.delays(),
        }
    }

    /// Pods admitted so far, counting admissions whose placement never took.
    pub fn pods_admitted(&self) -> u64 {
        self.pods_admitted.load(Ordering::SeqCst)
    }

    /// Snapshot of the registered workers, in registration order.
    pub async fn workers(&self) -> Vec<Arc<Worker>> {
        self.workers.lock().await.clone()
    }

    /// Weighted score of a worker's currently available capacity.
    pub async fn score(&self, worker: &Worker) -> f64 {
        let available = worker.available().await;
        available.compute as f64 * COMPUTE_WEIGHT
            + available.memory as f64 * MEMORY_WEIGHT
            + available.storage as f64 * STORAGE_WEIGHT
    }

    /// Highest-scoring worker. Only a strictly greater score displaces the
    /// current best, so equal scores keep the earlier-registered worker.
    pub async fn select_best(&self) -> Option<Arc<Worker>> {
        let workers = self.workers.lock().await;
        self.best_of(&workers).await
    }

    async fn best_of(&self, workers: &[Arc<Worker>]) -> Option<Arc<Worker>> {
        let mut best: Option<Arc<Worker>> = None;
        let mut best_score = -1.0_f64;

        for worker in workers {
            let score = self.score(worker).await;
            if score > best_score {
                best_score = score;
                best = Some(Arc::clone(worker));
            }
        }

        best
    }

    /// Admit a pod into the cluster. Places it on the best-scoring worker
    /// that can host it, or provisions a fresh worker from the fallback
    /// template and places it there without a prior fit check. A requirement
    /// too large even for the template leaves the pod parked in Starting
    /// forever; that surfaces as `InsufficientCapacity`, but the admission
    /// counter increments either way. No retry, no backoff, no preemption.
    pub async fn admit(&self, pod: Arc<Pod>) -> Result<Arc<Worker>, ClusterError> {
        let mut workers = self.workers.lock().await;

        let mut target: Option<Arc<Worker>> = None;
        if let Some(best) = self.best_of(&workers).await {
            if best.can_host(pod.requested()).await {
                target = Some(best);
            }
        }

        let outcome = match target {
            Some(worker) => {
                worker.place(Arc::clone(&pod), self.delays).await;
                Ok(worker)
            }
            None => {
                let worker = Worker::new(
                    format!("worker-{}", workers.len() + 1),
                    self.fallback_capacity,
                );
                workers.push(Arc::clone(&worker));
                info!(worker = %worker.name(), capacity = %worker.capacity(), "provisioned fallback worker");

                if worker.place(Arc::clone(&pod), self.delays).await {
                    Ok(worker)
                } else {
                    Err(ClusterError::InsufficientCapacity {
                        pod: pod.name().to_string(),
                        requested: *pod.requested(),
                        template: self.fallback_capacity,
                    })
                }
            }
        };

        self.pods_admitted.fetch_add(1, Ordering::SeqCst);
        outcome
    }

    /// Admit `count` pods with randomized requirements, one after another.
    /// The generator is injected so batches are reproducible under a fixed
    /// seed. Returns the created pods; admission failures are logged and do
    /// not stop the batch.
    pub async fn create_pods<R: Rng>(&self, count: u32, rng: &mut R) -> Vec<Arc<Pod>> {
        let mut pods = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let requested = ResourceVector::new(
                rng.gen_range(1..3),
                rng.gen_range(1001..3001),
                rng.gen_range(1..201),
            );
            let pod = Pod::new(format!("pod-{}", self.pods_admitted()), requested);

            if let Err(e) = self.admit(Arc::clone(&pod)).await {
                warn!("admission failed: {e}");
            }
            pods.push(pod);
        }

        pods
    }
}
