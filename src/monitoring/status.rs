use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{PodState, ResourceVector};
use crate::scheduler::ClusterManager;

/// Point-in-time view of the whole cluster. Gathered without freezing the
/// cluster, so in-flight lifecycles may move a pod's state between the worker
/// rows and the pod rows being built; the view is approximate by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub captured_at: DateTime<Utc>,
    pub pods_admitted: u64,
    pub workers: Vec<WorkerStatus>,
    pub pods: Vec<PodRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub name: String,
    pub compute_used: i64,
    pub compute_total: i64,
    pub memory_used: i64,
    pub memory_total: i64,
    pub storage_used: i64,
    pub storage_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodRow {
    pub name: String,
    pub requested: ResourceVector,
    pub state: PodState,
    pub worker: String,
}

/// Walk every worker and its hosted pods, computing used = capacity - available
/// per dimension. Each worker's ledger is locked only for the copy.
pub async fn gather(manager: &ClusterManager) -> ClusterStatus {
    let mut workers = Vec::new();
    let mut pods = Vec::new();

    for worker in manager.workers().await {
        let (available, hosted) = worker.snapshot().await;
        let capacity = worker.capacity();

        workers.push(WorkerStatus {
            name: worker.name().to_string(),
            compute_used: capacity.compute - available.compute,
            compute_total: capacity.compute,
            memory_used: capacity.memory - available.memory,
            memory_total: capacity.memory,
            storage_used: capacity.storage - available.storage,
            storage_total: capacity.storage,
        });

        for pod in hosted {
            pods.push(PodRow {
                name: pod.name().to_string(),
                requested: *pod.requested(),
                state: pod.state(),
                worker: worker.name().to_string(),
            });
        }
    }

    ClusterStatus {
        captured_at: Utc::now(),
        pods_admitted: manager.pods_admitted(),
        workers,
        pods,
    }
}
