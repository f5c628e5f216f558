// Scheduler test suite: scoring, tie-breaks, fallback provisioning.

use anyhow::Result;
use pod_cluster_sim::config::settings::{Settings, WorkerSpec};
use pod_cluster_sim::{ClusterError, ClusterManager, Pod, PodState, ResourceVector};
use std::sync::Arc;
use std::time::Duration;

// Long lifecycle delays so no pod finishes (and releases capacity) while a
// scheduling assertion is running.
fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.lifecycle.start_delay_ms = 100;
    settings.lifecycle.run_delay_ms = 60_000;
    settings
}

fn spec(name: &str, compute: i64, memory: i64, storage: i64) -> WorkerSpec {
    WorkerSpec {
        name: name.to_string(),
        compute,
        memory,
        storage,
    }
}

#[tokio::test]
async fn admits_to_highest_scoring_worker() -> Result<()> {
    let manager = ClusterManager::new(&test_settings());

    let pod = Pod::new("pod-0", ResourceVector::new(2, 1500, 50));
    let worker = manager.admit(Arc::clone(&pod)).await?;

    // worker-2 scores 6004.8 against worker-1's 5203.6
    assert_eq!(worker.name(), "worker-2");
    assert_eq!(
        worker.available().await,
        ResourceVector::new(14, 18500, 19950)
    );
    assert_eq!(pod.host_name().as_deref(), Some("worker-2"));
    assert_eq!(manager.pods_admitted(), 1);
    Ok(())
}

#[tokio::test]
async fn tie_break_keeps_first_registered_worker() {
    let mut settings = test_settings();
    settings.cluster.initial_workers = vec![
        spec("node-a", 12, 16000, 20000),
        spec("node-b", 12, 16000, 20000),
    ];

    let manager = ClusterManager::new(&settings);
    let best = manager.select_best().await.expect("cluster has workers");
    assert_eq!(best.name(), "node-a");
}

#[tokio::test]
async fn overflow_provisions_fallback_workers_and_counts_all_admissions() -> Result<()> {
    let manager = ClusterManager::new(&test_settings());
    let requested = ResourceVector::new(3, 3000, 200);

    for i in 0..100 {
        let pod = Pod::new(format!("pod-{i}"), requested);
        manager.admit(pod).await?;
    }

    assert_eq!(manager.pods_admitted(), 100);

    // worker-1 hosts 4 pods (compute-bound), worker-2 hosts 5; every
    // fallback worker carries the (12, 16000, 20000) template and takes 4.
    let workers = manager.workers().await;
    assert_eq!(workers.len(), 25);
    for worker in workers.iter().skip(2) {
        assert_eq!(*worker.capacity(), ResourceVector::new(12, 16000, 20000));
    }
    Ok(())
}

// The greedy scheduler only ever consults the single best-scoring worker: a
// lower-scoring worker that could host the pod is passed over in favor of a
// fresh fallback worker.
#[tokio::test]
async fn lower_scoring_fit_is_passed_over_for_fallback() -> Result<()> {
    let mut settings = test_settings();
    settings.cluster.initial_workers = vec![
        spec("small-cpu", 2, 30000, 30000),
        spec("small-mem", 16, 1000, 1000),
    ];

    let manager = ClusterManager::new(&settings);
    let pod = Pod::new("pod-0", ResourceVector::new(10, 500, 500));
    let worker = manager.admit(pod).await?;

    assert_eq!(worker.name(), "worker-3");
    assert_eq!(manager.workers().await.len(), 3);
    Ok(())
}

#[tokio::test]
async fn oversized_pod_is_admitted_but_never_starts() -> Result<()> {
    let manager = ClusterManager::new(&test_settings());

    let pod = Pod::new("pod-huge", ResourceVector::new(999, 1, 1));
    let result = manager.admit(Arc::clone(&pod)).await;
    assert!(matches!(
        result,
        Err(ClusterError::InsufficientCapacity { .. })
    ));

    // The admission counter increments even though placement no-opped.
    assert_eq!(manager.pods_admitted(), 1);

    // A fallback worker was still provisioned, and its ledger is untouched.
    let workers = manager.workers().await;
    assert_eq!(workers.len(), 3);
    let fallback = workers.last().expect("fallback worker registered");
    assert_eq!(fallback.name(), "worker-3");
    assert_eq!(fallback.available().await, *fallback.capacity());

    // No lifecycle was spawned: well past the start delay the pod is still
    // parked in Starting with no host bound.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(pod.state(), PodState::Starting);
    assert_eq!(pod.host_name(), None);
    Ok(())
}

#[tokio::test]
async fn create_pods_is_deterministic_under_a_seed() -> Result<()> {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let settings = test_settings();

    let manager_a = ClusterManager::new(&settings);
    let mut rng = StdRng::seed_from_u64(42);
    let batch_a = manager_a.create_pods(10, &mut rng).await;

    let manager_b = ClusterManager::new(&settings);
    let mut rng = StdRng::seed_from_u64(42);
    let batch_b = manager_b.create_pods(10, &mut rng).await;

    assert_eq!(manager_a.pods_admitted(), 10);
    for (a, b) in batch_a.iter().zip(&batch_b) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.requested(), b.requested());
        // Generation ranges from the workload formula
        assert!((1..3).contains(&a.requested().compute));
        assert!((1001..3001).contains(&a.requested().memory));
        assert!((1..201).contains(&a.requested().storage));
    }
    Ok(())
}
