pub mod cli;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod scheduler;

// Re-exports
pub use crate::config::settings::Settings;
pub use crate::core::{ClusterError, LifecycleDelays, Pod, PodState, ResourceVector, Worker};
pub use crate::monitoring::status::ClusterStatus;
pub use crate::scheduler::ClusterManager;
pub type AsyncMutex<T> = tokio::sync::Mutex<T>;
