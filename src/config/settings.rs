use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::core::{LifecycleDelays, ResourceVector};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub cluster: ClusterSettings,
    pub lifecycle: LifecycleSettings,
    pub workload: WorkloadSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// Workers registered at startup, in order.
    pub initial_workers: Vec<WorkerSpec>,
    /// Capacity template for workers provisioned on demand.
    pub fallback_compute: i64,
    pub fallback_memory: i64,
    pub fallback_storage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSpec {
    pub name: String,
    pub compute: i64,
    pub memory: i64,
    pub storage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleSettings {
    pub start_delay_ms: u64,
    pub run_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSettings {
    /// Fixed seed for pod generation; omit for entropy-seeded runs.
    pub seed: Option<u64>,
}

impl WorkerSpec {
    pub fn capacity(&self) -> ResourceVector {
        ResourceVector::new(self.compute, self.memory, self.storage)
    }
}

impl ClusterSettings {
    pub fn fallback_capacity(&self) -> ResourceVector {
        ResourceVector::new(
            self.fallback_compute,
            self.fallback_memory,
            self.fallback_storage,
        )
    }
}

impl LifecycleSettings {
    pub fn delays(&self) -> LifecycleDelays {
        LifecycleDelays {
            start: Duration::from_millis(self.start_delay_ms),
            run: Duration::from_millis(self.run_delay_ms),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cluster: ClusterSettings {
                initial_workers: vec![
                    WorkerSpec {
                        name: "worker-1".to_string(),
                        compute: 12,
                        memory: 16000,
                        storage: 20000,
                    },
                    WorkerSpec {
                        name: "worker-2".to_string(),
                        compute: 16,
                        memory: 20000,
                        storage: 20000,
                    },
                ],
                fallback_compute: 12,
                fallback_memory: 16000,
                fallback_storage: 20000,
            },
            lifecycle: LifecycleSettings {
                start_delay_ms: 10_000,
                run_delay_ms: 60_000,
            },
            workload: WorkloadSettings { seed: None },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());

        info!("Loading configuration from path: {}", config_path);

        let config = Config::builder()
            // Start with hardcoded defaults
            .add_source(Config::try_from(&Settings::default())?)
            // Layer configuration files on top, when present
            .add_source(File::with_name(&format!("{}/default", config_path)).required(false))
            .add_source(File::with_name(&format!("{}/local", config_path)).required(false))
            // Environment variables with prefix "APP_" win
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn new_from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.to_path_buf()))
            .build()?;

        config.try_deserialize()
    }
}

pub fn generate_default_config() -> Settings {
    Settings::default()
}
