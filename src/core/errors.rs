use thiserror::Error;

use super::resources::ResourceVector;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("insufficient capacity for pod {pod}: requested {requested}, even a fresh worker with {template} cannot host it")]
    InsufficientCapacity {
        pod: String,
        requested: ResourceVector,
        template: ResourceVector,
    },

    #[error("lifecycle of pod {pod} interrupted before completion")]
    LifecycleInterrupted { pod: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
