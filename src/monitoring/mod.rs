pub mod status;

pub use status::{gather, ClusterStatus, PodRow, WorkerStatus};
