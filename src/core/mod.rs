pub mod errors;
pub mod pod;
pub mod resources;
pub mod worker;

// exports for lazy devs like us
pub use errors::ClusterError;
pub use pod::{LifecycleDelays, Pod, PodState};
pub use resources::ResourceVector;
pub use worker::Worker;
