//! Estado mutable de una ejecución.

mod status;
mod workflow_instance;

pub use status::InstanceStatus;
pub use workflow_instance::WorkflowInstance;
