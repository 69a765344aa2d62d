//! Recursive content-provisioning core.
//! Materializes declarative node trees into a hierarchical content store:
//! idempotent creation, deterministic identifier derivation, ordered option
//! application, and child recursion.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod workflow;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::node::{ContentNode, NodeOptions};
pub use service::materializer::{
    MaterializeDefaults, MaterializeError, MaterializeResult, Materializer,
};
pub use service::observer::{LogObserver, MaterializeEvent, MaterializeObserver};
pub use store::{
    ContentStore, MemoryContentStore, MemoryObject, MemoryWorkflowEngine, ObjectCapability,
    ObjectPath, StoreError, StoreResult, TypeTraits,
};
pub use workflow::{NullWorkflowEngine, WorkflowEngine, WorkflowError, WorkflowResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
