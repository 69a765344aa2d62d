//! Workflow Engine contract.
//!
//! # Responsibility
//! - Define the single operation the materializer needs from an external
//!   workflow service: applying a named transition to an object.
//! - Split the error taxonomy into the one recoverable condition and
//!   everything else.
//!
//! # Invariants
//! - `NotApplicable` means the object has no workflow attached or the named
//!   transition is not offered in its current state; callers may continue.
//! - Every other failure is fatal and propagated unchanged.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by workflow-engine operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors from workflow-transition application.
#[derive(Debug)]
pub enum WorkflowError {
    /// Object has no applicable workflow or the transition is not offered.
    /// Recoverable: the materializer logs a warning and continues.
    NotApplicable { action: String, reason: String },
    /// Any other engine failure. Fatal.
    Engine(String),
}

impl Display for WorkflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotApplicable { action, reason } => {
                write!(f, "workflow transition `{action}` not applicable: {reason}")
            }
            Self::Engine(message) => write!(f, "workflow engine failure: {message}"),
        }
    }
}

impl Error for WorkflowError {}

/// Required operations on an external workflow engine, generic over the
/// content store's handle type.
pub trait WorkflowEngine<H> {
    /// Applies one named transition to the object behind `handle`.
    fn apply_transition(&self, handle: &H, action: &str) -> WorkflowResult<()>;
}

/// Engine for stores with no workflow service attached: every transition is
/// reported as not applicable, which the materializer treats as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWorkflowEngine;

impl<H> WorkflowEngine<H> for NullWorkflowEngine {
    fn apply_transition(&self, _handle: &H, action: &str) -> WorkflowResult<()> {
        Err(WorkflowError::NotApplicable {
            action: action.to_string(),
            reason: "no workflow engine attached".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NullWorkflowEngine, WorkflowEngine, WorkflowError};

    #[test]
    fn null_engine_reports_not_applicable() {
        let engine = NullWorkflowEngine;
        let err = engine
            .apply_transition(&"handle", "publish")
            .expect_err("null engine must decline transitions");
        match err {
            WorkflowError::NotApplicable { action, .. } => assert_eq!(action, "publish"),
            other => panic!("expected NotApplicable, got {other}"),
        }
    }
}
