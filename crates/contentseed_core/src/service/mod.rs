//! Provisioning use-case services.
//!
//! # Responsibility
//! - Orchestrate store and workflow collaborators into the tree
//!   materialization use case.
//! - Keep callers decoupled from repository and engine details.

pub mod materializer;
pub mod observer;
