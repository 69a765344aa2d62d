//! Declarative input model for content provisioning.
//!
//! # Responsibility
//! - Define the node-tree shape callers hand to the materializer.
//! - Keep one canonical description usable in-memory or decoded from JSON.
//!
//! # Invariants
//! - Descriptions are plain data; no store access happens in this layer.

pub mod node;
