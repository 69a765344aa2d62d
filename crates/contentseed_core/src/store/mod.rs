//! Content Store contract and reference implementation.
//!
//! # Responsibility
//! - Define the narrow interface the materializer needs from a hierarchical
//!   content repository.
//! - Keep repository details (storage, indexing, type registries) behind the
//!   trait boundary.
//!
//! # Invariants
//! - `normalize_id` is deterministic for the same input and context.
//! - `create` rejects unknown types, malformed fields and duplicate ids; the
//!   materializer never validates field schemas itself.
//! - Capability-gated mutators are only called after `supports` returns true.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod capability;
pub mod memory;

pub use capability::ObjectCapability;
pub use memory::{MemoryContentStore, MemoryObject, MemoryWorkflowEngine, TypeTraits};

/// Result type used by content-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from content-store operations. All variants are fatal to a
/// materialization run; nothing is retried.
#[derive(Debug)]
pub enum StoreError {
    /// Target object does not exist at the given path.
    ObjectNotFound { path: String },
    /// Creation named a type the store does not know.
    UnknownType { type_name: String },
    /// Creation named an id that already exists in the container.
    DuplicateId { path: String },
    /// Identifier is empty or not usable as a container-relative id.
    InvalidIdentifier(String),
    /// Any other repository-side failure.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObjectNotFound { path } => write!(f, "content object not found: {path}"),
            Self::UnknownType { type_name } => {
                write!(f, "content type is not registered: {type_name}")
            }
            Self::DuplicateId { path } => {
                write!(f, "content object already exists: {path}")
            }
            Self::InvalidIdentifier(message) => write!(f, "invalid identifier: {message}"),
            Self::Backend(message) => write!(f, "content store failure: {message}"),
        }
    }
}

impl Error for StoreError {}

/// Container-relative object path, used as the reference store's handle and
/// in error context for locating a failing node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectPath(Vec<String>);

impl ObjectPath {
    /// Returns the repository root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns this path extended by one child id.
    pub fn join(&self, id: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(id.to_string());
        Self(segments)
    }

    /// Returns path segments from the root.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns whether this path addresses the root container.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ObjectPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Required operations on a hierarchical content repository.
///
/// Implementations choose their own handle representation; handles are cheap
/// to clone and address one object for the lifetime of a materialization run.
pub trait ContentStore {
    /// Repository-specific object handle.
    type Handle: Clone;

    /// Derives a container-relative identifier from free text.
    ///
    /// # Contract
    /// - Deterministic for the same text and container context.
    /// - Result is safe as an object id: non-empty, no path separators.
    fn normalize_id(&self, text: &str, container: &Self::Handle) -> StoreResult<String>;

    /// Returns the set of child identifiers inside a container.
    fn list_child_ids(&self, container: &Self::Handle) -> StoreResult<BTreeSet<String>>;

    /// Creates one object inside a container.
    ///
    /// # Contract
    /// - Rejects unknown `type_name`, duplicate `id` and malformed `fields`.
    /// - `fields` are stored verbatim; the store owns schema validation.
    fn create(
        &self,
        container: &Self::Handle,
        type_name: &str,
        id: &str,
        title: &str,
        fields: &BTreeMap<String, serde_json::Value>,
    ) -> StoreResult<()>;

    /// Returns a handle to one existing child object.
    fn get_child(&self, container: &Self::Handle, id: &str) -> StoreResult<Self::Handle>;

    /// Returns whether the object supports an optional capability.
    fn supports(&self, handle: &Self::Handle, capability: ObjectCapability) -> StoreResult<bool>;

    /// Sets the navigation-exclusion flag.
    /// Only valid for objects supporting [`ObjectCapability::NavigationExclusion`].
    fn set_exclude_from_nav(&self, handle: &Self::Handle, excluded: bool) -> StoreResult<()>;

    /// Sets the display-template identifier.
    fn set_layout(&self, handle: &Self::Handle, layout: &str) -> StoreResult<()>;

    /// Enables constrained-containment mode.
    /// Only valid for objects supporting [`ObjectCapability::ConstrainedContainment`].
    fn enable_constrained_containment(&self, handle: &Self::Handle) -> StoreResult<()>;

    /// Sets the list of types allowed anywhere inside the object.
    fn set_locally_allowed_types(&self, handle: &Self::Handle, types: &[String])
        -> StoreResult<()>;

    /// Sets the list of types offered for direct addition.
    fn set_immediately_allowed_types(
        &self,
        handle: &Self::Handle,
        types: &[String],
    ) -> StoreResult<()>;

    /// Sets the object's language tag.
    fn set_language(&self, handle: &Self::Handle, lang: &str) -> StoreResult<()>;

    /// Sets a container's default/landing child pointer.
    fn set_default_child(&self, container: &Self::Handle, id: &str) -> StoreResult<()>;

    /// Refreshes the object's search/catalog index entry.
    fn reindex(&self, handle: &Self::Handle) -> StoreResult<()>;

    /// Returns a human-readable location for diagnostics.
    fn describe(&self, handle: &Self::Handle) -> String;
}

#[cfg(test)]
mod tests {
    use super::ObjectPath;

    #[test]
    fn root_path_displays_as_slash() {
        assert_eq!(ObjectPath::root().to_string(), "/");
        assert!(ObjectPath::root().is_root());
    }

    #[test]
    fn joined_paths_accumulate_segments() {
        let path = ObjectPath::root().join("news").join("2026");
        assert_eq!(path.to_string(), "/news/2026");
        assert_eq!(path.segments(), ["news", "2026"]);
        assert!(!path.is_root());
    }
}
