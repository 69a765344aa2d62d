//! Declarative content-node model.
//!
//! # Responsibility
//! - Define the caller-facing description of one content object and its
//!   children.
//! - Keep the wire shape decodable from structured serializations (JSON).
//!
//! # Invariants
//! - A node description is read-only input; materialization never mutates it.
//! - Absent `data`, `opts` and `childs` behave as empty, not as errors.
//! - At least one of `id`/`title` must be set for materialization to accept
//!   the node; the model itself does not enforce this so partially built
//!   descriptions stay representable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Declarative description of one content object and its children.
///
/// Field `data` is passed verbatim to the store's creation primitive; this
/// model does not validate field schemas against the target type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Content-object kind understood by the store. Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Container-relative identifier. Derived from `title` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-facing title. Defaults to `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Extra field values forwarded verbatim on creation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Value>,
    /// Post-creation configuration options.
    #[serde(default, skip_serializing_if = "NodeOptions::is_empty")]
    pub opts: NodeOptions,
    /// Ordered child descriptions, materialized inside this node's object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub childs: Vec<ContentNode>,
}

impl ContentNode {
    /// Creates a node description with an explicit identifier.
    pub fn with_id(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
            title: None,
            data: BTreeMap::new(),
            opts: NodeOptions::default(),
            childs: Vec::new(),
        }
    }

    /// Creates a node description with only a title; the identifier is
    /// derived by the store's normalization rule during materialization.
    pub fn with_title(kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            title: Some(title.into()),
            data: BTreeMap::new(),
            opts: NodeOptions::default(),
            childs: Vec::new(),
        }
    }
}

/// Recognized post-creation configuration options.
///
/// Every option is independently optional; absent options apply nothing.
/// Application order during materialization is fixed regardless of how the
/// options were supplied: navigation exclusion, layout, containment
/// constraints, workflow transition, language, reindex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeOptions {
    /// Language tag; falls back to the caller-supplied default language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Marks this node's object as the default child of its parent container.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default_page: bool,
    /// Navigation-exclusion flag, applied when the object supports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_from_nav: Option<bool>,
    /// Display-template identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Type names allowed anywhere inside the object, when it is a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locally_allowed_types: Option<Vec<String>>,
    /// Type names offered for direct addition inside the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immediately_allowed_types: Option<Vec<String>>,
    /// Workflow transition name; falls back to the caller-supplied default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_action: Option<String>,
}

impl NodeOptions {
    /// Returns whether no option is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
