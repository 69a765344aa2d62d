//! Recursive tree-materialization service.
//!
//! # Responsibility
//! - Turn declarative node trees into objects in a content store, creating
//!   what is missing and configuring every node in a fixed step order.
//! - Keep store and workflow collaborators behind their trait seams.
//!
//! # Invariants
//! - Traversal is strict pre-order: a node is created and fully configured
//!   before its children, children before the next sibling.
//! - Creation happens at most once per id per container; configuration is
//!   re-applied on every run, including for pre-existing objects. The
//!   configuration re-application is intentional and not idempotent.
//! - Identity resolution fails before any store call when a node carries
//!   neither id nor title.
//! - The only recovered failure is a not-applicable workflow transition;
//!   everything else aborts the traversal with prior objects left in place.

use crate::model::node::ContentNode;
use crate::service::observer::{LogObserver, MaterializeEvent, MaterializeObserver};
use crate::store::{ContentStore, ObjectCapability, StoreError};
use crate::workflow::{WorkflowEngine, WorkflowError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by materialization.
pub type MaterializeResult<T> = Result<T, MaterializeError>;

/// Caller-supplied fallbacks applied when a node's options omit them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeDefaults {
    /// Language tag applied when `opts.lang` is absent. `None` means no
    /// language call for nodes without an explicit tag.
    pub lang: Option<String>,
    /// Workflow transition invoked when `opts.workflow_action` is absent.
    /// `None` means no transition for nodes without an explicit action.
    pub workflow_action: Option<String>,
}

/// Errors aborting a materialization run.
#[derive(Debug)]
pub enum MaterializeError {
    /// Node carries neither `id` nor `title`. Raised before any store call
    /// for that node.
    InvalidNode { container: String, type_name: String },
    /// Content-store failure during creation or configuration.
    Store {
        node_id: String,
        container: String,
        source: StoreError,
    },
    /// Fatal workflow-engine failure.
    Workflow {
        node_id: String,
        container: String,
        source: WorkflowError,
    },
}

impl Display for MaterializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNode {
                container,
                type_name,
            } => write!(
                f,
                "node of type `{type_name}` in {container} has neither id nor title"
            ),
            Self::Store {
                node_id,
                container,
                source,
            } => write!(f, "store failure for `{node_id}` in {container}: {source}"),
            Self::Workflow {
                node_id,
                container,
                source,
            } => write!(f, "workflow failure for `{node_id}` in {container}: {source}"),
        }
    }
}

impl Error for MaterializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNode { .. } => None,
            Self::Store { source, .. } => Some(source),
            Self::Workflow { source, .. } => Some(source),
        }
    }
}

/// Tree materializer over a content store and a workflow engine.
pub struct Materializer<'a, S: ContentStore, W: WorkflowEngine<S::Handle>> {
    store: &'a S,
    engine: &'a W,
    observer: &'a dyn MaterializeObserver,
}

impl<'a, S: ContentStore, W: WorkflowEngine<S::Handle>> Materializer<'a, S, W> {
    /// Creates a materializer reporting progress through the `log` facade.
    pub fn new(store: &'a S, engine: &'a W) -> Self {
        Self::with_observer(store, engine, &LogObserver)
    }

    /// Creates a materializer with an explicitly injected observer.
    pub fn with_observer(
        store: &'a S,
        engine: &'a W,
        observer: &'a dyn MaterializeObserver,
    ) -> Self {
        Self {
            store,
            engine,
            observer,
        }
    }

    /// Materializes an ordered sequence of node descriptions inside a
    /// container, depth-first.
    ///
    /// # Contract
    /// - Nodes are processed in input order; children recurse with the same
    ///   defaults before the next sibling starts.
    /// - `opts.default_page` sets the *parent* container's default-child
    ///   pointer, after the node itself is fully configured.
    pub fn materialize(
        &self,
        container: &S::Handle,
        nodes: &[ContentNode],
        defaults: &MaterializeDefaults,
    ) -> MaterializeResult<()> {
        for node in nodes {
            self.materialize_node(container, node, defaults)?;
        }
        Ok(())
    }

    fn materialize_node(
        &self,
        container: &S::Handle,
        node: &ContentNode,
        defaults: &MaterializeDefaults,
    ) -> MaterializeResult<()> {
        let (id, title) = self.resolve_identity(container, node)?;
        let handle = self.ensure_item(container, node, &id, &title)?;
        self.apply_options(container, &handle, node, defaults, &id)?;

        if node.opts.default_page {
            self.store
                .set_default_child(container, &id)
                .map_err(|source| self.store_err(container, &id, source))?;
            let container_path = self.store.describe(container);
            self.observer.on_event(&MaterializeEvent::DefaultPageSet {
                container: &container_path,
                id: &id,
            });
        }

        if !node.childs.is_empty() {
            self.materialize(&handle, &node.childs, defaults)?;
        }
        Ok(())
    }

    /// Resolves the final `(id, title)` pair for one node.
    ///
    /// Missing ids derive from the title via the store's normalization rule;
    /// missing titles default to the id. Both missing is a contract
    /// violation raised before any store mutation.
    fn resolve_identity(
        &self,
        container: &S::Handle,
        node: &ContentNode,
    ) -> MaterializeResult<(String, String)> {
        match (node.id.as_deref(), node.title.as_deref()) {
            (None, None) => Err(MaterializeError::InvalidNode {
                container: self.store.describe(container),
                type_name: node.kind.clone(),
            }),
            (Some(id), None) => Ok((id.to_string(), id.to_string())),
            (Some(id), Some(title)) => Ok((id.to_string(), title.to_string())),
            (None, Some(title)) => {
                let id = self
                    .store
                    .normalize_id(title, container)
                    .map_err(|source| self.store_err(container, title, source))?;
                Ok((id, title.to_string()))
            }
        }
    }

    /// Creates the object unless its id already exists in the container.
    fn ensure_item(
        &self,
        container: &S::Handle,
        node: &ContentNode,
        id: &str,
        title: &str,
    ) -> MaterializeResult<S::Handle> {
        let existing = self
            .store
            .list_child_ids(container)
            .map_err(|source| self.store_err(container, id, source))?;

        if existing.contains(id) {
            let handle = self
                .store
                .get_child(container, id)
                .map_err(|source| self.store_err(container, id, source))?;
            let path = self.store.describe(&handle);
            self.observer
                .on_event(&MaterializeEvent::ItemReused { path: &path });
            return Ok(handle);
        }

        self.store
            .create(container, &node.kind, id, title, &node.data)
            .map_err(|source| self.store_err(container, id, source))?;
        let handle = self
            .store
            .get_child(container, id)
            .map_err(|source| self.store_err(container, id, source))?;
        let path = self.store.describe(&handle);
        self.observer.on_event(&MaterializeEvent::ItemCreated {
            path: &path,
            type_name: &node.kind,
        });
        Ok(handle)
    }

    /// Applies the configuration steps in fixed order: navigation exclusion,
    /// layout, containment constraints, workflow transition, language,
    /// reindex. Each step is optional on option presence; reindex always
    /// runs last so the index reflects the final configuration.
    fn apply_options(
        &self,
        container: &S::Handle,
        handle: &S::Handle,
        node: &ContentNode,
        defaults: &MaterializeDefaults,
        id: &str,
    ) -> MaterializeResult<()> {
        let opts = &node.opts;
        let path = self.store.describe(handle);

        if let Some(excluded) = opts.exclude_from_nav {
            if self.probe(container, id, handle, ObjectCapability::NavigationExclusion)? {
                self.store
                    .set_exclude_from_nav(handle, excluded)
                    .map_err(|source| self.store_err(container, id, source))?;
                self.step_applied(&path, "exclude_from_nav");
            }
        }

        if let Some(layout) = opts.layout.as_deref() {
            self.store
                .set_layout(handle, layout)
                .map_err(|source| self.store_err(container, id, source))?;
            self.step_applied(&path, "layout");
        }

        if opts.locally_allowed_types.is_some() || opts.immediately_allowed_types.is_some() {
            if self.probe(container, id, handle, ObjectCapability::ConstrainedContainment)? {
                self.store
                    .enable_constrained_containment(handle)
                    .map_err(|source| self.store_err(container, id, source))?;
                if let Some(types) = opts.locally_allowed_types.as_deref() {
                    self.store
                        .set_locally_allowed_types(handle, types)
                        .map_err(|source| self.store_err(container, id, source))?;
                }
                if let Some(types) = opts.immediately_allowed_types.as_deref() {
                    self.store
                        .set_immediately_allowed_types(handle, types)
                        .map_err(|source| self.store_err(container, id, source))?;
                }
                self.step_applied(&path, "constraints");
            }
        }

        let action = opts
            .workflow_action
            .as_deref()
            .or(defaults.workflow_action.as_deref());
        if let Some(action) = action {
            match self.engine.apply_transition(handle, action) {
                Ok(()) => self.step_applied(&path, "workflow"),
                Err(WorkflowError::NotApplicable { reason, .. }) => {
                    self.observer.on_event(&MaterializeEvent::WorkflowSkipped {
                        path: &path,
                        action,
                        reason: &reason,
                    });
                }
                Err(source) => {
                    return Err(MaterializeError::Workflow {
                        node_id: id.to_string(),
                        container: self.store.describe(container),
                        source,
                    });
                }
            }
        }

        let lang = opts.lang.as_deref().or(defaults.lang.as_deref());
        if let Some(lang) = lang {
            self.store
                .set_language(handle, lang)
                .map_err(|source| self.store_err(container, id, source))?;
            self.step_applied(&path, "language");
        }

        self.store
            .reindex(handle)
            .map_err(|source| self.store_err(container, id, source))?;
        self.step_applied(&path, "reindex");

        self.observer
            .on_event(&MaterializeEvent::ItemConfigured { path: &path });
        Ok(())
    }

    fn step_applied(&self, path: &str, step: &str) {
        self.observer
            .on_event(&MaterializeEvent::StepApplied { path, step });
    }

    fn probe(
        &self,
        container: &S::Handle,
        id: &str,
        handle: &S::Handle,
        capability: ObjectCapability,
    ) -> MaterializeResult<bool> {
        self.store
            .supports(handle, capability)
            .map_err(|source| self.store_err(container, id, source))
    }

    fn store_err(
        &self,
        container: &S::Handle,
        node_id: &str,
        source: StoreError,
    ) -> MaterializeError {
        MaterializeError::Store {
            node_id: node_id.to_string(),
            container: self.store.describe(container),
            source,
        }
    }
}
