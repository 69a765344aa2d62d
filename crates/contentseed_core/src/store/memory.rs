//! In-memory content store and workflow engine.
//!
//! # Responsibility
//! - Provide a concrete `ContentStore` for integration tests, examples and
//!   hosts that provision into process-local state.
//! - Journal every mutating call so call ordering is assertable.
//!
//! # Invariants
//! - Handles are container-relative `ObjectPath` values.
//! - `create` requires a registered type and a free id; duplicate ids fail.
//! - The workflow engine shares the store's journal, so cross-collaborator
//!   call order is visible in one place.

use crate::store::{ContentStore, ObjectCapability, ObjectPath, StoreError, StoreResult};
use crate::workflow::{WorkflowEngine, WorkflowError, WorkflowResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

static NON_ID_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid id charset regex"));

/// Behavior flags registered per content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTraits {
    /// Type can contain children and accepts containment constraints.
    pub container: bool,
    /// Type exposes a navigation-exclusion flag.
    pub navigation_aware: bool,
}

impl TypeTraits {
    /// Traits for folder-like types.
    pub fn container() -> Self {
        Self {
            container: true,
            navigation_aware: true,
        }
    }

    /// Traits for leaf content types that still appear in navigation.
    pub fn leaf() -> Self {
        Self {
            container: false,
            navigation_aware: true,
        }
    }

    /// Traits for types with neither capability.
    pub fn bare() -> Self {
        Self {
            container: false,
            navigation_aware: false,
        }
    }
}

/// One materialized object in the in-memory tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryObject {
    /// Registered type name this object was created as.
    pub type_name: String,
    /// Human-facing title.
    pub title: String,
    /// Field values stored verbatim from creation.
    pub fields: BTreeMap<String, Value>,
    /// Navigation-exclusion flag, once set.
    pub exclude_from_nav: Option<bool>,
    /// Display-template identifier, once set.
    pub layout: Option<String>,
    /// Whether constrained-containment mode has been enabled.
    pub constrained: bool,
    /// Types allowed anywhere inside this object.
    pub locally_allowed_types: Option<Vec<String>>,
    /// Types offered for direct addition inside this object.
    pub immediately_allowed_types: Option<Vec<String>>,
    /// Language tag, once set.
    pub language: Option<String>,
    /// Default/landing child pointer.
    pub default_child: Option<String>,
    /// Workflow transitions applied to this object, in order.
    pub workflow_history: Vec<String>,
    /// Number of index refreshes requested for this object.
    pub reindex_count: u32,
    /// Child objects keyed by container-relative id.
    pub children: BTreeMap<String, MemoryObject>,
}

impl MemoryObject {
    fn new(type_name: &str, title: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            title: title.to_string(),
            fields: BTreeMap::new(),
            exclude_from_nav: None,
            layout: None,
            constrained: false,
            locally_allowed_types: None,
            immediately_allowed_types: None,
            language: None,
            default_child: None,
            workflow_history: Vec::new(),
            reindex_count: 0,
            children: BTreeMap::new(),
        }
    }
}

struct StoreInner {
    root: MemoryObject,
    types: BTreeMap<String, TypeTraits>,
    journal: Vec<String>,
    workflow_not_applicable: BTreeSet<String>,
    workflow_failing: BTreeSet<String>,
}

/// In-memory hierarchical content store.
///
/// Cloning shares the same underlying tree and journal, so a clone taken
/// before materialization can inspect the outcome afterwards.
#[derive(Clone)]
pub struct MemoryContentStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl MemoryContentStore {
    /// Creates an empty store with no registered types.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                root: MemoryObject::new("__root__", ""),
                types: BTreeMap::new(),
                journal: Vec::new(),
                workflow_not_applicable: BTreeSet::new(),
                workflow_failing: BTreeSet::new(),
            })),
        }
    }

    /// Registers one content type with its capability traits.
    pub fn register_type(&self, type_name: impl Into<String>, traits: TypeTraits) {
        self.inner.borrow_mut().types.insert(type_name.into(), traits);
    }

    /// Returns the root container handle.
    pub fn root(&self) -> ObjectPath {
        ObjectPath::root()
    }

    /// Returns a copy of the object at `path`, if present.
    pub fn object(&self, path: &ObjectPath) -> Option<MemoryObject> {
        let inner = self.inner.borrow();
        object_at(&inner.root, path).cloned()
    }

    /// Returns a copy of the mutating-call journal.
    pub fn journal(&self) -> Vec<String> {
        self.inner.borrow().journal.clone()
    }

    /// Clears the mutating-call journal.
    pub fn clear_journal(&self) {
        self.inner.borrow_mut().journal.clear();
    }

    /// Returns a workflow engine operating on this store's objects and
    /// sharing its journal.
    pub fn workflow_engine(&self) -> MemoryWorkflowEngine {
        MemoryWorkflowEngine {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MemoryContentStore {
    type Handle = ObjectPath;

    fn normalize_id(&self, text: &str, _container: &ObjectPath) -> StoreResult<String> {
        let slug = slugify(text);
        if slug.is_empty() {
            return Err(StoreError::InvalidIdentifier(format!(
                "`{text}` normalizes to an empty identifier"
            )));
        }
        Ok(slug)
    }

    fn list_child_ids(&self, container: &ObjectPath) -> StoreResult<BTreeSet<String>> {
        let inner = self.inner.borrow();
        let object = object_at(&inner.root, container).ok_or_else(|| StoreError::ObjectNotFound {
            path: container.to_string(),
        })?;
        Ok(object.children.keys().cloned().collect())
    }

    fn create(
        &self,
        container: &ObjectPath,
        type_name: &str,
        id: &str,
        title: &str,
        fields: &BTreeMap<String, Value>,
    ) -> StoreResult<()> {
        if id.is_empty() || id.contains('/') {
            return Err(StoreError::InvalidIdentifier(format!(
                "`{id}` is not a valid container-relative id"
            )));
        }

        let inner = &mut *self.inner.borrow_mut();
        if !inner.types.contains_key(type_name) {
            return Err(StoreError::UnknownType {
                type_name: type_name.to_string(),
            });
        }

        let child_path = container.join(id);
        let parent =
            object_at_mut(&mut inner.root, container).ok_or_else(|| StoreError::ObjectNotFound {
                path: container.to_string(),
            })?;
        if parent.children.contains_key(id) {
            return Err(StoreError::DuplicateId {
                path: child_path.to_string(),
            });
        }

        let mut object = MemoryObject::new(type_name, title);
        object.fields = fields.clone();
        parent.children.insert(id.to_string(), object);
        inner
            .journal
            .push(format!("create {child_path} type={type_name}"));
        Ok(())
    }

    fn get_child(&self, container: &ObjectPath, id: &str) -> StoreResult<ObjectPath> {
        let child_path = container.join(id);
        let inner = self.inner.borrow();
        if object_at(&inner.root, &child_path).is_none() {
            return Err(StoreError::ObjectNotFound {
                path: child_path.to_string(),
            });
        }
        Ok(child_path)
    }

    fn supports(&self, handle: &ObjectPath, capability: ObjectCapability) -> StoreResult<bool> {
        let inner = self.inner.borrow();
        let object = object_at(&inner.root, handle).ok_or_else(|| StoreError::ObjectNotFound {
            path: handle.to_string(),
        })?;
        let traits = match inner.types.get(&object.type_name) {
            Some(traits) => *traits,
            None => return Ok(false),
        };
        Ok(match capability {
            ObjectCapability::NavigationExclusion => traits.navigation_aware,
            ObjectCapability::ConstrainedContainment => traits.container,
        })
    }

    fn set_exclude_from_nav(&self, handle: &ObjectPath, excluded: bool) -> StoreResult<()> {
        self.mutate(handle, format!("set_exclude_from_nav {handle} value={excluded}"), |object| {
            object.exclude_from_nav = Some(excluded);
        })
    }

    fn set_layout(&self, handle: &ObjectPath, layout: &str) -> StoreResult<()> {
        self.mutate(handle, format!("set_layout {handle} layout={layout}"), |object| {
            object.layout = Some(layout.to_string());
        })
    }

    fn enable_constrained_containment(&self, handle: &ObjectPath) -> StoreResult<()> {
        self.mutate(
            handle,
            format!("enable_constrained_containment {handle}"),
            |object| {
                object.constrained = true;
            },
        )
    }

    fn set_locally_allowed_types(&self, handle: &ObjectPath, types: &[String]) -> StoreResult<()> {
        self.mutate(
            handle,
            format!("set_locally_allowed_types {handle} types={}", types.join(",")),
            |object| {
                object.locally_allowed_types = Some(types.to_vec());
            },
        )
    }

    fn set_immediately_allowed_types(
        &self,
        handle: &ObjectPath,
        types: &[String],
    ) -> StoreResult<()> {
        self.mutate(
            handle,
            format!(
                "set_immediately_allowed_types {handle} types={}",
                types.join(",")
            ),
            |object| {
                object.immediately_allowed_types = Some(types.to_vec());
            },
        )
    }

    fn set_language(&self, handle: &ObjectPath, lang: &str) -> StoreResult<()> {
        self.mutate(handle, format!("set_language {handle} lang={lang}"), |object| {
            object.language = Some(lang.to_string());
        })
    }

    fn set_default_child(&self, container: &ObjectPath, id: &str) -> StoreResult<()> {
        let inner = &mut *self.inner.borrow_mut();
        let child_path = container.join(id);
        if object_at(&inner.root, &child_path).is_none() {
            return Err(StoreError::ObjectNotFound {
                path: child_path.to_string(),
            });
        }
        let object = object_at_mut(&mut inner.root, container).ok_or_else(|| {
            StoreError::ObjectNotFound {
                path: container.to_string(),
            }
        })?;
        object.default_child = Some(id.to_string());
        inner
            .journal
            .push(format!("set_default_child {container} id={id}"));
        Ok(())
    }

    fn reindex(&self, handle: &ObjectPath) -> StoreResult<()> {
        self.mutate(handle, format!("reindex {handle}"), |object| {
            object.reindex_count += 1;
        })
    }

    fn describe(&self, handle: &ObjectPath) -> String {
        handle.to_string()
    }
}

impl MemoryContentStore {
    fn mutate(
        &self,
        handle: &ObjectPath,
        journal_line: String,
        mutation: impl FnOnce(&mut MemoryObject),
    ) -> StoreResult<()> {
        let inner = &mut *self.inner.borrow_mut();
        let object =
            object_at_mut(&mut inner.root, handle).ok_or_else(|| StoreError::ObjectNotFound {
                path: handle.to_string(),
            })?;
        mutation(object);
        inner.journal.push(journal_line);
        Ok(())
    }
}

/// Workflow engine over in-memory objects.
///
/// Transitions succeed and are recorded on the object unless explicitly
/// marked not applicable or failing.
#[derive(Clone)]
pub struct MemoryWorkflowEngine {
    inner: Rc<RefCell<StoreInner>>,
}

impl MemoryWorkflowEngine {
    /// Marks a transition name as not applicable (recoverable for callers).
    pub fn mark_not_applicable(&self, action: impl Into<String>) {
        self.inner
            .borrow_mut()
            .workflow_not_applicable
            .insert(action.into());
    }

    /// Marks a transition name as failing fatally.
    pub fn mark_failing(&self, action: impl Into<String>) {
        self.inner
            .borrow_mut()
            .workflow_failing
            .insert(action.into());
    }
}

impl WorkflowEngine<ObjectPath> for MemoryWorkflowEngine {
    fn apply_transition(&self, handle: &ObjectPath, action: &str) -> WorkflowResult<()> {
        let inner = &mut *self.inner.borrow_mut();
        inner
            .journal
            .push(format!("apply_transition {handle} action={action}"));

        if inner.workflow_failing.contains(action) {
            return Err(WorkflowError::Engine(format!(
                "transition `{action}` failed for {handle}"
            )));
        }
        if inner.workflow_not_applicable.contains(action) {
            return Err(WorkflowError::NotApplicable {
                action: action.to_string(),
                reason: "no workflow chain offers this transition".to_string(),
            });
        }

        let object =
            object_at_mut(&mut inner.root, handle).ok_or_else(|| {
                WorkflowError::Engine(format!("object not found: {handle}"))
            })?;
        object.workflow_history.push(action.to_string());
        Ok(())
    }
}

fn object_at<'a>(root: &'a MemoryObject, path: &ObjectPath) -> Option<&'a MemoryObject> {
    let mut current = root;
    for segment in path.segments() {
        current = current.children.get(segment)?;
    }
    Some(current)
}

fn object_at_mut<'a>(root: &'a mut MemoryObject, path: &ObjectPath) -> Option<&'a mut MemoryObject> {
    let mut current = root;
    for segment in path.segments() {
        current = current.children.get_mut(segment)?;
    }
    Some(current)
}

fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        match fold_char(ch) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(ch),
        }
    }
    NON_ID_CHARS_RE
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}

fn fold_char(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::{slugify, MemoryContentStore, TypeTraits};
    use crate::store::{ContentStore, StoreError};

    #[test]
    fn slugify_lowercases_and_folds_diacritics() {
        assert_eq!(slugify("Café Menu"), "cafe-menu");
        assert_eq!(slugify("Hello  World!"), "hello-world");
        assert_eq!(slugify("Über Straße"), "uber-strasse");
        assert_eq!(slugify("--News 2026--"), "news-2026");
    }

    #[test]
    fn normalize_id_rejects_empty_slug() {
        let store = MemoryContentStore::new();
        let err = store
            .normalize_id("!!!", &store.root())
            .expect_err("punctuation-only title must fail");
        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
    }

    #[test]
    fn create_requires_registered_type() {
        let store = MemoryContentStore::new();
        let err = store
            .create(&store.root(), "Folder", "news", "News", &Default::default())
            .expect_err("unregistered type must fail");
        assert!(matches!(err, StoreError::UnknownType { .. }));

        store.register_type("Folder", TypeTraits::container());
        store
            .create(&store.root(), "Folder", "news", "News", &Default::default())
            .expect("registered type must create");
    }

    #[test]
    fn create_rejects_duplicate_ids() {
        let store = MemoryContentStore::new();
        store.register_type("Folder", TypeTraits::container());
        store
            .create(&store.root(), "Folder", "news", "News", &Default::default())
            .expect("first create succeeds");
        let err = store
            .create(&store.root(), "Folder", "news", "News", &Default::default())
            .expect_err("duplicate id must fail");
        assert!(matches!(err, StoreError::DuplicateId { .. }));
    }
}
