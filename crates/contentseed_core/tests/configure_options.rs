use contentseed_core::{
    ContentNode, MaterializeDefaults, Materializer, MemoryContentStore, MemoryWorkflowEngine,
    NodeOptions, TypeTraits,
};

fn setup() -> (MemoryContentStore, MemoryWorkflowEngine) {
    let store = MemoryContentStore::new();
    store.register_type("Folder", TypeTraits::container());
    store.register_type("Document", TypeTraits::leaf());
    store.register_type("Snippet", TypeTraits::bare());
    let engine = store.workflow_engine();
    (store, engine)
}

#[test]
fn configuration_steps_run_in_fixed_order() {
    let (store, engine) = setup();
    let materializer = Materializer::new(&store, &engine);

    let mut node = ContentNode::with_id("Folder", "library");
    node.opts = NodeOptions {
        lang: Some("en".to_string()),
        default_page: false,
        exclude_from_nav: Some(true),
        layout: Some("album_view".to_string()),
        locally_allowed_types: Some(vec!["Document".to_string()]),
        immediately_allowed_types: Some(vec!["Document".to_string(), "Folder".to_string()]),
        workflow_action: Some("publish".to_string()),
    };

    materializer
        .materialize(&store.root(), &[node], &MaterializeDefaults::default())
        .unwrap();

    assert_eq!(
        store.journal(),
        vec![
            "create /library type=Folder",
            "set_exclude_from_nav /library value=true",
            "set_layout /library layout=album_view",
            "enable_constrained_containment /library",
            "set_locally_allowed_types /library types=Document",
            "set_immediately_allowed_types /library types=Document,Folder",
            "apply_transition /library action=publish",
            "set_language /library lang=en",
            "reindex /library",
        ]
    );
}

#[test]
fn containment_constraints_are_skipped_for_non_containers() {
    let (store, engine) = setup();
    let materializer = Materializer::new(&store, &engine);

    let mut node = ContentNode::with_id("Document", "page");
    node.opts.locally_allowed_types = Some(vec!["Image".to_string()]);
    node.opts.layout = Some("document_view".to_string());

    materializer
        .materialize(&store.root(), &[node], &MaterializeDefaults::default())
        .unwrap();

    let journal = store.journal();
    assert!(!journal
        .iter()
        .any(|l| l.starts_with("enable_constrained_containment")));
    assert!(!journal
        .iter()
        .any(|l| l.starts_with("set_locally_allowed_types")));
    assert!(journal.contains(&"set_layout /page layout=document_view".to_string()));
    assert!(journal.contains(&"reindex /page".to_string()));

    let page = store.object(&store.root().join("page")).unwrap();
    assert!(!page.constrained);
    assert!(page.locally_allowed_types.is_none());
}

#[test]
fn navigation_exclusion_is_skipped_for_unsupporting_objects() {
    let (store, engine) = setup();
    let materializer = Materializer::new(&store, &engine);

    let mut node = ContentNode::with_id("Snippet", "footer");
    node.opts.exclude_from_nav = Some(true);

    materializer
        .materialize(&store.root(), &[node], &MaterializeDefaults::default())
        .unwrap();

    let journal = store.journal();
    assert!(!journal.iter().any(|l| l.starts_with("set_exclude_from_nav")));
    assert!(journal.contains(&"reindex /footer".to_string()));
    assert!(store
        .object(&store.root().join("footer"))
        .unwrap()
        .exclude_from_nav
        .is_none());
}

#[test]
fn exclude_from_nav_carries_the_configured_value() {
    let (store, engine) = setup();
    let materializer = Materializer::new(&store, &engine);

    let mut node = ContentNode::with_id("Document", "sitemap");
    node.opts.exclude_from_nav = Some(false);

    materializer
        .materialize(&store.root(), &[node], &MaterializeDefaults::default())
        .unwrap();

    let sitemap = store.object(&store.root().join("sitemap")).unwrap();
    assert_eq!(sitemap.exclude_from_nav, Some(false));
}

#[test]
fn either_allowed_types_list_applies_independently() {
    let (store, engine) = setup();
    let materializer = Materializer::new(&store, &engine);

    let mut node = ContentNode::with_id("Folder", "uploads");
    node.opts.immediately_allowed_types = Some(vec!["Document".to_string()]);

    materializer
        .materialize(&store.root(), &[node], &MaterializeDefaults::default())
        .unwrap();

    let uploads = store.object(&store.root().join("uploads")).unwrap();
    assert!(uploads.constrained);
    assert!(uploads.locally_allowed_types.is_none());
    assert_eq!(
        uploads.immediately_allowed_types,
        Some(vec!["Document".to_string()])
    );
}

#[test]
fn reindex_runs_for_every_node_even_without_options() {
    let (store, engine) = setup();
    let materializer = Materializer::new(&store, &engine);

    materializer
        .materialize(
            &store.root(),
            &[ContentNode::with_id("Folder", "plain")],
            &MaterializeDefaults::default(),
        )
        .unwrap();

    assert_eq!(
        store.journal(),
        vec!["create /plain type=Folder", "reindex /plain"]
    );
}
