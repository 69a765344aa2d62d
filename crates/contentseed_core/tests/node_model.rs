use contentseed_core::ContentNode;
use serde_json::json;

#[test]
fn decodes_nested_tree_from_json() {
    let raw = r#"
    [
        {
            "type": "Folder",
            "id": "news",
            "title": "News",
            "opts": {"exclude_from_nav": true, "layout": "summary_view"},
            "childs": [
                {
                    "type": "Document",
                    "title": "Front Page",
                    "data": {"description": "Landing copy"},
                    "opts": {"default_page": true, "workflow_action": "publish"}
                }
            ]
        },
        {"type": "Folder", "id": "events"}
    ]
    "#;

    let nodes: Vec<ContentNode> = serde_json::from_str(raw).unwrap();
    assert_eq!(nodes.len(), 2);

    let news = &nodes[0];
    assert_eq!(news.kind, "Folder");
    assert_eq!(news.id.as_deref(), Some("news"));
    assert_eq!(news.opts.exclude_from_nav, Some(true));
    assert_eq!(news.opts.layout.as_deref(), Some("summary_view"));
    assert_eq!(news.childs.len(), 1);

    let front_page = &news.childs[0];
    assert!(front_page.id.is_none());
    assert_eq!(front_page.title.as_deref(), Some("Front Page"));
    assert_eq!(front_page.data["description"], json!("Landing copy"));
    assert!(front_page.opts.default_page);
    assert_eq!(front_page.opts.workflow_action.as_deref(), Some("publish"));

    let events = &nodes[1];
    assert!(events.data.is_empty());
    assert!(events.opts.is_empty());
    assert!(events.childs.is_empty());
}

#[test]
fn serialization_omits_empty_collections_and_defaults() {
    let node = ContentNode::with_id("Folder", "plain");
    let raw = serde_json::to_string(&node).unwrap();
    assert_eq!(raw, r#"{"type":"Folder","id":"plain"}"#);
}

#[test]
fn round_trips_option_values() {
    let mut node = ContentNode::with_title("Document", "Café Menu");
    node.opts.lang = Some("fr".to_string());
    node.opts.locally_allowed_types = Some(vec!["Image".to_string()]);

    let raw = serde_json::to_string(&node).unwrap();
    let decoded: ContentNode = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded, node);
}
