use super::*;
use crate::error::NodeAccessError;

fn sample_page() -> Page {
    let mut builder = PageBuilder::new("html");
    let root = builder.root();
    let body = builder.child(root, "body");
    let heading = builder.text_child(body, "h1", "Welcome");
    builder.bounds(heading, 0.0, 0.0, 400.0, 40.0);
    let para = builder.text_child(body, "p", "Some   intro\n\ttext");
    builder.bounds(para, 0.0, 50.0, 400.0, 60.0);
    let button = builder.text_child(body, "button", "Go");
    builder.attr(button, "id", "go-btn");
    builder.bounds(button, 10.0, 120.0, 60.0, 24.0);
    builder.build()
}

#[test]
fn test_node_lookup() {
    let page = sample_page();
    assert_eq!(page.len(), 5);
    assert_eq!(page.root(), NodeId(0));
    assert!(page.node(NodeId(4)).is_ok());
    assert_eq!(
        page.node(NodeId(99)).unwrap_err(),
        NodeAccessError::OutOfRange(NodeId(99))
    );
    assert!(page.get(NodeId(99)).is_none());
}

#[test]
fn test_parent_child_links() {
    let page = sample_page();
    let body = NodeId(1);
    assert_eq!(page.parent(body), Some(NodeId(0)));
    assert_eq!(page.children(body).len(), 3);
    assert_eq!(page.parent(NodeId(0)), None);
    assert!(page.children(NodeId(99)).is_empty());
}

#[test]
fn test_text_content_collapses_whitespace() {
    let page = sample_page();
    let para = NodeId(3);
    assert_eq!(page.text_content(para), "Some intro text");
    // Subtree text from the body gathers all children in order.
    assert_eq!(page.text_content(NodeId(1)), "Welcome Some intro text Go");
}

#[test]
fn test_text_content_skips_hidden_subtrees() {
    let mut builder = PageBuilder::new("div");
    let shown = builder.text_child(builder.root(), "span", "shown");
    let hidden = builder.text_child(builder.root(), "span", "hidden");
    builder.style(hidden, "display", "none");
    let _ = shown;
    let page = builder.build();
    assert_eq!(page.text_content(page.root()), "shown");
}

#[test]
fn test_bounding_box_faults() {
    let mut builder = PageBuilder::new("div");
    let with_box = builder.child(builder.root(), "span");
    builder.bounds(with_box, 1.0, 2.0, 3.0, 4.0);
    let without_box = builder.child(builder.root(), "span");
    let detached = builder.child(builder.root(), "span");
    builder.bounds(detached, 0.0, 0.0, 5.0, 5.0);
    builder.detach(detached);
    let page = builder.build();

    assert!(page.bounding_box(with_box).is_ok());
    assert_eq!(
        page.bounding_box(without_box),
        Err(NodeAccessError::MissingGeometry(without_box))
    );
    assert_eq!(
        page.bounding_box(detached),
        Err(NodeAccessError::Detached(detached))
    );
    assert_eq!(
        page.bounding_box(NodeId(50)),
        Err(NodeAccessError::OutOfRange(NodeId(50)))
    );
}

#[test]
fn test_find_by_attr_id() {
    let page = sample_page();
    assert_eq!(page.find_by_attr_id("go-btn"), Some(NodeId(4)));
    assert_eq!(page.find_by_attr_id("missing"), None);
}

#[test]
fn test_node_at_picks_smallest_hit() {
    let mut builder = PageBuilder::new("div");
    builder.bounds(builder.root(), 0.0, 0.0, 500.0, 500.0);
    let card = builder.child(builder.root(), "section");
    builder.bounds(card, 10.0, 10.0, 200.0, 200.0);
    let button = builder.child(card, "button");
    builder.bounds(button, 20.0, 20.0, 50.0, 20.0);
    let page = builder.build();

    assert_eq!(page.node_at(30.0, 30.0), Some(button));
    assert_eq!(page.node_at(150.0, 150.0), Some(card));
    assert_eq!(page.node_at(400.0, 400.0), Some(page.root()));
    assert_eq!(page.node_at(900.0, 900.0), None);
}

#[test]
fn test_node_at_skips_hidden() {
    let mut builder = PageBuilder::new("div");
    builder.bounds(builder.root(), 0.0, 0.0, 100.0, 100.0);
    let overlay = builder.child(builder.root(), "div");
    builder.bounds(overlay, 0.0, 0.0, 50.0, 50.0);
    builder.style(overlay, "visibility", "hidden");
    let page = builder.build();

    assert_eq!(page.node_at(25.0, 25.0), Some(page.root()));
}

#[test]
fn test_json_round_trip() {
    let page = sample_page();
    let json = page.to_json().expect("serializes");
    let restored = Page::from_json(&json).expect("parses");
    assert_eq!(restored.len(), page.len());
    assert_eq!(restored.root(), page.root());
    assert_eq!(restored.text_content(restored.root()), page.text_content(page.root()));
}

#[test]
fn test_from_json_minimal_capture() {
    let json = r#"{
        "info": {"url": "https://example.com", "title": "Example"},
        "root": 0,
        "nodes": [
            {"tag": "html", "text": null, "bounds": null, "parent": null, "children": [1]},
            {"tag": "body", "text": "hi", "bounds": null, "parent": 0, "children": []}
        ]
    }"#;
    let page = Page::from_json(json).expect("minimal capture parses");
    assert_eq!(page.len(), 2);
    assert_eq!(page.info.url, "https://example.com");
    assert_eq!(page.info.viewport.width, 1280);
    assert!(page.node(NodeId(1)).expect("in range").connected);
    assert_eq!(page.text_content(page.root()), "hi");
}

#[test]
fn test_corrupt_capture_is_loop_safe() {
    // Child list points back up the tree; text gathering must terminate.
    let json = r#"{
        "info": {},
        "root": 0,
        "nodes": [
            {"tag": "div", "text": "a", "bounds": null, "parent": null, "children": [1]},
            {"tag": "div", "text": "b", "bounds": null, "parent": 0, "children": [0]}
        ]
    }"#;
    let page = Page::from_json(json).expect("parses");
    assert_eq!(page.text_content(page.root()), "a b");
}
