//! Integration tests for the snapshot pipeline.
//!
//! Everything here drives the public API the way an embedding host would:
//! build or parse a capture, snapshot it in each mode, resolve refs back
//! to nodes, and extract readable content from the resolved subtrees.

use pagelens::{
    ContentFormat, ContentOptions, GrepSpec, NodeId, Page, PageBuilder, PageInfo, Quality,
    ReadyState, RefRegistry, SnapshotMode, SnapshotOptions, Viewport, extract_content,
    generate_snapshot,
};

struct CheckoutPage {
    page: Page,
    header: NodeId,
    main: NodeId,
    form: NodeId,
    card: NodeId,
    pay: NodeId,
}

/// A checkout page with navigation, a labeled payment form and an order
/// summary section. Larger than the unit fixtures on purpose.
fn checkout_page() -> CheckoutPage {
    let mut builder = PageBuilder::new("html");
    builder.info(PageInfo {
        url: "https://shop.example/checkout".to_string(),
        title: "Checkout".to_string(),
        ready_state: ReadyState::Complete,
        viewport: Viewport::default(),
    });
    let body = builder.child(builder.root(), "body");

    let header = builder.child(body, "header");
    builder.text_child(header, "h1", "Acme Store");

    let nav = builder.child(body, "nav");
    builder.attr(nav, "aria-label", "Main");
    let shop = builder.text_child(nav, "a", "Shop");
    builder.attr(shop, "href", "/shop");
    let cart = builder.text_child(nav, "a", "Cart");
    builder.attr(cart, "href", "/cart");

    let main = builder.child(body, "main");
    builder.text_child(main, "h2", "Checkout");
    let form = builder.child(main, "form");
    builder.attr(form, "id", "payment");
    let label = builder.text_child(form, "label", "Card number");
    builder.attr(label, "for", "card");
    let card = builder.child(form, "input");
    builder.attr(card, "id", "card");
    builder.attr(card, "type", "text");
    builder.attr(card, "required", "");
    builder.attr(card, "placeholder", "1234 5678 9012 3456");
    builder.bounds(card, 40.0, 200.0, 320.0, 32.0);
    let country = builder.child(form, "select");
    builder.attr(country, "id", "country");
    builder.text_child(country, "option", "United States");
    builder.text_child(country, "option", "Canada");
    let pay = builder.text_child(form, "button", "Pay now");
    builder.bounds(pay, 40.0, 260.0, 120.0, 40.0);

    let summary = builder.child(main, "section");
    builder.attr(summary, "aria-label", "Order summary");
    builder.text_child(summary, "h3", "Order summary");
    builder.text_child(
        summary,
        "p",
        "Two items in your cart. Shipping is free over fifty dollars and taxes \
         are calculated at checkout.",
    );

    let footer = builder.child(body, "footer");
    let support = builder.text_child(footer, "a", "Support");
    builder.attr(support, "href", "/support");

    CheckoutPage {
        page: builder.build(),
        header,
        main,
        form,
        card,
        pay,
    }
}

fn snapshot(
    page: &Page,
    registry: &mut RefRegistry,
    mode: SnapshotMode,
    options: &SnapshotOptions,
) -> pagelens::SnapshotResult {
    generate_snapshot(page, page.root(), registry, mode, options).expect("snapshot renders")
}

fn summary_line(tree: &str) -> &str {
    tree.lines().nth(1).expect("summary line present")
}

#[test]
fn test_interactive_snapshot_end_to_end() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();
    let result = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Interactive,
        &SnapshotOptions::default(),
    );

    assert!(
        result
            .tree
            .starts_with("PAGE: https://shop.example/checkout | Checkout | viewport=1280x720")
    );
    assert_eq!(
        summary_line(&result.tree),
        "SNAPSHOT: refs=8 interactive=9 quality=medium"
    );
    assert!(result.tree.contains(
        "textbox \"Card number\" @ref:2 \
         [type=text required placeholder=\"1234 5678 9012 3456\"] \
         main > form#payment > input#card"
    ));
    assert!(
        result
            .tree
            .contains("button \"Pay now\" @ref:6 main > form#payment > button")
    );
    // The label is interactive but has no role, so it counts without
    // rendering.
    assert!(result.tree.lines().all(|line| !line.starts_with("label")));
    assert!(
        result
            .metadata
            .warnings
            .iter()
            .any(|w| w.contains("captured 8 of 9 interactive elements"))
    );

    // Refs resolve back to the nodes that produced them.
    assert_eq!(registry.get("@ref:2"), Some(fixture.card));
    assert_eq!(registry.get("@ref:6"), Some(fixture.pay));
    let card_ref = &result.refs["@ref:2"];
    assert_eq!(card_ref.selector, "main > form#payment > input#card");
    assert_eq!(card_ref.context.as_deref(), Some("Checkout"));
    assert!(card_ref.in_viewport);
}

#[test]
fn test_status_reports_counts_only() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();
    let result = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Status,
        &SnapshotOptions::default(),
    );

    assert_eq!(
        summary_line(&result.tree),
        "STATUS: ready | ready=complete | interactive=9 | nodes=21"
    );
    assert!(result.refs.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_full_mode_lists_every_role_bearing_element() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();
    let result = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Full,
        &SnapshotOptions::default(),
    );

    assert_eq!(
        summary_line(&result.tree),
        "ALL: refs=17 interactive=9 quality=high"
    );
    assert!(result.tree.contains("heading \"Acme Store\" @ref:1 header > h1"));
    assert!(
        result
            .tree
            .contains("region \"Order summary\" @ref:13 main > section")
    );
    assert_eq!(result.metadata.captured_elements, 17);
}

#[test]
fn test_structure_mode_renders_skeleton() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();
    let result = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Structure,
        &SnapshotOptions::default(),
    );

    assert_eq!(
        summary_line(&result.tree),
        "STRUCTURE: landmarks=6 headings=3 forms=1"
    );
    assert!(result.tree.contains("    navigation (links=2)"));
    assert!(
        result
            .tree
            .contains("      form#payment (buttons=1 inputs=2 other=3)")
    );
    assert!(result.tree.contains("        h3 \"Order summary\""));
    assert!(result.refs.is_empty());
}

#[test]
fn test_outline_mode_refs_containers_only() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();
    let result = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Outline,
        &SnapshotOptions::default(),
    );

    assert_eq!(summary_line(&result.tree), "OUTLINE: nodes=9 refs=6");
    assert!(result.tree.contains("  form#payment @ref:3"));
    assert!(result.tree.contains("    h3 \"Order summary\""));
    assert_eq!(registry.get("@ref:3"), Some(fixture.form));
}

#[test]
fn test_content_mode_grep_selects_whole_sections() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();
    let options = SnapshotOptions {
        grep: Some(GrepSpec::regex("Order")),
        ..SnapshotOptions::default()
    };
    let result = snapshot(&fixture.page, &mut registry, SnapshotMode::Content, &options);

    assert_eq!(
        summary_line(&result.tree),
        "CONTENT: sections=1/4 grep=\"Order\" matched=1/4"
    );
    // The order summary folds into the main landmark, so main is the
    // section that matches.
    assert!(result.tree.contains("main \"Checkout\" @ref:0"));
    assert_eq!(registry.get("@ref:0"), Some(fixture.main));
}

#[test]
fn test_registry_is_recycled_across_modes() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();

    let interactive = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Interactive,
        &SnapshotOptions::default(),
    );
    assert_eq!(interactive.refs.len(), 8);
    assert_eq!(registry.len(), 8);

    let outline = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Outline,
        &SnapshotOptions::default(),
    );
    assert_eq!(outline.refs.len(), 6);
    assert_eq!(registry.len(), 6);
    assert_eq!(registry.get("@ref:7"), None);
    assert_eq!(registry.get("@ref:0"), Some(fixture.header));
}

#[test]
fn test_serialized_capture_round_trips() {
    let fixture = checkout_page();
    let json = fixture.page.to_json().expect("capture serializes");
    let restored = Page::from_json(&json).expect("capture parses");

    let mut registry = RefRegistry::new();
    let original = snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Interactive,
        &SnapshotOptions::default(),
    );
    let replayed = snapshot(
        &restored,
        &mut registry,
        SnapshotMode::Interactive,
        &SnapshotOptions::default(),
    );

    assert_eq!(original.tree, replayed.tree);
    assert_eq!(original.refs.len(), replayed.refs.len());
    assert_eq!(original.metadata.quality, Quality::Medium);
}

#[test]
fn test_markdown_extraction_of_resolved_ref() {
    let fixture = checkout_page();
    let mut registry = RefRegistry::new();
    snapshot(
        &fixture.page,
        &mut registry,
        SnapshotMode::Content,
        &SnapshotOptions::default(),
    );

    // Content refs: banner, navigation, main, contentinfo.
    let target = registry.get("@ref:2").expect("main section ref");
    assert_eq!(target, fixture.main);

    let text = extract_content(&fixture.page, target, &ContentOptions::default())
        .expect("markdown renders");
    assert!(text.starts_with("## Checkout"));
    assert!(text.contains("### Order summary"));
    assert!(text.contains("free over fifty dollars"));
}

#[test]
fn test_raw_extraction_of_form_subtree() {
    let fixture = checkout_page();
    let options = ContentOptions {
        format: ContentFormat::Raw,
        ..ContentOptions::default()
    };
    let markup =
        extract_content(&fixture.page, fixture.form, &options).expect("raw markup renders");

    assert!(markup.starts_with("<form id=\"payment\">"));
    assert!(markup.contains(
        "<input id=\"card\" placeholder=\"1234 5678 9012 3456\" type=\"text\" required />"
    ));
    assert!(markup.contains("<option>United States</option>"));
    assert!(markup.contains("<button>Pay now</button>"));
    assert!(markup.ends_with("</form>"));
}
