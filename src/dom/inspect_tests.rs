use super::*;

fn node(tag: &str) -> PageNode {
    PageNode::new(tag)
}

fn node_with(tag: &str, attrs: &[(&str, &str)]) -> PageNode {
    let mut n = PageNode::new(tag);
    for (name, value) in attrs {
        n.attributes.set(name, value);
    }
    n
}

// ===== Roles =====

#[test]
fn test_implicit_roles_from_tags() {
    assert_eq!(role(&node("button")), Some(Role::Button));
    assert_eq!(role(&node("textarea")), Some(Role::Textbox));
    assert_eq!(role(&node("nav")), Some(Role::Navigation));
    assert_eq!(role(&node("main")), Some(Role::Main));
    assert_eq!(role(&node("article")), Some(Role::Article));
    assert_eq!(role(&node("ul")), Some(Role::List));
    assert_eq!(role(&node("table")), Some(Role::Table));
    assert_eq!(role(&node("h3")), Some(Role::Heading { level: 3 }));
    assert_eq!(role(&node("div")), None);
    assert_eq!(role(&node("custom-widget")), None);
}

#[test]
fn test_anchor_needs_href() {
    assert_eq!(role(&node("a")), None);
    let link = node_with("a", &[("href", "/docs")]);
    assert_eq!(role(&link), Some(Role::Link));
}

#[test]
fn test_input_types() {
    assert_eq!(role(&node("input")), Some(Role::Textbox));
    assert_eq!(
        role(&node_with("input", &[("type", "checkbox")])),
        Some(Role::Checkbox)
    );
    assert_eq!(
        role(&node_with("input", &[("type", "search")])),
        Some(Role::Searchbox)
    );
    assert_eq!(
        role(&node_with("input", &[("type", "range")])),
        Some(Role::Slider)
    );
    assert_eq!(
        role(&node_with("input", &[("type", "submit")])),
        Some(Role::Button)
    );
    assert_eq!(role(&node_with("input", &[("type", "hidden")])), None);
}

#[test]
fn test_explicit_role_wins_over_tag() {
    let div_button = node_with("div", &[("role", "button")]);
    assert_eq!(role(&div_button), Some(Role::Button));

    // Explicit role overrides even a strong native mapping.
    let repurposed = node_with("button", &[("role", "link")]);
    assert_eq!(role(&repurposed), Some(Role::Link));
}

#[test]
fn test_presentation_strips_semantics() {
    let presentational = node_with("table", &[("role", "presentation")]);
    assert_eq!(role(&presentational), None);
    let none_role = node_with("ul", &[("role", "none")]);
    assert_eq!(role(&none_role), None);
}

#[test]
fn test_unknown_role_attribute_maps_to_generic() {
    let custom = node_with("div", &[("role", "doc-chapter")]);
    assert_eq!(role(&custom), Some(Role::Generic));
}

#[test]
fn test_role_heading_with_aria_level() {
    let heading = node_with("div", &[("role", "heading"), ("aria-level", "4")]);
    assert_eq!(role(&heading), Some(Role::Heading { level: 4 }));
    // Out-of-range levels fall back to 2.
    let bad_level = node_with("div", &[("role", "heading"), ("aria-level", "9")]);
    assert_eq!(role(&bad_level), Some(Role::Heading { level: 2 }));
    let no_level = node_with("div", &[("role", "heading")]);
    assert_eq!(role(&no_level), Some(Role::Heading { level: 2 }));
}

#[test]
fn test_section_needs_name_for_region() {
    assert_eq!(role(&node("section")), None);
    let named = node_with("section", &[("aria-label", "Pricing")]);
    assert_eq!(role(&named), Some(Role::Region));
}

#[test]
fn test_select_multiple_is_listbox() {
    assert_eq!(role(&node("select")), Some(Role::Combobox));
    let multi = node_with("select", &[("multiple", "")]);
    assert_eq!(role(&multi), Some(Role::Listbox));
}

#[test]
fn test_role_predicates() {
    assert!(Role::Main.is_landmark());
    assert!(Role::Form.is_landmark());
    assert!(!Role::Button.is_landmark());
    assert!(Role::Button.is_widget());
    assert!(Role::Checkbox.is_input());
    assert!(!Role::Link.is_input());
    assert!(Role::Article.is_container());
    assert!(!Role::List.is_container());
    assert_eq!(Role::Heading { level: 2 }.heading_level(), Some(2));
    assert_eq!(Role::Button.heading_level(), None);
}

// ===== Interactivity =====

#[test]
fn test_native_tags_are_interactive() {
    assert!(is_interactive(&node("button")));
    assert!(is_interactive(&node("textarea")));
    assert!(is_interactive(&node("select")));
    assert!(!is_interactive(&node("div")));
    assert!(!is_interactive(&node("a")));
    assert!(is_interactive(&node_with("a", &[("href", "#")])));
    assert!(!is_interactive(&node_with("input", &[("type", "hidden")])));
}

#[test]
fn test_disabled_controls_stay_interactive() {
    let disabled = node_with("button", &[("disabled", "")]);
    assert!(is_interactive(&disabled));
    assert_eq!(states(&disabled), vec!["disabled"]);
}

#[test]
fn test_role_and_tabindex_interactivity() {
    assert!(is_interactive(&node_with("div", &[("role", "button")])));
    assert!(!is_interactive(&node_with("div", &[("role", "navigation")])));
    assert!(is_interactive(&node_with("div", &[("tabindex", "0")])));
    assert!(!is_interactive(&node_with("div", &[("tabindex", "-1")])));
}

#[test]
fn test_interaction_score_layers() {
    assert_eq!(interaction_score(&node("div")), 0.0);

    let button = node("button");
    assert!(interaction_score(&button) >= 0.3);

    let mut link = node_with("a", &[("href", "/x")]);
    link.style.cursor = Some("pointer".to_string());
    let score = interaction_score(&link);
    // Native tag + widget role + href + cursor.
    assert!(score > 0.8);
    assert!(score <= 1.0);

    let faux = node_with("div", &[("role", "button"), ("tabindex", "0")]);
    let faux_score = interaction_score(&faux);
    assert!(faux_score > 0.2 && faux_score < interaction_score(&link));
}

// ===== Visibility =====

#[test]
fn test_visibility_composes_style_and_aria() {
    let mut builder = PageBuilder::new("div");
    let plain = builder.child(builder.root(), "span");
    let styled_out = builder.child(builder.root(), "span");
    builder.style(styled_out, "display", "none");
    let aria_hidden = builder.child(builder.root(), "span");
    builder.attr(aria_hidden, "aria-hidden", "true");
    let html_hidden = builder.child(builder.root(), "span");
    builder.attr(html_hidden, "hidden", "");
    let page = builder.build();

    assert!(is_visible(&page, plain, false));
    assert!(!is_visible(&page, styled_out, false));
    assert!(!is_visible(&page, aria_hidden, false));
    assert!(!is_visible(&page, html_hidden, false));
}

#[test]
fn test_hidden_ancestor_hides_descendants() {
    let mut builder = PageBuilder::new("div");
    let wrapper = builder.child(builder.root(), "div");
    builder.style(wrapper, "visibility", "hidden");
    let inner = builder.child(wrapper, "button");
    let page = builder.build();

    // Without the ancestor check the node itself looks fine.
    assert!(is_visible(&page, inner, false));
    assert!(!is_visible(&page, inner, true));
}

#[test]
fn test_zero_size_box_is_not_hidden() {
    let mut builder = PageBuilder::new("div");
    let collapsed = builder.child(builder.root(), "div");
    builder.bounds(collapsed, 0.0, 0.0, 0.0, 0.0);
    let page = builder.build();
    assert!(is_visible(&page, collapsed, true));
}

// ===== Accessible names =====

fn page_with_button(attrs: &[(&str, &str)], text: Option<&str>) -> (Page, NodeId) {
    let mut builder = PageBuilder::new("body");
    let button = builder.child(builder.root(), "button");
    for (name, value) in attrs {
        builder.attr(button, name, value);
    }
    if let Some(text) = text {
        builder.set_text(button, text);
    }
    (builder.build(), button)
}

#[test]
fn test_name_priority_chain() {
    let (page, button) = page_with_button(&[("aria-label", "Close dialog")], Some("X"));
    assert_eq!(accessible_name(&page, button), "Close dialog");

    let (page, button) = page_with_button(&[("title", "tooltip")], Some("Submit"));
    assert_eq!(accessible_name(&page, button), "Submit");

    let (page, button) = page_with_button(&[("title", "tooltip")], None);
    assert_eq!(accessible_name(&page, button), "tooltip");

    let (page, button) = page_with_button(&[], None);
    assert_eq!(accessible_name(&page, button), "");
}

#[test]
fn test_whitespace_only_candidates_are_skipped() {
    let (page, button) = page_with_button(&[("aria-label", "   ")], Some("Real name"));
    assert_eq!(accessible_name(&page, button), "Real name");
}

#[test]
fn test_aria_labelledby_joins_referenced_text() {
    let mut builder = PageBuilder::new("body");
    let caption = builder.text_child(builder.root(), "span", "Billing");
    builder.attr(caption, "id", "cap1");
    let detail = builder.text_child(builder.root(), "span", "address");
    builder.attr(detail, "id", "cap2");
    let input = builder.child(builder.root(), "input");
    builder.attr(input, "aria-labelledby", "cap1 cap2");
    let page = builder.build();

    assert_eq!(accessible_name(&page, input), "Billing address");
}

#[test]
fn test_aria_labelledby_dangling_reference_falls_through() {
    let mut builder = PageBuilder::new("body");
    let input = builder.child(builder.root(), "input");
    builder.attr(input, "aria-labelledby", "missing");
    builder.attr(input, "placeholder", "Email");
    let page = builder.build();

    assert_eq!(accessible_name(&page, input), "Email");
}

#[test]
fn test_label_for_association() {
    let mut builder = PageBuilder::new("body");
    let label = builder.text_child(builder.root(), "label", "Email address");
    builder.attr(label, "for", "email");
    let input = builder.child(builder.root(), "input");
    builder.attr(input, "id", "email");
    let page = builder.build();

    assert_eq!(accessible_name(&page, input), "Email address");
}

#[test]
fn test_name_from_subtree_text() {
    let mut builder = PageBuilder::new("body");
    let link = builder.child(builder.root(), "a");
    builder.attr(link, "href", "/about");
    builder.text_child(link, "span", "About");
    builder.text_child(link, "span", "us");
    let page = builder.build();

    assert_eq!(accessible_name(&page, link), "About us");
}

#[test]
fn test_image_alt_name() {
    let mut builder = PageBuilder::new("body");
    let img = builder.child(builder.root(), "img");
    builder.attr(img, "alt", "Company logo");
    let page = builder.build();
    assert_eq!(accessible_name(&page, img), "Company logo");
}

// ===== Input details and states =====

#[test]
fn test_input_attributes_fragment() {
    let field = node_with(
        "input",
        &[
            ("type", "email"),
            ("required", ""),
            ("placeholder", "you@example.com"),
        ],
    );
    assert_eq!(
        input_attributes(&field),
        "[type=email required placeholder=\"you@example.com\"]"
    );

    // Inputs without an explicit type report the default.
    assert_eq!(input_attributes(&node("input")), "[type=text]");
    // Non-controls report nothing.
    assert_eq!(input_attributes(&node("button")), "");
}

#[test]
fn test_input_value_is_truncated() {
    let field = node_with(
        "input",
        &[("type", "text"), ("value", "a very long prefilled value here")],
    );
    let fragment = input_attributes(&field);
    assert!(fragment.starts_with("[type=text value=\""));
    assert!(fragment.contains('…'));
}

#[test]
fn test_state_tokens() {
    let toggle = node_with(
        "button",
        &[("aria-expanded", "true"), ("aria-checked", "true")],
    );
    assert_eq!(states(&toggle), vec!["checked", "expanded"]);

    let collapsed = node_with("button", &[("aria-expanded", "false")]);
    assert_eq!(states(&collapsed), vec!["collapsed"]);

    let selected = node_with("option", &[("aria-selected", "true")]);
    assert_eq!(states(&selected), vec!["selected"]);

    assert!(states(&node("button")).is_empty());
}
