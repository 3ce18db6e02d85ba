//! Raw markup reconstruction of a page subtree.
//!
//! Rebuilds element markup from the capture, attributes in a stable order,
//! hidden elements included; raw means raw. `max_length` bounds the result
//! with the shared truncation marker.

use crate::config::ContentOptions;
use crate::dom::{NodeAttributes, NodeId, Page};

use super::TRUNCATION_MARKER;

const MAX_DEPTH: usize = 128;

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(super) fn render(page: &Page, root: NodeId, options: &ContentOptions) -> String {
    let mut out = String::new();
    let mut seen = vec![false; page.len()];
    write_node(page, root, &mut out, &mut seen, 0);
    match options.max_length {
        Some(max) if out.chars().count() > max => {
            let mut cut: String = out.chars().take(max).collect();
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        _ => out,
    }
}

fn write_node(page: &Page, id: NodeId, out: &mut String, seen: &mut [bool], depth: usize) {
    if depth > MAX_DEPTH {
        return;
    }
    let Some(node) = page.get(id) else {
        return;
    };
    if seen[id.index()] {
        return;
    }
    seen[id.index()] = true;

    out.push('<');
    out.push_str(&node.tag);
    write_attributes(&node.attributes, out);
    if VOID_TAGS.contains(&node.tag.as_str()) {
        out.push_str(" />");
        return;
    }
    out.push('>');
    if let Some(text) = node.text.as_deref() {
        out.push_str(&escape_text(text));
    }
    for &child in &node.children {
        write_node(page, child, out, seen, depth + 1);
    }
    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
}

fn write_attributes(attrs: &NodeAttributes, out: &mut String) {
    let valued: [(&str, Option<&str>); 18] = [
        ("id", attrs.id.as_deref()),
        ("class", attrs.class.as_deref()),
        ("href", attrs.href.as_deref()),
        ("src", attrs.src.as_deref()),
        ("alt", attrs.alt.as_deref()),
        ("title", attrs.title.as_deref()),
        ("placeholder", attrs.placeholder.as_deref()),
        ("value", attrs.value.as_deref()),
        ("type", attrs.r#type.as_deref()),
        ("name", attrs.name.as_deref()),
        ("for", attrs.r#for.as_deref()),
        ("role", attrs.role.as_deref()),
        ("aria-label", attrs.aria_label.as_deref()),
        ("aria-labelledby", attrs.aria_labelledby.as_deref()),
        ("aria-hidden", attrs.aria_hidden.as_deref()),
        ("aria-expanded", attrs.aria_expanded.as_deref()),
        ("aria-selected", attrs.aria_selected.as_deref()),
        ("aria-checked", attrs.aria_checked.as_deref()),
    ];
    for (name, value) in valued {
        if let Some(value) = value {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
    for (name, set) in [
        ("disabled", attrs.disabled),
        ("required", attrs.required),
        ("readonly", attrs.readonly),
        ("checked", attrs.checked),
        ("hidden", attrs.hidden),
    ] {
        if set {
            out.push(' ');
            out.push_str(name);
        }
    }
    if let Some(tabindex) = attrs.tabindex {
        out.push_str(&format!(" tabindex=\"{tabindex}\""));
    }
    // Extras in sorted order for deterministic output.
    let mut extra: Vec<_> = attrs.extra.iter().collect();
    extra.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in extra {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
