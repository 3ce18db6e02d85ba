//! Markdown rendering of a page subtree.
//!
//! Block structure follows the element kinds: headings map to `#` runs,
//! lists are shallow (direct items only, nested lists do not repeat),
//! `<pre>` becomes a fenced block with a sniffed language, tables become
//! pipe tables padded to their widest row. Inline conversion walks text,
//! anchors, code and emphasis in document order and consumes each
//! converted element whole, so nothing is emitted twice.

use crate::config::ContentOptions;
use crate::dom::text::collapse_whitespace;
use crate::dom::{self, NodeId, Page, PageNode, Role};

/// Recursion ceiling for hostile or corrupt captures.
const MAX_DEPTH: usize = 128;

pub(super) fn render(page: &Page, root: NodeId, options: &ContentOptions) -> String {
    let mut blocks: Vec<String> = Vec::new();
    walk_block(page, root, options, &mut blocks, 0);
    blocks.join("\n\n")
}

fn walk_block(
    page: &Page,
    id: NodeId,
    options: &ContentOptions,
    blocks: &mut Vec<String>,
    depth: usize,
) {
    if depth > MAX_DEPTH {
        return;
    }
    let Some(node) = page.get(id) else {
        return;
    };
    if !dom::is_visible(page, id, false) {
        return;
    }

    // Explicit heading semantics win over the tag.
    if let Some(Role::Heading { level }) = dom::role(node) {
        let text = page.text_content(id);
        if !text.is_empty() {
            push_block(blocks, format!("{} {}", "#".repeat(level as usize), text));
        }
        return;
    }

    match node.tag.as_str() {
        "script" | "style" | "noscript" | "template" => return,
        "p" => {
            push_block(blocks, inline_text(page, id, options));
            return;
        }
        "ul" | "ol" | "menu" => {
            push_block(blocks, list_block(page, id, options, node.tag == "ol"));
            return;
        }
        "pre" => {
            push_block(blocks, code_block(page, id));
            return;
        }
        "code" => {
            // A code element with line structure is a block of its own;
            // single-line code stays inline inside its paragraph.
            if page.raw_text(id).contains('\n') {
                push_block(blocks, code_block(page, id));
                return;
            }
        }
        "blockquote" => {
            push_block(blocks, quote_block(page, id, options, depth));
            return;
        }
        "table" => {
            push_block(blocks, table_block(page, id));
            return;
        }
        "img" => {
            if options.images_enabled() {
                push_block(blocks, image_inline(node));
            }
            return;
        }
        "hr" => {
            push_block(blocks, "---".to_string());
            return;
        }
        _ => {}
    }

    // Containers: a node whose children are all inline reads as one
    // paragraph; anything else renders its loose text and recurses.
    if (node.text.is_some() || !node.children.is_empty()) && children_all_inline(page, node) {
        push_block(blocks, inline_text(page, id, options));
        return;
    }
    if let Some(text) = node.text.as_deref() {
        push_block(blocks, collapse_whitespace(text));
    }
    for &child in &node.children {
        walk_block(page, child, options, blocks, depth + 1);
    }
}

fn push_block(blocks: &mut Vec<String>, block: String) {
    if !block.is_empty() {
        blocks.push(block);
    }
}

const INLINE_TAGS: &[&str] = &[
    "a", "code", "strong", "b", "em", "i", "span", "small", "u", "s", "sub", "sup", "mark", "br",
    "abbr", "time",
];

fn children_all_inline(page: &Page, node: &PageNode) -> bool {
    node.children.iter().all(|&child| {
        page.get(child)
            .is_some_and(|n| INLINE_TAGS.contains(&n.tag.as_str()))
    })
}

// ===== Inline conversion =====

/// Convert a subtree to one line of inline Markdown.
fn inline_text(page: &Page, id: NodeId, options: &ContentOptions) -> String {
    let mut pieces: Vec<String> = Vec::new();
    inline_into(page, id, options, &mut pieces, 0);
    collapse_whitespace(&pieces.join(" "))
}

fn inline_into(
    page: &Page,
    id: NodeId,
    options: &ContentOptions,
    pieces: &mut Vec<String>,
    depth: usize,
) {
    if depth > MAX_DEPTH {
        return;
    }
    let Some(node) = page.get(id) else {
        return;
    };
    if !dom::is_visible(page, id, false) {
        return;
    }
    if let Some(text) = node.text.as_deref() {
        let text = collapse_whitespace(text);
        if !text.is_empty() {
            pieces.push(text);
        }
    }
    for &child in &node.children {
        let Some(child_node) = page.get(child) else {
            continue;
        };
        match child_node.tag.as_str() {
            // Converted elements consume their whole subtree.
            "a" => {
                let text = page.text_content(child);
                match child_node.attributes.href.as_deref() {
                    Some(href) if options.links_enabled() && !text.is_empty() => {
                        pieces.push(format!("[{text}]({href})"));
                    }
                    _ => {
                        if !text.is_empty() {
                            pieces.push(text);
                        }
                    }
                }
            }
            "code" => {
                let text = page.text_content(child);
                if !text.is_empty() {
                    pieces.push(format!("`{text}`"));
                }
            }
            "strong" | "b" => {
                let text = page.text_content(child);
                if !text.is_empty() {
                    pieces.push(format!("**{text}**"));
                }
            }
            "em" | "i" => {
                let text = page.text_content(child);
                if !text.is_empty() {
                    pieces.push(format!("*{text}*"));
                }
            }
            "img" => {
                if options.images_enabled() {
                    pieces.push(image_inline(child_node));
                } else if let Some(alt) = child_node.attributes.alt.as_deref() {
                    let alt = collapse_whitespace(alt);
                    if !alt.is_empty() {
                        pieces.push(alt);
                    }
                }
            }
            "br" => {}
            // Block-level children never re-emit inside an inline run.
            "ul" | "ol" | "pre" | "table" | "blockquote" | "p" | "div" | "h1" | "h2" | "h3"
            | "h4" | "h5" | "h6" => {}
            _ => inline_into(page, child, options, pieces, depth + 1),
        }
    }
}

fn image_inline(node: &PageNode) -> String {
    let alt = node
        .attributes
        .alt
        .as_deref()
        .map(collapse_whitespace)
        .unwrap_or_default();
    let src = node.attributes.src.as_deref().unwrap_or_default();
    format!("![{alt}]({src})")
}

// ===== Block kinds =====

/// Shallow list: direct `li` children only.
fn list_block(page: &Page, id: NodeId, options: &ContentOptions, ordered: bool) -> String {
    let mut lines = Vec::new();
    let mut index = 0usize;
    for &child in page.children(id) {
        let Some(child_node) = page.get(child) else {
            continue;
        };
        if child_node.tag != "li" || !dom::is_visible(page, child, false) {
            continue;
        }
        let text = inline_text(page, child, options);
        if text.is_empty() {
            continue;
        }
        index += 1;
        if ordered {
            lines.push(format!("{index}. {text}"));
        } else {
            lines.push(format!("- {text}"));
        }
    }
    lines.join("\n")
}

fn quote_block(page: &Page, id: NodeId, options: &ContentOptions, depth: usize) -> String {
    let mut inner: Vec<String> = Vec::new();
    for &child in page.children(id) {
        walk_block(page, child, options, &mut inner, depth + 1);
    }
    if inner.is_empty() {
        // Bare text directly inside the quote.
        let text = page.text_content(id);
        if text.is_empty() {
            return String::new();
        }
        inner.push(text);
    }
    inner
        .join("\n\n")
        .lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_block(page: &Page, id: NodeId) -> String {
    let lang = sniff_language(page, id).unwrap_or_default();
    let raw = page.raw_text(id);
    let body = raw.trim_matches('\n');
    format!("```{lang}\n{body}\n```")
}

/// Language from a `language-`/`lang-` class on the element itself, a
/// nested code/pre element, or the nearest code/pre ancestor.
fn sniff_language(page: &Page, id: NodeId) -> Option<String> {
    fn from_classes(node: &PageNode) -> Option<String> {
        node.attributes.classes().find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .filter(|l| !l.is_empty())
                .map(str::to_string)
        })
    }

    let node = page.get(id)?;
    if let Some(lang) = from_classes(node) {
        return Some(lang);
    }
    // Nested: <pre><code class="language-rust">
    let mut seen = vec![false; page.len()];
    let mut stack: Vec<NodeId> = node.children.clone();
    while let Some(current) = stack.pop() {
        let Some(current_node) = page.get(current) else {
            continue;
        };
        if seen[current.index()] {
            continue;
        }
        seen[current.index()] = true;
        if matches!(current_node.tag.as_str(), "code" | "pre") {
            if let Some(lang) = from_classes(current_node) {
                return Some(lang);
            }
            stack.extend(current_node.children.iter().copied());
        }
    }
    // Wrapped: extraction rooted at the <code> inside a classed <pre>.
    let mut current = node.parent;
    let mut hops = 0usize;
    while let Some(parent_id) = current {
        hops += 1;
        if hops > MAX_DEPTH {
            break;
        }
        let parent = page.get(parent_id)?;
        if !matches!(parent.tag.as_str(), "code" | "pre") {
            break;
        }
        if let Some(lang) = from_classes(parent) {
            return Some(lang);
        }
        current = parent.parent;
    }
    None
}

/// Pipe table padded to the widest row, separator after the header row.
fn table_block(page: &Page, id: NodeId) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    collect_rows(page, id, &mut rows, 0);
    if rows.is_empty() {
        return String::new();
    }
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(columns, String::new());
    }
    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (index, row) in rows.iter().enumerate() {
        lines.push(format!("| {} |", row.join(" | ")));
        if index == 0 {
            let separator = vec!["---"; columns];
            lines.push(format!("| {} |", separator.join(" | ")));
        }
    }
    lines.join("\n")
}

fn collect_rows(page: &Page, id: NodeId, rows: &mut Vec<Vec<String>>, depth: usize) {
    if depth > MAX_DEPTH {
        return;
    }
    for &child in page.children(id) {
        let Some(node) = page.get(child) else {
            continue;
        };
        match node.tag.as_str() {
            "tr" => {
                let cells: Vec<String> = node
                    .children
                    .iter()
                    .filter_map(|&cell| {
                        let cell_node = page.get(cell)?;
                        matches!(cell_node.tag.as_str(), "td" | "th")
                            .then(|| page.text_content(cell))
                    })
                    .collect();
                if !cells.is_empty() {
                    rows.push(cells);
                }
            }
            "thead" | "tbody" | "tfoot" => collect_rows(page, child, rows, depth + 1),
            _ => {}
        }
    }
}
