//! Outline projection: a hierarchical overview with refs on containers.
//!
//! Recursive descent over the visible tree, rendering the categories that
//! give a page its shape: landmarks, headings, articles, text-heavy classed
//! containers, lists and code blocks. Only container categories stay
//! addressable. The pattern filter runs over the rendered lines before any
//! ref is issued, so filtered-out containers never consume a token.

use tracing::warn;

use crate::config::SnapshotOptions;
use crate::dom::text::{truncate_chars, word_count};
use crate::dom::{self, NodeId, Page, Role, meaningful_class, render_path};
use crate::grep::filter_records;
use crate::registry::RefRegistry;

use super::{
    Quality, SnapshotMetadata, SnapshotResult, assemble, baseline_warnings, indent, make_ref_info,
};

struct RefMeta {
    id: NodeId,
    role: String,
    name: String,
    context: Option<String>,
}

struct Line {
    text: String,
    refable: Option<RefMeta>,
}

struct Walker<'a> {
    page: &'a Page,
    options: &'a SnapshotOptions,
    lines: Vec<Line>,
    current_heading: Option<String>,
    depth_limited: bool,
    fault: Option<String>,
}

pub(super) fn render(
    page: &Page,
    root: NodeId,
    registry: &mut RefRegistry,
    options: &SnapshotOptions,
) -> SnapshotResult {
    let mut warnings = baseline_warnings(&page.info);

    let mut walker = Walker {
        page,
        options,
        lines: Vec::new(),
        current_heading: None,
        depth_limited: false,
        fault: None,
    };
    walker.visit(root, 0, 0);
    let mut fault = false;
    if let Some(message) = walker.fault.take() {
        warn!("Traversal fault, keeping partial outline: {}", message);
        warnings.push(format!("partial traversal: {message}"));
        fault = true;
    }
    let depth_limited = walker.depth_limited;

    let mut grep_note = String::new();
    let kept = match &options.grep {
        Some(spec) => {
            let outcome = filter_records(walker.lines, |line| line.text.as_str(), spec);
            grep_note = spec.summary_note(outcome.match_count, outcome.total_count);
            outcome.items
        }
        None => walker.lines,
    };

    // Refs are issued to the surviving container lines only, in order, so
    // numbering stays contiguous after filtering.
    let mut lines = Vec::with_capacity(kept.len());
    let mut refs = std::collections::BTreeMap::new();
    for line in kept {
        match line.refable {
            Some(meta) => {
                let token = registry.generate(meta.id);
                lines.push(format!("{} {}", line.text, token));
                refs.insert(
                    token,
                    make_ref_info(
                        page,
                        meta.id,
                        &meta.role,
                        &meta.name,
                        render_path(page, meta.id),
                        None,
                        meta.context,
                    ),
                );
            }
            None => lines.push(line.text),
        }
    }

    let summary = format!(
        "OUTLINE: nodes={} refs={}{}",
        lines.len(),
        refs.len(),
        grep_note
    );
    let quality = if fault || page.info.viewport.area() == 0 {
        Quality::Low
    } else {
        Quality::High
    };

    let captured_elements = refs.len();
    SnapshotResult {
        tree: assemble(&page.info, &summary, &lines),
        refs,
        metadata: SnapshotMetadata {
            total_interactive: 0,
            captured_elements,
            quality,
            warnings,
            truncated: false,
            depth_limited,
        },
    }
}

impl Walker<'_> {
    fn visit(&mut self, id: NodeId, depth: usize, level: usize) {
        if self.fault.is_some() {
            return;
        }
        if depth > self.options.max_depth {
            self.depth_limited = true;
            return;
        }
        let node = match self.page.node(id) {
            Ok(node) => node,
            Err(err) => {
                self.fault = Some(err.to_string());
                return;
            }
        };
        if !self.options.include_hidden && !dom::is_visible(self.page, id, false) {
            return;
        }

        let rendered = self.render_node(id, level);
        let child_level = if rendered { level + 1 } else { level };
        for &child in &node.children {
            self.visit(child, depth + 1, child_level);
        }
    }

    /// Render one node if it belongs to an outline category. Returns
    /// whether a line was emitted, which decides child indentation.
    fn render_node(&mut self, id: NodeId, level: usize) -> bool {
        let Some(node) = self.page.get(id) else {
            return false;
        };
        let name_max = self.options.tuning.name_max;
        let role = dom::role(node);

        if let Some(Role::Heading { level: heading_level }) = role {
            let text = truncate_chars(&self.page.text_content(id), name_max);
            if !text.is_empty() {
                self.current_heading = Some(text.clone());
            }
            self.push_plain(level, format!("h{heading_level} \"{text}\""));
            return true;
        }

        if let Some(role) = role.filter(Role::is_container) {
            let mut text = format!("{}{}", indent(level), role.name());
            if let Some(attr_id) = node.attributes.id.as_deref() {
                text.push('#');
                text.push_str(attr_id);
            }
            let name = dom::accessible_name(self.page, id);
            if !name.is_empty() && !matches!(role, Role::Form | Role::Article) {
                text.push_str(&format!(" \"{}\"", truncate_chars(&name, name_max)));
            }
            self.lines.push(Line {
                text,
                refable: Some(RefMeta {
                    id,
                    role: role.name().to_string(),
                    name,
                    context: self.current_heading.clone(),
                }),
            });
            return true;
        }

        match role {
            Some(Role::List) => {
                let items = node
                    .children
                    .iter()
                    .filter(|&&c| self.page.get(c).is_some_and(|n| n.tag == "li"))
                    .count();
                self.push_plain(level, format!("{} ({} items)", node.tag, items));
                true
            }
            Some(Role::Code) if node.tag == "pre" => {
                self.push_plain(level, "pre (code)".to_string());
                true
            }
            _ => {
                // Text-heavy classed containers earn a line even without
                // a semantic tag.
                let Some(class) = meaningful_class(&node.attributes) else {
                    return false;
                };
                if role.is_some() {
                    return false;
                }
                let words = word_count(&self.page.text_content(id));
                if words <= self.options.tuning.outline_div_min_words {
                    return false;
                }
                let line = format!("{}.{} ({} words)", node.tag, class, words);
                self.push_plain(level, line);
                true
            }
        }
    }

    fn push_plain(&mut self, level: usize, text: String) {
        self.lines.push(Line {
            text: format!("{}{}", indent(level), text),
            refable: None,
        });
    }
}
