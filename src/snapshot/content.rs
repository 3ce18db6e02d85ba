//! Content projection: readable page text organized into sections.
//!
//! Two passes. The first finds section boundaries: landmarks and articles
//! always qualify, named sections and classed containers only once they
//! carry enough words; the outermost boundary wins, nested ones fold into
//! it. The optional pattern filter then runs per section, against role,
//! heading, path and full text together, before anything is rendered, so
//! dropped sections cost no refs and no lines. The second pass renders
//! each surviving section's children into typed lines.

use tracing::warn;

use crate::config::{SnapshotOptions, Tuning};
use crate::dom::text::{collapse_whitespace, truncate_chars, word_count};
use crate::dom::{self, NodeId, Page, Role, render_path};
use crate::grep::filter_records;
use crate::registry::RefRegistry;

use super::{
    Quality, SnapshotMetadata, SnapshotResult, assemble, baseline_warnings, indent, make_ref_info,
};

struct Section {
    id: NodeId,
    role: String,
    heading: String,
    path: String,
    /// Concatenated match target: role, heading, path and full text.
    searchable: String,
}

struct Collector<'a> {
    page: &'a Page,
    options: &'a SnapshotOptions,
    sections: Vec<Section>,
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

    let mut collector = Collector {
        page,
        options,
        sections: Vec::new(),
        depth_limited: false,
        fault: None,
    };
    collector.collect(root, 0);
    let mut fault = false;
    if let Some(message) = collector.fault.take() {
        warn!("Traversal fault, keeping partial content: {}", message);
        warnings.push(format!("partial traversal: {message}"));
        fault = true;
    }
    let depth_limited = collector.depth_limited;
    let found = collector.sections.len();

    let mut grep_note = String::new();
    let kept = match &options.grep {
        Some(spec) => {
            let outcome = filter_records(collector.sections, |s| s.searchable.as_str(), spec);
            grep_note = spec.summary_note(outcome.match_count, outcome.total_count);
            outcome.items
        }
        None => collector.sections,
    };

    let mut lines: Vec<String> = Vec::new();
    let mut refs = std::collections::BTreeMap::new();
    for section in &kept {
        let token = registry.generate(section.id);
        let mut header = section.role.clone();
        if !section.heading.is_empty() {
            header.push_str(&format!(
                " \"{}\"",
                truncate_chars(&section.heading, options.tuning.name_max)
            ));
        }
        header.push(' ');
        header.push_str(&token);
        lines.push(header);
        render_section_body(page, section.id, options, &mut lines);
        let context = (!section.heading.is_empty()).then(|| section.heading.clone());
        refs.insert(
            token,
            make_ref_info(
                page,
                section.id,
                &section.role,
                &section.heading,
                section.path.clone(),
                None,
                context,
            ),
        );
    }

    let summary = format!("CONTENT: sections={}/{}{}", kept.len(), found, grep_note);
    let quality = if fault || page.info.viewport.area() == 0 || found == 0 {
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

impl Collector<'_> {
    fn collect(&mut self, id: NodeId, depth: usize) {
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

        if let Some(role) = self.section_role(id) {
            let heading = first_heading_text(self.page, id)
                .unwrap_or_else(|| dom::accessible_name(self.page, id));
            let path = render_path(self.page, id);
            let text = self.page.text_content(id);
            let searchable = format!("{} {} {} {}", role, heading, path, text);
            self.sections.push(Section {
                id,
                role,
                heading,
                path,
                searchable,
            });
            // Outermost boundary wins; nested boundaries fold into it.
            return;
        }
        for &child in &node.children {
            self.collect(child, depth + 1);
        }
    }

    /// Section role token when this node is a boundary.
    fn section_role(&self, id: NodeId) -> Option<String> {
        let node = self.page.get(id)?;
        let tuning = &self.options.tuning;
        match dom::role(node) {
            Some(Role::Region) => {
                // Named sections must carry real prose.
                let words = word_count(&self.page.text_content(id));
                (words >= tuning.named_section_min_words).then(|| Role::Region.name().to_string())
            }
            Some(role) if role.is_landmark() => Some(role.name().to_string()),
            Some(Role::Article) => Some(Role::Article.name().to_string()),
            _ => {
                // A <section> with an id counts as named even without an
                // accessible name, which earns it the lower word gate.
                if node.tag == "section" && node.attributes.id.is_some() {
                    let words = word_count(&self.page.text_content(id));
                    return (words >= tuning.named_section_min_words)
                        .then(|| node.tag.clone());
                }
                if node.attributes.id.is_none()
                    && dom::meaningful_class(&node.attributes).is_none()
                {
                    return None;
                }
                let words = word_count(&self.page.text_content(id));
                (words >= tuning.section_min_words).then(|| node.tag.clone())
            }
        }
    }
}

/// First heading text inside a subtree, in document order.
fn first_heading_text(page: &Page, root: NodeId) -> Option<String> {
    let mut seen = vec![false; page.len()];
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(node) = page.get(id) else {
            continue;
        };
        if seen[id.index()] {
            continue;
        }
        seen[id.index()] = true;
        if let Some(Role::Heading { .. }) = dom::role(node) {
            let text = page.text_content(id);
            if !text.is_empty() {
                return Some(text);
            }
        }
        for &child in node.children.iter().rev() {
            stack.push(child);
        }
    }
    None
}

/// Render the inside of one section as typed lines.
fn render_section_body(page: &Page, section: NodeId, options: &SnapshotOptions, out: &mut Vec<String>) {
    let tuning = &options.tuning;
    for &child in page.children(section) {
        render_block(page, child, options, tuning, out, 0);
    }
}

fn render_block(
    page: &Page,
    id: NodeId,
    options: &SnapshotOptions,
    tuning: &Tuning,
    out: &mut Vec<String>,
    depth: usize,
) {
    if depth > options.max_depth {
        return;
    }
    let Some(node) = page.get(id) else {
        return;
    };
    if !options.include_hidden && !dom::is_visible(page, id, false) {
        return;
    }
    let pad = indent(1);
    match dom::role(node) {
        Some(Role::Heading { level }) => {
            let text = page.text_content(id);
            if !text.is_empty() {
                out.push(format!("{}{} {}", pad, "#".repeat(level as usize), text));
            }
        }
        Some(Role::List) => {
            for &item in &node.children {
                let Some(item_node) = page.get(item) else {
                    continue;
                };
                if item_node.tag != "li" {
                    continue;
                }
                let text = page.text_content(item);
                if !text.is_empty() {
                    out.push(format!(
                        "{}- {}",
                        pad,
                        truncate_chars(&text, tuning.max_text_length)
                    ));
                }
            }
        }
        Some(Role::Code) if node.tag == "pre" => {
            let code = collapse_whitespace(&page.raw_text(id));
            if !code.is_empty() {
                out.push(format!(
                    "{}[code] {}",
                    pad,
                    truncate_chars(&code, tuning.max_text_length)
                ));
            }
        }
        _ => match node.tag.as_str() {
            "p" => {
                let text = page.text_content(id);
                if !text.is_empty() {
                    out.push(format!(
                        "{}{}",
                        pad,
                        truncate_chars(&text, tuning.max_text_length)
                    ));
                }
            }
            "blockquote" => {
                let text = page.text_content(id);
                if !text.is_empty() {
                    out.push(format!(
                        "{}> {}",
                        pad,
                        truncate_chars(&text, tuning.max_text_length)
                    ));
                }
            }
            // Tables and figures stay out of the text projection; the
            // content extractor handles them.
            "table" | "figure" | "img" | "script" | "style" => {}
            _ => {
                if let Some(text) = node.text.as_deref() {
                    let text = collapse_whitespace(text);
                    if !text.is_empty() {
                        out.push(format!(
                            "{}{}",
                            pad,
                            truncate_chars(&text, tuning.max_text_length)
                        ));
                    }
                }
                for &child in &node.children {
                    render_block(page, child, options, tuning, out, depth + 1);
                }
            }
        },
    }
}
