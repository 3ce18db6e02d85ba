//! Structure projection: the landmark and heading skeleton.
//!
//! Breadth-first so the shallow page regions land first, with a hard line
//! budget. Hidden elements are deliberately visited: structural context
//! should survive captures taken before stylesheets resolve, where
//! visibility reads are unreliable. No refs are issued here.

use tracing::warn;

use crate::config::SnapshotOptions;
use crate::dom::{
    self, BreadthFirst, NodeId, Page, Role, WalkOptions, count_interactive_descendants,
};
use crate::dom::text::truncate_chars;
use crate::grep::filter_lines;

use super::{
    Quality, SnapshotMetadata, SnapshotResult, assemble, baseline_warnings, indent,
};

pub(super) fn render(page: &Page, root: NodeId, options: &SnapshotOptions) -> SnapshotResult {
    let mut warnings = baseline_warnings(&page.info);
    let mut lines: Vec<String> = Vec::new();
    let mut landmarks = 0usize;
    let mut headings = 0usize;
    let mut forms = 0usize;
    let mut truncated = false;
    let mut fault = false;

    let walk = WalkOptions {
        max_depth: options.max_depth,
        // Structural nodes render even when hidden; stylesheets may not
        // have been resolvable at capture time.
        include_hidden: true,
        check_ancestors: false,
    };
    let mut walker = BreadthFirst::new(page, root, walk);
    while let Some(step) = walker.next() {
        let (id, depth) = match step {
            Ok(step) => step,
            Err(err) => {
                warn!("Traversal fault, keeping partial structure: {}", err);
                warnings.push(format!("partial traversal: {err}"));
                fault = true;
                break;
            }
        };
        let Some(node) = page.get(id) else {
            continue;
        };
        let Some(role) = dom::role(node) else {
            continue;
        };
        let is_heading = matches!(role, Role::Heading { .. });
        if !role.is_landmark() && !is_heading {
            continue;
        }
        if lines.len() >= options.max_lines {
            // Budget spent and more structure remains.
            truncated = true;
            break;
        }

        let line = if let Role::Heading { level } = role {
            headings += 1;
            let text = truncate_chars(&page.text_content(id), options.tuning.name_max);
            format!("{}h{} \"{}\"", indent(depth), level, text)
        } else {
            landmarks += 1;
            if matches!(role, Role::Form) {
                forms += 1;
            }
            let mut line = format!("{}{}", indent(depth), role.name());
            if let Some(attr_id) = node.attributes.id.as_deref() {
                line.push('#');
                line.push_str(attr_id);
            }
            // Interaction counts are computed only for landmarks that
            // actually render, they are too costly to take everywhere.
            let counts = count_interactive_descendants(page, id);
            if !counts.is_empty() {
                line.push_str(&format!(" ({})", counts.summary()));
            }
            line
        };
        lines.push(line);
    }
    let depth_limited = walker.depth_limited();

    let mut grep_note = String::new();
    if let Some(spec) = &options.grep {
        let outcome = filter_lines(lines, spec);
        grep_note = spec.summary_note(outcome.match_count, outcome.total_count);
        lines = outcome.items;
    }

    let mut summary = format!("STRUCTURE: landmarks={landmarks} headings={headings} forms={forms}");
    if truncated {
        summary.push_str(" (truncated)");
    }
    summary.push_str(&grep_note);

    let quality = if fault || page.info.viewport.area() == 0 {
        Quality::Low
    } else if truncated {
        Quality::Medium
    } else {
        Quality::High
    };

    SnapshotResult {
        tree: assemble(&page.info, &summary, &lines),
        refs: Default::default(),
        metadata: SnapshotMetadata {
            total_interactive: 0,
            captured_elements: 0,
            quality,
            warnings,
            truncated,
            depth_limited,
        },
    }
}
