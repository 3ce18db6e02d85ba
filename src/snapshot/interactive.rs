//! Interactive and full projections: the actionable-element lines.
//!
//! Interactive mode lists every visible element an agent can act on; full
//! mode widens the same walk to every role-bearing element. Refs are
//! issued only after the optional pattern filter has picked the surviving
//! lines, so token numbering stays contiguous whatever the filter drops.

use tracing::warn;

use crate::config::SnapshotOptions;
use crate::dom::{
    self, DepthFirst, NodeId, Page, Role, WalkOptions, render_path,
};
use crate::dom::text::truncate_chars;
use crate::grep::filter_records;
use crate::registry::RefRegistry;

use super::{
    Quality, SnapshotMetadata, SnapshotResult, assemble, baseline_warnings, make_ref_info,
    quality_for,
};

struct Candidate {
    id: NodeId,
    token: String,
    name: String,
    detail: String,
    states: Vec<&'static str>,
    path: String,
    score: f64,
    context: Option<String>,
    /// Line text without the ref token, which is what the filter sees.
    searchable: String,
}

pub(super) fn render(
    page: &Page,
    root: NodeId,
    registry: &mut RefRegistry,
    options: &SnapshotOptions,
    include_all: bool,
) -> SnapshotResult {
    let mut warnings = baseline_warnings(&page.info);
    let mut total_interactive = 0usize;
    let mut current_heading: Option<String> = None;
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut fault = false;

    let walk = WalkOptions {
        max_depth: options.max_depth,
        include_hidden: options.include_hidden,
        check_ancestors: false,
    };
    let mut walker = DepthFirst::new(page, root, walk);
    while let Some(step) = walker.next() {
        let id = match step {
            Ok((id, _)) => id,
            Err(err) => {
                warn!("Traversal fault, keeping partial snapshot: {}", err);
                warnings.push(format!("partial traversal: {err}"));
                fault = true;
                break;
            }
        };
        let Some(node) = page.get(id) else {
            continue;
        };
        let role = dom::role(node);

        // Headings provide context for everything that follows them.
        if let Some(Role::Heading { .. }) = role {
            let text = page.text_content(id);
            if !text.is_empty() {
                current_heading = Some(truncate_chars(&text, options.tuning.name_max));
            }
        }

        let interactive = dom::is_interactive(node);
        if interactive {
            total_interactive += 1;
        }
        // Rendering needs a role; roleless widgets still count above.
        let Some(role) = role else {
            continue;
        };
        if !include_all && !interactive {
            continue;
        }

        let token = role.name().to_string();
        let name = dom::accessible_name(page, id);
        let detail = dom::input_attributes(node);
        let states = dom::states(node);
        let path = render_path(page, id);
        let score = dom::interaction_score(node);

        let searchable = compose_line(
            &token,
            &name,
            None,
            &detail,
            &states,
            &path,
            options.tuning.name_max,
        );
        candidates.push(Candidate {
            id,
            token,
            name,
            detail,
            states,
            path,
            score,
            context: current_heading.clone(),
            searchable,
        });
    }
    let depth_limited = walker.depth_limited();

    // Quality grades capture completeness, so it is taken before the
    // pattern filter narrows the lines on purpose.
    let captured_before_filter = candidates.len();
    let mut quality = quality_for(
        captured_before_filter,
        total_interactive,
        page.info.viewport.area(),
        options.tuning.capture_ratio,
    );
    if fault {
        quality = Quality::Low;
    }
    if captured_before_filter < total_interactive {
        warnings.push(format!(
            "captured {captured_before_filter} of {total_interactive} interactive elements"
        ));
    }

    let mut grep_note = String::new();
    let kept = match &options.grep {
        Some(spec) => {
            let outcome = filter_records(candidates, |c| c.searchable.as_str(), spec);
            grep_note = spec.summary_note(outcome.match_count, outcome.total_count);
            outcome.items
        }
        None => candidates,
    };

    let mut lines = Vec::with_capacity(kept.len());
    let mut refs = std::collections::BTreeMap::new();
    for candidate in kept {
        let token = registry.generate(candidate.id);
        lines.push(compose_line(
            &candidate.token,
            &candidate.name,
            Some(&token),
            &candidate.detail,
            &candidate.states,
            &candidate.path,
            options.tuning.name_max,
        ));
        let importance = (candidate.score > 0.0).then_some(candidate.score);
        refs.insert(
            token,
            make_ref_info(
                page,
                candidate.id,
                &candidate.token,
                &candidate.name,
                candidate.path.clone(),
                importance,
                candidate.context.clone(),
            ),
        );
    }

    let prefix = if include_all { "ALL" } else { "SNAPSHOT" };
    let summary = format!(
        "{}: refs={} interactive={} quality={}{}",
        prefix,
        refs.len(),
        total_interactive,
        quality.as_str(),
        grep_note
    );

    let captured_elements = refs.len();
    SnapshotResult {
        tree: assemble(&page.info, &summary, &lines),
        refs,
        metadata: SnapshotMetadata {
            total_interactive,
            captured_elements,
            quality,
            warnings,
            truncated: false,
            depth_limited,
        },
    }
}

/// One element line: `role "name" @ref:N [detail] (states) path`.
///
/// Empty parts vanish rather than leaving stray brackets.
fn compose_line(
    token: &str,
    name: &str,
    ref_token: Option<&str>,
    detail: &str,
    states: &[&'static str],
    path: &str,
    name_max: usize,
) -> String {
    let mut parts: Vec<String> = vec![token.to_string()];
    if !name.is_empty() {
        parts.push(format!("\"{}\"", truncate_chars(name, name_max)));
    }
    if let Some(ref_token) = ref_token {
        parts.push(ref_token.to_string());
    }
    if !detail.is_empty() {
        parts.push(detail.to_string());
    }
    if !states.is_empty() {
        parts.push(format!("({})", states.join(" ")));
    }
    if !path.is_empty() {
        parts.push(path.to_string());
    }
    parts.join(" ")
}
