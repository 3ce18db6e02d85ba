//! Status projection: the cheapest look at a page.
//!
//! One counting walk, no rendered elements, no refs. Agents call this to
//! decide whether a page is worth a fuller snapshot yet.

use tracing::warn;

use crate::config::SnapshotOptions;
use crate::dom::{self, DepthFirst, NodeId, Page, ReadyState, WalkOptions};

use super::{Quality, SnapshotMetadata, SnapshotResult, assemble, baseline_warnings};

pub(super) fn render(page: &Page, root: NodeId, options: &SnapshotOptions) -> SnapshotResult {
    let mut warnings = baseline_warnings(&page.info);
    let mut nodes = 0usize;
    let mut interactive = 0usize;
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
                warn!("Traversal fault during status count: {}", err);
                warnings.push(format!("partial traversal: {err}"));
                fault = true;
                break;
            }
        };
        nodes += 1;
        if page.get(id).is_some_and(dom::is_interactive) {
            interactive += 1;
        }
    }
    let depth_limited = walker.depth_limited();

    let status = if page.info.viewport.area() == 0 {
        "loading"
    } else if interactive == 0 {
        "empty"
    } else if page.info.ready_state == ReadyState::Complete {
        "ready"
    } else {
        "interactive"
    };

    let summary = format!(
        "STATUS: {} | ready={} | interactive={} | nodes={}",
        status,
        page.info.ready_state.as_str(),
        interactive,
        nodes
    );

    let quality = if fault || page.info.viewport.area() == 0 {
        Quality::Low
    } else {
        Quality::High
    };

    SnapshotResult {
        tree: assemble(&page.info, &summary, &[]),
        refs: Default::default(),
        metadata: SnapshotMetadata {
            total_interactive: interactive,
            captured_elements: 0,
            quality,
            warnings,
            truncated: false,
            depth_limited,
        },
    }
}
