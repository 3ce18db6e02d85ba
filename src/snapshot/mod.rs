//! Snapshot generation: one entry point, six projections.
//!
//! [`generate_snapshot`] turns a page capture into deterministic text for
//! an LLM agent. Each mode is a separate renderer over the same traversal
//! and inspection primitives; they all share the output frame (header
//! line, summary line, blank line, content lines) and the same metadata
//! contract. Rendering never fails for a well-formed capture; corrupt
//! captures produce partial output plus a warning instead of an error.

mod content;
mod interactive;
mod outline;
mod status;
mod structure;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{SnapshotMode, SnapshotOptions};
use crate::dom::{BoundingBox, NodeId, Page, PageInfo};
use crate::error::SnapshotError;
use crate::registry::RefRegistry;

/// Coarse completeness signal for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Everything that matters was captured.
    High,
    /// Enough was captured to act on, but not everything.
    Medium,
    /// Suspiciously little was captured; treat with care.
    Low,
}

impl Quality {
    /// Lowercase token as it appears in summary lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// What a `@ref:N` token points at, enough to act on it later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefInfo {
    /// Semantic path selector for re-finding the element.
    pub selector: String,
    /// Role token.
    pub role: String,
    /// Accessible name, possibly empty.
    pub name: String,
    /// Bounding box, absent when the capture had no geometry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    /// Whether the box intersects the viewport.
    pub in_viewport: bool,
    /// Interaction confidence, when the renderer graded it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    /// Nearest preceding heading text, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Counters and degradation signals for one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Interactive elements seen during traversal, rendered or not.
    pub total_interactive: usize,
    /// Elements that received refs; always equals the ref table size.
    pub captured_elements: usize,
    /// Completeness grade.
    pub quality: Quality,
    /// Human-readable degradation notes.
    pub warnings: Vec<String>,
    /// True when a line budget cut the output short.
    pub truncated: bool,
    /// True when the depth bound pruned at least one subtree.
    pub depth_limited: bool,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            total_interactive: 0,
            captured_elements: 0,
            quality: Quality::Low,
            warnings: Vec::new(),
            truncated: false,
            depth_limited: false,
        }
    }
}

/// One rendered snapshot: text, reference table, metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResult {
    /// Rendered text, ready to paste into a prompt.
    pub tree: String,
    /// Token to target mapping for every ref the text mentions.
    pub refs: BTreeMap<String, RefInfo>,
    /// Counters and degradation signals.
    pub metadata: SnapshotMetadata,
}

/// Render one snapshot of `page` rooted at `root`.
///
/// The registry is cleared before any token is issued, so tokens from a
/// previous pass never survive into this one. Only configuration problems
/// return `Err`; per-node faults degrade into `metadata.warnings` and a
/// lower quality grade.
pub fn generate_snapshot(
    page: &Page,
    root: NodeId,
    registry: &mut RefRegistry,
    mode: SnapshotMode,
    options: &SnapshotOptions,
) -> Result<SnapshotResult, SnapshotError> {
    options.validate()?;
    if page.get(root).is_none() {
        return Err(SnapshotError::InvalidRoot(format!(
            "node {root} is not part of this page"
        )));
    }
    registry.clear();
    debug!(
        "Generating {} snapshot of {} nodes from {}",
        mode.as_str(),
        page.len(),
        root
    );

    let result = match mode {
        SnapshotMode::Status => status::render(page, root, options),
        SnapshotMode::Interactive => interactive::render(page, root, registry, options, false),
        SnapshotMode::Full => interactive::render(page, root, registry, options, true),
        SnapshotMode::Structure => structure::render(page, root, options),
        SnapshotMode::Outline => outline::render(page, root, registry, options),
        SnapshotMode::Content => content::render(page, root, registry, options),
    };
    debug!(
        "Rendered {} snapshot: {} refs, quality {}",
        mode.as_str(),
        result.refs.len(),
        result.metadata.quality.as_str()
    );
    Ok(result)
}

// ===== Shared rendering helpers =====

/// Fixed first line of every snapshot.
pub(crate) fn page_header(info: &PageInfo) -> String {
    format!(
        "PAGE: {} | {} | viewport={}x{}",
        info.url, info.title, info.viewport.width, info.viewport.height
    )
}

/// Assemble the output frame: header, summary, blank separator, content.
pub(crate) fn assemble(info: &PageInfo, summary: &str, lines: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&page_header(info));
    out.push('\n');
    out.push_str(summary);
    out.push('\n');
    out.push('\n');
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Two spaces per nesting level.
pub(crate) fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Grade capture completeness.
pub(crate) fn quality_for(
    captured: usize,
    total: usize,
    viewport_area: u64,
    capture_ratio: f64,
) -> Quality {
    if viewport_area == 0 || captured == 0 {
        return Quality::Low;
    }
    if captured >= total {
        return Quality::High;
    }
    if captured as f64 >= total as f64 * capture_ratio {
        return Quality::Medium;
    }
    Quality::Low
}

/// Interstitial and challenge pages advertise themselves in the title.
const INTERSTITIAL_TITLES: &[&str] = &[
    "just a moment",
    "attention required",
    "access denied",
    "checking your browser",
    "verify you are human",
];

/// Page-level degradation notes every mode starts from.
pub(crate) fn baseline_warnings(info: &PageInfo) -> Vec<String> {
    let mut warnings = Vec::new();
    if info.viewport.area() == 0 {
        warnings.push("viewport has zero area, page may still be loading".to_string());
    }
    let title = info.title.to_lowercase();
    if INTERSTITIAL_TITLES.iter().any(|t| title.contains(t)) {
        warnings.push(format!(
            "title \"{}\" suggests an interstitial or challenge page",
            info.title
        ));
    }
    if info.url.is_empty() || info.url == "about:blank" {
        warnings.push("page has no navigable URL, capture may be transitional".to_string());
    }
    warnings
}

/// Build the target record for a freshly issued ref.
///
/// Geometry faults degrade to an absent box rather than failing the pass;
/// the selector still lets the host re-find the element.
pub(crate) fn make_ref_info(
    page: &Page,
    id: NodeId,
    role: &str,
    name: &str,
    selector: String,
    importance: Option<f64>,
    context: Option<String>,
) -> RefInfo {
    let (bbox, in_viewport) = match page.bounding_box(id) {
        Ok(bbox) => {
            let in_viewport = bbox.in_viewport(&page.info.viewport);
            (Some(bbox), in_viewport)
        }
        Err(err) => {
            debug!("Ref target {} has no usable geometry: {}", id, err);
            (None, false)
        }
    };
    RefInfo {
        selector,
        role: role.to_string(),
        name: name.to_string(),
        bbox,
        in_viewport,
        importance,
        context,
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
