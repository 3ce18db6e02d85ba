//! Content extraction: a subtree rendered as Markdown or raw markup.
//!
//! Unlike the snapshot projections this produces a document, not an
//! element list: headings, paragraphs, lists, tables and code blocks in
//! reading order, with no refs. The overall output is capped and the cap
//! leaves an explicit marker, so a caller can always tell a short page
//! from a truncated one.

mod markdown;
mod raw;

use tracing::debug;

use crate::config::{ContentFormat, ContentOptions};
use crate::dom::{NodeId, Page};
use crate::error::SnapshotError;

/// Marker appended wherever output was cut short.
pub(crate) const TRUNCATION_MARKER: &str = "…[truncated]";

/// Render the subtree under `root` as readable text.
///
/// Only configuration problems return `Err`; an empty or text-free subtree
/// renders as an empty string.
pub fn extract_content(
    page: &Page,
    root: NodeId,
    options: &ContentOptions,
) -> Result<String, SnapshotError> {
    options.validate()?;
    if page.get(root).is_none() {
        return Err(SnapshotError::InvalidRoot(format!(
            "node {root} is not part of this page"
        )));
    }
    debug!(
        "Extracting {} content from {}",
        match options.format {
            ContentFormat::Markdown => "markdown",
            ContentFormat::Raw => "raw",
        },
        root
    );

    let text = match options.format {
        ContentFormat::Markdown => markdown::render(page, root, options),
        ContentFormat::Raw => raw::render(page, root, options),
    };
    Ok(cap_output(text, options.max_total))
}

/// Enforce the overall character cap, marking the cut.
pub(crate) fn cap_output(text: String, max_total: usize) -> String {
    if text.chars().count() <= max_total {
        return text;
    }
    let mut out: String = text.chars().take(max_total).collect();
    out.push('\n');
    out.push_str(TRUNCATION_MARKER);
    out
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
