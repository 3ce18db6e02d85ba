//! Snapshot and extraction options, plus the tunable heuristics table.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::grep::GrepSpec;

/// Which projection of the page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotMode {
    /// Header and counters only, no traversal beyond counting.
    Status,
    /// Actionable elements with refs. The default projection.
    #[default]
    Interactive,
    /// Landmark and heading skeleton, breadth-first, line budgeted.
    Structure,
    /// Hierarchical overview with refs on container elements.
    Outline,
    /// Readable text organized into sections.
    Content,
    /// Interactive plus all other role-bearing elements.
    Full,
}

impl SnapshotMode {
    /// Lowercase mode token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Interactive => "interactive",
            Self::Structure => "structure",
            Self::Outline => "outline",
            Self::Content => "content",
            Self::Full => "full",
        }
    }
}

/// Tunable thresholds behind the rendering heuristics.
///
/// The defaults are the values the engine was calibrated with; none of
/// them is assumed optimal, which is why they are all adjustable per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Captured/total ratio at or above which quality is Medium.
    #[serde(default = "default_capture_ratio")]
    pub capture_ratio: f64,
    /// Words needed before a classed container counts as a content section.
    #[serde(default = "default_section_min_words")]
    pub section_min_words: usize,
    /// Words needed before a named section counts as a content section.
    #[serde(default = "default_named_section_min_words")]
    pub named_section_min_words: usize,
    /// Words needed before a classed div appears in the outline.
    #[serde(default = "default_outline_div_min_words")]
    pub outline_div_min_words: usize,
    /// Character cap for paragraph text in content lines.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    /// Character cap for accessible names in rendered lines.
    #[serde(default = "default_name_max")]
    pub name_max: usize,
}

fn default_capture_ratio() -> f64 {
    0.5
}

fn default_section_min_words() -> usize {
    100
}

fn default_named_section_min_words() -> usize {
    30
}

fn default_outline_div_min_words() -> usize {
    50
}

fn default_max_text_length() -> usize {
    120
}

fn default_name_max() -> usize {
    60
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            capture_ratio: default_capture_ratio(),
            section_min_words: default_section_min_words(),
            named_section_min_words: default_named_section_min_words(),
            outline_div_min_words: default_outline_div_min_words(),
            max_text_length: default_max_text_length(),
            name_max: default_name_max(),
        }
    }
}

/// Options accepted by every snapshot mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotOptions {
    /// Maximum traversal depth below the root. The root is depth 0.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Render hidden elements instead of pruning them.
    #[serde(default)]
    pub include_hidden: bool,
    /// Line budget for structure mode.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    /// Optional pattern filter over rendered lines or sections.
    #[serde(default)]
    pub grep: Option<GrepSpec>,
    /// Heuristic thresholds.
    #[serde(default)]
    pub tuning: Tuning,
}

fn default_max_depth() -> usize {
    12
}

fn default_max_lines() -> usize {
    40
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            include_hidden: false,
            max_lines: default_max_lines(),
            grep: None,
            tuning: Tuning::default(),
        }
    }
}

/// Recursion ceiling; depth bounds above it are rejected up front.
pub(crate) const MAX_DEPTH_LIMIT: usize = 256;

impl SnapshotOptions {
    /// Validate eagerly, before any traversal starts.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.max_depth == 0 {
            return Err(SnapshotError::InvalidOptions(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(SnapshotError::InvalidOptions(format!(
                "max_depth must not exceed {MAX_DEPTH_LIMIT}"
            )));
        }
        if self.max_lines == 0 {
            return Err(SnapshotError::InvalidOptions(
                "max_lines must be at least 1".to_string(),
            ));
        }
        if let Some(grep) = &self.grep {
            if grep.pattern.is_empty() {
                return Err(SnapshotError::InvalidOptions(
                    "grep pattern must not be empty".to_string(),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.tuning.capture_ratio) {
            return Err(SnapshotError::InvalidOptions(format!(
                "capture_ratio must be within 0.0..=1.0, got {}",
                self.tuning.capture_ratio
            )));
        }
        Ok(())
    }
}

/// Output format for content extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// Markdown rendering of the subtree.
    #[default]
    Markdown,
    /// Reconstructed markup, bounded by `max_length`.
    Raw,
}

/// Options for [`extract_content`](crate::extract::extract_content).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentOptions {
    /// Output format.
    #[serde(default)]
    pub format: ContentFormat,
    /// Render anchors as Markdown links. Defaults on for Markdown; setting
    /// it explicitly for Raw output is a conflict.
    #[serde(default)]
    pub include_links: Option<bool>,
    /// Render images as Markdown images. Defaults off; setting it
    /// explicitly for Raw output is a conflict.
    #[serde(default)]
    pub include_images: Option<bool>,
    /// Optional length cap for raw markup, with a truncation marker.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Overall output cap in characters.
    #[serde(default = "default_max_total")]
    pub max_total: usize,
}

fn default_max_total() -> usize {
    20_000
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            format: ContentFormat::default(),
            include_links: None,
            include_images: None,
            max_length: None,
            max_total: default_max_total(),
        }
    }
}

impl ContentOptions {
    /// Validate eagerly.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.format == ContentFormat::Raw {
            if self.include_links == Some(true) {
                return Err(SnapshotError::InvalidOptions(
                    "include_links only applies to markdown output".to_string(),
                ));
            }
            if self.include_images == Some(true) {
                return Err(SnapshotError::InvalidOptions(
                    "include_images only applies to markdown output".to_string(),
                ));
            }
        }
        if self.max_total == 0 {
            return Err(SnapshotError::InvalidOptions(
                "max_total must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective link rendering switch.
    pub(crate) fn links_enabled(&self) -> bool {
        self.format == ContentFormat::Markdown && self.include_links.unwrap_or(true)
    }

    /// Effective image rendering switch.
    pub(crate) fn images_enabled(&self) -> bool {
        self.format == ContentFormat::Markdown && self.include_images.unwrap_or(false)
    }
}
