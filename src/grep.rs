//! Pattern filter: grep-style narrowing of rendered lines and records.
//!
//! Every snapshot mode can hand its output through here before refs are
//! issued. The pattern flows through a fixed build chain: literal escaping
//! for fixed-string mode, then word-boundary wrapping, then whole-line
//! anchoring, then case folding. A pattern that still fails to compile
//! never aborts the pass; filtering degrades to plain substring matching
//! and the degradation is logged.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One filter invocation's parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrepSpec {
    /// Pattern text, regex syntax unless `fixed_strings` is set.
    pub pattern: String,
    /// Case-insensitive matching.
    #[serde(default)]
    pub ignore_case: bool,
    /// Keep non-matching items instead of matching ones.
    #[serde(default)]
    pub invert: bool,
    /// Treat the pattern as a literal string.
    #[serde(default)]
    pub fixed_strings: bool,
    /// Require the match to sit on word boundaries.
    #[serde(default)]
    pub word_boundary: bool,
    /// Require the pattern to match the whole line.
    #[serde(default)]
    pub whole_line: bool,
}

impl GrepSpec {
    /// Literal pattern with default flags.
    pub fn literal(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            fixed_strings: true,
            ..Self::default()
        }
    }

    /// Regex pattern with default flags.
    pub fn regex(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            ..Self::default()
        }
    }

    /// Short `grep="..."` note for snapshot summary lines.
    pub(crate) fn summary_note(&self, kept: usize, total: usize) -> String {
        format!(" grep=\"{}\" matched={}/{}", self.pattern, kept, total)
    }
}

/// Outcome of one filter application.
#[derive(Debug, Clone)]
pub struct GrepOutcome<T> {
    /// Items that survived the filter, original order preserved.
    pub items: Vec<T>,
    /// Pattern that was applied.
    pub pattern: String,
    /// Number of surviving items.
    pub match_count: usize,
    /// Number of items examined.
    pub total_count: usize,
}

enum Matcher {
    Regex(regex::Regex),
    /// Fallback when the pattern does not compile.
    Substring {
        needle: String,
        fold_case: bool,
    },
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Regex(re) => re.is_match(text),
            Self::Substring { needle, fold_case } => {
                if *fold_case {
                    text.to_lowercase().contains(needle)
                } else {
                    text.contains(needle)
                }
            }
        }
    }
}

fn build_matcher(spec: &GrepSpec) -> Matcher {
    let mut pattern = if spec.fixed_strings {
        regex::escape(&spec.pattern)
    } else {
        spec.pattern.clone()
    };
    if spec.word_boundary {
        pattern = format!(r"\b(?:{pattern})\b");
    }
    if spec.whole_line {
        pattern = format!(r"^(?:{pattern})$");
    }
    match RegexBuilder::new(&pattern)
        .case_insensitive(spec.ignore_case)
        .build()
    {
        Ok(re) => Matcher::Regex(re),
        Err(err) => {
            warn!(
                "Pattern {:?} failed to compile ({}), falling back to substring match",
                spec.pattern, err
            );
            let fold_case = spec.ignore_case;
            let needle = if fold_case {
                spec.pattern.to_lowercase()
            } else {
                spec.pattern.clone()
            };
            Matcher::Substring { needle, fold_case }
        }
    }
}

/// Filter arbitrary records through the text each one exposes.
///
/// `text_of` projects a record onto the text the pattern runs against;
/// order is preserved and `invert` flips the kept set.
pub fn filter_records<T>(
    records: Vec<T>,
    text_of: impl Fn(&T) -> &str,
    spec: &GrepSpec,
) -> GrepOutcome<T> {
    let matcher = build_matcher(spec);
    let total_count = records.len();
    let items: Vec<T> = records
        .into_iter()
        .filter(|record| matcher.matches(text_of(record)) != spec.invert)
        .collect();
    let match_count = items.len();
    GrepOutcome {
        items,
        pattern: spec.pattern.clone(),
        match_count,
        total_count,
    }
}

/// Filter rendered text lines.
pub fn filter_lines(lines: Vec<String>, spec: &GrepSpec) -> GrepOutcome<String> {
    filter_records(lines, |line| line.as_str(), spec)
}
