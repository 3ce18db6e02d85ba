//! Semantic paths: stable, human-legible structural locators.
//!
//! A semantic path keeps only the ancestors that mean something, so
//! `main > form#login > button.submit` survives a re-render that shuffles
//! wrapper divs, where a full CSS path would not. Utility and generated
//! class names are filtered out; a sibling index is appended only where
//! two rendered siblings would otherwise collide.

use once_cell::sync::Lazy;
use regex::Regex;

use super::node::{NodeAttributes, NodeId, PageNode};
use super::page::Page;

/// Tags that stay in a path even without id or class.
const SEMANTIC_TAGS: &[&str] = &[
    "main", "nav", "header", "footer", "aside", "section", "article", "form", "dialog", "fieldset",
    "table", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Generated-prefix classes carry no human meaning.
static GENERATED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(tw-|css-|sc-|jsx-|mui-|chakra-|is-|has-|js-)").unwrap());

/// Atomic utility classes like `px-4`, `mt-2`, `text-sm`.
static ATOMIC_UTILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(p|m|px|py|mx|my|mt|mb|ml|mr|pt|pb|pl|pr|w|h|gap|text|bg|border|flex|grid|col|row)(-|$)",
    )
    .unwrap()
});

/// Build-hash suffixes like `Button_root__3xk9z`.
static HASH_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"__[0-9a-zA-Z]{4,}$").unwrap());

/// One rendered path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Tag name, or the explicit role token when one is set.
    pub label: String,
    /// Element id, when present.
    pub id: Option<String>,
    /// First meaningful class, when any survives filtering.
    pub class: Option<String>,
    /// 1-based position among same-tag siblings, only when needed.
    pub index: Option<usize>,
}

impl PathSegment {
    fn render(&self) -> String {
        let mut out = self.label.clone();
        if let Some(id) = &self.id {
            out.push('#');
            out.push_str(id);
        }
        if let Some(class) = &self.class {
            out.push('.');
            out.push_str(class);
        }
        if let Some(index) = self.index {
            out.push_str(&format!("[{index}]"));
        }
        out
    }
}

/// Structural locator built from semantically meaningful ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticPath {
    /// Segments from outermost kept ancestor down to the node itself.
    pub segments: Vec<PathSegment>,
}

impl SemanticPath {
    /// Render in `tag#id.class[n] > ...` form.
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(PathSegment::render)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// True for class tokens a human would recognize.
///
/// Rejects short tokens, generated prefixes, atomic utilities and
/// hash-suffixed build artifacts.
pub fn is_meaningful_class(token: &str) -> bool {
    if token.chars().count() < 3 {
        return false;
    }
    if GENERATED_PREFIX.is_match(token) || ATOMIC_UTILITY.is_match(token) {
        return false;
    }
    if HASH_SUFFIX.is_match(token) {
        return false;
    }
    if looks_hashlike(token) {
        return false;
    }
    true
}

/// Minified and hashed class names mix digits into short letter runs.
fn looks_hashlike(token: &str) -> bool {
    let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return false;
    }
    // BEM-ish names keep digits behind separators; hashes do not.
    digits >= 3 && !token.contains('-') && !token.contains('_')
}

/// First meaningful class of a node, if any.
pub fn meaningful_class(attrs: &NodeAttributes) -> Option<&str> {
    attrs.classes().find(|c| is_meaningful_class(c))
}

/// Build the semantic path for a node.
///
/// Walks the ancestor chain, keeping the node itself plus every ancestor
/// that is a semantic tag, carries an explicit role, or has an id or a
/// meaningful class. Unknown ids along a corrupt chain end the walk early;
/// the partial path is still usable.
pub fn semantic_path(page: &Page, id: NodeId) -> SemanticPath {
    let mut segments = Vec::new();
    let mut seen = vec![false; page.len()];
    let mut current = Some(id);
    let mut hops = 0usize;
    while let Some(node_id) = current {
        hops += 1;
        if hops > super::MAX_ANCESTOR_HOPS {
            break;
        }
        let Some(node) = page.get(node_id) else {
            break;
        };
        if let Some(visited) = seen.get_mut(node_id.index()) {
            if *visited {
                break;
            }
            *visited = true;
        }
        if node_id == id || keeps_segment(node) {
            segments.push(build_segment(page, node_id, node));
        }
        current = node.parent;
    }
    segments.reverse();
    SemanticPath { segments }
}

/// Convenience wrapper: rendered path string.
pub fn render_path(page: &Page, id: NodeId) -> String {
    semantic_path(page, id).render()
}

fn keeps_segment(node: &PageNode) -> bool {
    if SEMANTIC_TAGS.contains(&node.tag.as_str()) {
        return true;
    }
    if node
        .attributes
        .role
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty())
    {
        return true;
    }
    if node.attributes.id.is_some() {
        return true;
    }
    meaningful_class(&node.attributes).is_some()
}

fn build_segment(page: &Page, id: NodeId, node: &PageNode) -> PathSegment {
    let label = node
        .attributes
        .role
        .as_deref()
        .map(|r| r.trim().to_ascii_lowercase())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| node.tag.clone());
    let attr_id = node.attributes.id.clone();
    let class = meaningful_class(&node.attributes).map(str::to_string);
    let index = if attr_id.is_some() {
        None
    } else {
        sibling_index(page, id, node)
    };
    PathSegment {
        label,
        id: attr_id,
        class,
        index,
    }
}

/// 1-based index among same-tag siblings, `None` when the tag is unique
/// at this level.
fn sibling_index(page: &Page, id: NodeId, node: &PageNode) -> Option<usize> {
    let parent = node.parent?;
    let siblings = page.children(parent);
    let mut same_tag = 0usize;
    let mut position = 0usize;
    for &sibling in siblings {
        let Some(sibling_node) = page.get(sibling) else {
            continue;
        };
        if sibling_node.tag == node.tag {
            same_tag += 1;
            if sibling == id {
                position = same_tag;
            }
        }
    }
    if same_tag > 1 { Some(position) } else { None }
}
