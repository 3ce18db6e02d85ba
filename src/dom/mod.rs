//! Page capture model and read-side queries.
//!
//! A capture is an immutable arena of [`PageNode`]s plus page-level facts.
//! On top of it sit pure queries: classification and naming ([`role`],
//! [`accessible_name`]), stable locators ([`semantic_path`]), and bounded
//! traversal ([`DepthFirst`], [`BreadthFirst`]).

mod inspect;
mod node;
mod page;
mod path;
pub(crate) mod text;
mod walk;

/// Bound on ancestor-chain walks. Well-formed captures never get close;
/// corrupt ones with cyclic parent links terminate instead of spinning.
pub(crate) const MAX_ANCESTOR_HOPS: usize = 256;

pub use inspect::{
    Role, accessible_name, input_attributes, interaction_score, is_interactive, is_visible, role,
    states,
};
pub use node::{
    BoundingBox, ComputedStyle, NodeAttributes, NodeId, PageInfo, PageNode, ReadyState, Viewport,
};
pub use page::{Page, PageBuilder};
pub use path::{
    PathSegment, SemanticPath, is_meaningful_class, meaningful_class, render_path, semantic_path,
};
pub use walk::{
    BreadthFirst, DepthFirst, InteractionCounts, WalkOptions, WalkStep,
    count_interactive_descendants,
};

#[cfg(test)]
mod inspect_tests;
#[cfg(test)]
mod page_tests;
