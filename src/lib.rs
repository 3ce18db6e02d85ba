//! Deterministic text snapshots of page captures for LLM browser agents.
//!
//! An agent driving a browser cannot read pixels; it reads text. This
//! crate turns a captured page tree into compact, deterministic text the
//! agent can reason over and act on, with `@ref:N` tokens as stable
//! handles back to the elements of that snapshot.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   traversal +    ┌───────────────┐   lines + refs   ┌────────────────┐
//! │   Page   │ ───────────────► │ mode renderer │ ───────────────► │ SnapshotResult │
//! │ (arena)  │   inspection     │ (1 of 6)      │   + metadata     │                │
//! └──────────┘                  └───────────────┘                  └────────────────┘
//!                                      ▲
//!                              optional pattern
//!                              filter (grep)
//! ```
//!
//! ## Modes
//!
//! - `status` - header and counters only, the cheapest look at a page
//! - `interactive` - actionable elements with refs (the default)
//! - `structure` - landmark/heading skeleton, breadth-first, line budgeted
//! - `outline` - hierarchical overview, refs on container elements
//! - `content` - readable text grouped into sections
//! - `full` - interactive plus every other role-bearing element
//!
//! Separately, [`extract_content`] renders a subtree as Markdown or raw
//! markup for reading rather than acting.
//!
//! ## Determinism
//!
//! The same capture, mode and options always produce byte-identical
//! output. Refs are issued in emission order starting at `@ref:0` and are
//! valid only for the snapshot that produced them; the caller-owned
//! [`RefRegistry`] is cleared at the start of every pass.
//!
//! ## Example
//!
//! ```
//! use pagelens::{
//!     PageBuilder, RefRegistry, SnapshotMode, SnapshotOptions, generate_snapshot,
//! };
//!
//! let mut builder = PageBuilder::new("html");
//! let body = builder.child(builder.root(), "body");
//! let button = builder.text_child(body, "button", "Submit");
//! builder.bounds(button, 10.0, 10.0, 80.0, 24.0);
//! let page = builder.build();
//!
//! let mut registry = RefRegistry::new();
//! let snapshot = generate_snapshot(
//!     &page,
//!     page.root(),
//!     &mut registry,
//!     SnapshotMode::Interactive,
//!     &SnapshotOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(snapshot.tree.contains("button \"Submit\" @ref:0"));
//! assert_eq!(registry.get("@ref:0"), Some(button));
//! ```

mod config;
pub mod dom;
mod error;
pub mod extract;
mod grep;
mod registry;
pub mod snapshot;

pub use config::{ContentFormat, ContentOptions, SnapshotMode, SnapshotOptions, Tuning};
pub use dom::{
    BoundingBox, BreadthFirst, ComputedStyle, DepthFirst, InteractionCounts, NodeAttributes,
    NodeId, Page, PageBuilder, PageInfo, PageNode, ReadyState, Role, SemanticPath, Viewport,
    WalkOptions, accessible_name, count_interactive_descendants, interaction_score,
    is_interactive, is_visible, render_path, role, semantic_path,
};
pub use error::{NodeAccessError, SnapshotError};
pub use extract::extract_content;
pub use grep::{GrepOutcome, GrepSpec, filter_lines, filter_records};
pub use registry::RefRegistry;
pub use snapshot::{
    Quality, RefInfo, SnapshotMetadata, SnapshotResult, generate_snapshot,
};
