//! Tree traversal: lazy, bounded walks over a page capture.
//!
//! Both orders share the same contract. A walker yields
//! `Result<(NodeId, usize), NodeAccessError>` pairs of node id and depth,
//! prunes hidden subtrees entirely unless told otherwise, stops descending
//! at the depth bound, and fuses after yielding the first error. Building
//! a fresh walker restarts from the root; nothing is cached between walks.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::NodeAccessError;

use super::inspect::{self, Role};
use super::node::NodeId;
use super::page::Page;

/// Bounds and filters shared by both traversal orders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WalkOptions {
    /// Maximum depth below the root to visit. The root is depth 0.
    pub max_depth: usize,
    /// Visit hidden nodes and their subtrees instead of pruning them.
    #[serde(default)]
    pub include_hidden: bool,
    /// Re-check the full ancestor chain at every node. Only useful when
    /// walking from a subtree root whose ancestors may be hidden.
    #[serde(default)]
    pub check_ancestors: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: 12,
            include_hidden: false,
            check_ancestors: false,
        }
    }
}

/// One traversal step: node id and its depth below the walk root.
pub type WalkStep = Result<(NodeId, usize), NodeAccessError>;

/// Depth-first walk in document order.
pub struct DepthFirst<'a> {
    page: &'a Page,
    options: WalkOptions,
    stack: Vec<(NodeId, usize)>,
    depth_limited: bool,
    fused: bool,
}

impl<'a> DepthFirst<'a> {
    pub fn new(page: &'a Page, root: NodeId, options: WalkOptions) -> Self {
        Self {
            page,
            options,
            stack: vec![(root, 0)],
            depth_limited: false,
            fused: false,
        }
    }

    /// True once the depth bound has pruned at least one subtree.
    pub fn depth_limited(&self) -> bool {
        self.depth_limited
    }
}

impl Iterator for DepthFirst<'_> {
    type Item = WalkStep;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.fused {
            let (id, depth) = self.stack.pop()?;
            let node = match self.page.node(id) {
                Ok(node) => node,
                Err(err) => {
                    self.fused = true;
                    return Some(Err(err));
                }
            };
            if !self.options.include_hidden
                && !inspect::is_visible(self.page, id, self.options.check_ancestors)
            {
                // Hidden roots hide their whole subtree.
                continue;
            }
            if depth < self.options.max_depth {
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
            } else if !node.children.is_empty() {
                self.depth_limited = true;
            }
            return Some(Ok((id, depth)));
        }
        None
    }
}

impl std::iter::FusedIterator for DepthFirst<'_> {}

/// Breadth-first walk in level order.
///
/// Level order keeps shallow structure early in the output, which is what
/// a line-budgeted overview wants.
pub struct BreadthFirst<'a> {
    page: &'a Page,
    options: WalkOptions,
    queue: VecDeque<(NodeId, usize)>,
    depth_limited: bool,
    fused: bool,
}

impl<'a> BreadthFirst<'a> {
    pub fn new(page: &'a Page, root: NodeId, options: WalkOptions) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((root, 0));
        Self {
            page,
            options,
            queue,
            depth_limited: false,
            fused: false,
        }
    }

    /// True once the depth bound has pruned at least one subtree.
    pub fn depth_limited(&self) -> bool {
        self.depth_limited
    }
}

impl Iterator for BreadthFirst<'_> {
    type Item = WalkStep;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.fused {
            let (id, depth) = self.queue.pop_front()?;
            let node = match self.page.node(id) {
                Ok(node) => node,
                Err(err) => {
                    self.fused = true;
                    return Some(Err(err));
                }
            };
            if !self.options.include_hidden
                && !inspect::is_visible(self.page, id, self.options.check_ancestors)
            {
                continue;
            }
            if depth < self.options.max_depth {
                for &child in &node.children {
                    self.queue.push_back((child, depth + 1));
                }
            } else if !node.children.is_empty() {
                self.depth_limited = true;
            }
            return Some(Ok((id, depth)));
        }
        None
    }
}

impl std::iter::FusedIterator for BreadthFirst<'_> {}

/// Interactive descendants of a node, bucketed by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCounts {
    pub buttons: usize,
    pub links: usize,
    pub inputs: usize,
    pub other: usize,
}

impl InteractionCounts {
    pub fn total(&self) -> usize {
        self.buttons + self.links + self.inputs + self.other
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Space-separated `kind=n` summary, zero buckets omitted.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.buttons > 0 {
            parts.push(format!("buttons={}", self.buttons));
        }
        if self.links > 0 {
            parts.push(format!("links={}", self.links));
        }
        if self.inputs > 0 {
            parts.push(format!("inputs={}", self.inputs));
        }
        if self.other > 0 {
            parts.push(format!("other={}", self.other));
        }
        parts.join(" ")
    }
}

/// Count visible interactive descendants of `root`, excluding `root`
/// itself. Hidden subtrees are skipped wholesale, matching what a visible
/// traversal would render.
pub fn count_interactive_descendants(page: &Page, root: NodeId) -> InteractionCounts {
    let mut counts = InteractionCounts::default();
    let mut seen = vec![false; page.len()];
    let mut stack: Vec<NodeId> = page.children(root).to_vec();
    while let Some(id) = stack.pop() {
        let Some(node) = page.get(id) else {
            continue;
        };
        if seen[id.index()] {
            continue;
        }
        seen[id.index()] = true;
        if !inspect::is_visible(page, id, false) {
            continue;
        }
        if inspect::is_interactive(node) {
            match inspect::role(node) {
                Some(Role::Button) => counts.buttons += 1,
                Some(Role::Link) => counts.links += 1,
                Some(role) if role.is_input() => counts.inputs += 1,
                _ => counts.other += 1,
            }
        }
        stack.extend(node.children.iter().copied());
    }
    counts
}
