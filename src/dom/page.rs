//! Page arena: the materialized capture the whole engine reads from.

use serde::{Deserialize, Serialize};

use crate::error::NodeAccessError;

use super::inspect;
use super::node::{BoundingBox, NodeId, PageInfo, PageNode};
use super::text::collapse_whitespace;

/// A materialized page capture: a node arena plus page-level facts.
///
/// Hosts build one `Page` per capture, from CDP output, from serialized
/// JSON, or through [`PageBuilder`] in tests. The engine only ever reads
/// it; re-snapshotting after a mutation means building a new capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page-level facts.
    #[serde(default)]
    pub info: PageInfo,
    root: NodeId,
    nodes: Vec<PageNode>,
}

impl Page {
    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the capture.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a capture with no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a node id.
    ///
    /// `Err(OutOfRange)` means the capture is corrupt; callers inside a
    /// rendering pass treat that as a pass-level fault and keep whatever
    /// partial output they already have.
    pub fn node(&self, id: NodeId) -> Result<&PageNode, NodeAccessError> {
        self.nodes
            .get(id.index())
            .ok_or(NodeAccessError::OutOfRange(id))
    }

    /// Resolve a node id, `None` for ids outside the arena.
    pub fn get(&self, id: NodeId) -> Option<&PageNode> {
        self.nodes.get(id.index())
    }

    /// Mutable access to a node, for hosts patching a capture in place.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut PageNode> {
        self.nodes.get_mut(id.index())
    }

    /// Child ids of a node, empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent id of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Bounding box for a node.
    ///
    /// Detached nodes and nodes without geometry fail individually; callers
    /// degrade at the call site instead of aborting the pass.
    pub fn bounding_box(&self, id: NodeId) -> Result<BoundingBox, NodeAccessError> {
        let node = self.node(id)?;
        if !node.connected {
            return Err(NodeAccessError::Detached(id));
        }
        node.bounds.ok_or(NodeAccessError::MissingGeometry(id))
    }

    /// Whitespace-collapsed text of a subtree, skipping hidden descendants.
    ///
    /// The seen-guard makes this loop-safe even for corrupt captures whose
    /// child lists alias each other.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            if seen[current.index()] {
                continue;
            }
            seen[current.index()] = true;
            if current != id && inspect::node_hidden(node) {
                continue;
            }
            if let Some(text) = node.text.as_deref() {
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        collapse_whitespace(&parts.join(" "))
    }

    /// Raw concatenated text of a subtree, preserving whitespace.
    ///
    /// Used for code blocks, where collapsing would destroy indentation.
    pub fn raw_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            if seen[current.index()] {
                continue;
            }
            seen[current.index()] = true;
            if let Some(text) = node.text.as_deref() {
                out.push_str(text);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// First node whose `id` attribute equals `value`, in document order.
    pub fn find_by_attr_id(&self, value: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attributes.id.as_deref() == Some(value))
            .map(|i| NodeId(i as u32))
    }

    /// First `<label for="...">` pointing at the given element id.
    pub(crate) fn find_label_for(&self, target_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.tag == "label" && n.attributes.r#for.as_deref() == Some(target_id))
            .map(|i| NodeId(i as u32))
    }

    /// Smallest visible node whose box contains the point, if any.
    ///
    /// Mirrors hit-testing: overlapping boxes resolve to the one with the
    /// least area, which is usually the innermost element.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(bounds) = node.bounds else {
                continue;
            };
            if !node.connected || !bounds.contains(x, y) {
                continue;
            }
            let id = NodeId(index as u32);
            if !inspect::is_visible(self, id, true) {
                continue;
            }
            let area = bounds.area();
            match best {
                Some((_, best_area)) if best_area <= area => {}
                _ => best = Some((id, area)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Parse a serialized capture.
    ///
    /// No structural validation happens here; a corrupt capture surfaces
    /// later as `NodeAccessError::OutOfRange` during traversal.
    pub fn from_json(json: &str) -> Result<Page, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize this capture.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Incremental capture builder, mainly for tests and fixtures.
///
/// Nodes are appended depth-last; parent and child links stay consistent by
/// construction, so built pages never produce `OutOfRange` faults.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    info: PageInfo,
    nodes: Vec<PageNode>,
}

impl PageBuilder {
    /// Start a capture with a root element of the given tag.
    pub fn new(root_tag: &str) -> Self {
        Self {
            info: PageInfo::default(),
            nodes: vec![PageNode::new(root_tag)],
        }
    }

    /// Root node id, always `#0`.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Replace the page-level facts.
    pub fn info(&mut self, info: PageInfo) -> &mut Self {
        self.info = info;
        self
    }

    /// Append a child element under `parent`, returning its id.
    pub fn child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = PageNode::new(tag);
        node.parent = Some(parent);
        self.nodes.push(node);
        if let Some(parent_node) = self.nodes.get_mut(parent.index()) {
            parent_node.children.push(id);
        }
        id
    }

    /// Append a child element that carries direct text.
    pub fn text_child(&mut self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let id = self.child(parent, tag);
        self.set_text(id, text);
        id
    }

    /// Set a node's direct text.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.text = Some(text.to_string());
        }
        self
    }

    /// Set an attribute by document name.
    pub fn attr(&mut self, id: NodeId, name: &str, value: &str) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.attributes.set(name, value);
        }
        self
    }

    /// Set a node's bounding box.
    pub fn bounds(&mut self, id: NodeId, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.bounds = Some(BoundingBox::new(x, y, width, height));
        }
        self
    }

    /// Set a computed style property (`display`, `visibility`, `opacity`
    /// or `cursor`).
    pub fn style(&mut self, id: NodeId, property: &str, value: &str) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            match property {
                "display" => node.style.display = Some(value.to_string()),
                "visibility" => node.style.visibility = Some(value.to_string()),
                "opacity" => node.style.opacity = Some(value.to_string()),
                "cursor" => node.style.cursor = Some(value.to_string()),
                _ => {}
            }
        }
        self
    }

    /// Mark a node as no longer connected to the document.
    pub fn detach(&mut self, id: NodeId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.connected = false;
        }
        self
    }

    /// Direct mutable access for cases the helpers do not cover.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut PageNode> {
        self.nodes.get_mut(id.index())
    }

    /// Finish the capture.
    pub fn build(self) -> Page {
        Page {
            info: self.info,
            root: NodeId(0),
            nodes: self.nodes,
        }
    }
}
