//! Reference registry: short-lived `@ref:N` handles for one snapshot pass.
//!
//! Tokens are how an agent addresses elements it saw in a snapshot, so
//! their lifecycle is strict: the registry is cleared at the start of every
//! pass, tokens are issued in emission order starting at `@ref:0`, and a
//! stale token from a previous pass simply resolves to nothing. The
//! registry is owned by the caller, which makes concurrent snapshots of
//! different pages trivially independent.

use std::collections::HashMap;

use crate::dom::NodeId;

/// Issues and resolves `@ref:N` tokens for a single rendering pass.
#[derive(Debug, Clone, Default)]
pub struct RefRegistry {
    order: Vec<(String, NodeId)>,
    by_token: HashMap<String, NodeId>,
    counter: u32,
}

impl RefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every mapping and reset the counter to zero.
    ///
    /// Called by the snapshot entry point before any token is issued, so
    /// mappings never leak across passes.
    pub fn clear(&mut self) {
        self.order.clear();
        self.by_token.clear();
        self.counter = 0;
    }

    /// Issue the next token for `node` and record the mapping.
    pub fn generate(&mut self, node: NodeId) -> String {
        let token = format!("@ref:{}", self.counter);
        self.counter += 1;
        self.set(token.clone(), node);
        token
    }

    /// Record an explicit token for `node`, replacing any previous mapping
    /// for the same token.
    pub fn set(&mut self, token: String, node: NodeId) {
        if self.by_token.insert(token.clone(), node).is_some() {
            self.order.retain(|(t, _)| *t != token);
        }
        self.order.push((token, node));
    }

    /// Resolve a token. Unknown and cleared tokens yield `None`.
    pub fn get(&self, token: &str) -> Option<NodeId> {
        self.by_token.get(token).copied()
    }

    /// Number of live mappings.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Mappings in issue order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.order.iter().map(|(token, node)| (token.as_str(), *node))
    }
}
