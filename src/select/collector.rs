//! Applies a compiled evaluator to a tree and gathers the matches.
//!
//! Traversal is depth-first preorder over the subtree rooted at the search
//! root, with the root itself eligible. Elements are always tested; leaf
//! nodes are tested only when the evaluator wants them. The lazy
//! [`Matches`] iterator backs all three modes: full collection, first
//! match, and streaming.

use std::collections::HashSet;

use crate::select::evaluator::Evaluator;
use crate::tree::{Document, NodeId, NodeKind};

/// Lazy preorder iterator over the nodes matching an evaluator.
///
/// Holds no per-item allocation; each `next` walks the tree from the
/// previous position. A fresh iterator re-traverses from the root.
pub struct Matches<'a> {
    doc: &'a Document,
    eval: &'a Evaluator,
    root: NodeId,
    /// Next node to visit, or `None` when the walk is done.
    cursor: Option<NodeId>,
    wants_nodes: bool,
}

impl<'a> Matches<'a> {
    /// Starts a walk of the subtree at `root`. The evaluator's transient
    /// state must have been reset by the caller.
    pub(crate) fn new(doc: &'a Document, eval: &'a Evaluator, root: NodeId) -> Self {
        Self {
            doc,
            eval,
            root,
            cursor: Some(root),
            wants_nodes: eval.wants_nodes(),
        }
    }

    /// Preorder successor within the rooted subtree: first child, else the
    /// next sibling of the nearest ancestor still inside the subtree.
    fn advance(&self, node: NodeId) -> Option<NodeId> {
        if let Some(child) = self.doc.first_child(node) {
            return Some(child);
        }
        let mut cur = node;
        while cur != self.root {
            if let Some(sib) = self.doc.next_sibling(cur) {
                return Some(sib);
            }
            cur = self.doc.parent(cur)?;
        }
        None
    }

    /// Whether a visited node should be tested at all.
    fn eligible(&self, node: NodeId) -> bool {
        match &self.doc.node(node).kind {
            NodeKind::Document => false,
            NodeKind::Element { .. } => true,
            _ => self.wants_nodes,
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(node) = self.cursor {
            self.cursor = self.advance(node);
            if self.eligible(node) && self.eval.matches_node(self.doc, self.root, node) {
                return Some(node);
            }
        }
        None
    }
}

/// Collects all nodes under `root` (inclusive) matching the evaluator, in
/// preorder.
#[must_use]
pub fn collect(doc: &Document, eval: &Evaluator, root: NodeId) -> Vec<NodeId> {
    eval.reset();
    Matches::new(doc, eval, root).collect()
}

/// Returns the first matching node under `root` (inclusive) in preorder,
/// short-circuiting the traversal.
#[must_use]
pub fn find_first(doc: &Document, eval: &Evaluator, root: NodeId) -> Option<NodeId> {
    eval.reset();
    Matches::new(doc, eval, root).next()
}

/// Returns a lazy iterator over matches under `root` (inclusive).
#[must_use]
pub fn stream<'a>(doc: &'a Document, eval: &'a Evaluator, root: NodeId) -> Matches<'a> {
    eval.reset();
    Matches::new(doc, eval, root)
}

/// Collects matches under each root in turn, deduplicating by node
/// identity: a node reached from several roots (nested roots overlap) is
/// kept at its first encounter only.
#[must_use]
pub fn collect_multi(doc: &Document, eval: &Evaluator, roots: &[NodeId]) -> Vec<NodeId> {
    eval.reset();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &root in roots {
        for node in Matches::new(doc, eval, root) {
            if seen.insert(node) {
                out.push(node);
            }
        }
    }
    out
}

/// Returns the nodes of `keep` that are not in `omit`, preserving order.
/// Comparison is by node identity.
#[must_use]
pub fn filter_out(keep: &[NodeId], omit: &[NodeId]) -> Vec<NodeId> {
    let omitted: HashSet<NodeId> = omit.iter().copied().collect();
    keep.iter()
        .copied()
        .filter(|n| !omitted.contains(n))
        .collect()
}
