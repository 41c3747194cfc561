//! Arena-based document tree.
//!
//! This module implements the tree representation the selector engine queries:
//! arena allocation with typed indices. All nodes live in a contiguous
//! `Vec<NodeData>` owned by the `Document`, and are referenced by `NodeId` —
//! a newtype over `NonZeroU32`.
//!
//! This design provides O(1) node access, cache-friendly layout, and a
//! natural identity handle: two `NodeId`s are the same node exactly when they
//! are equal, which is what the selector engine's identity-based dedup needs.
//! Structurally identical nodes at different positions never compare equal.
//!
//! Beyond navigation, the `Document` exposes the accessors the evaluators
//! match against: case-insensitive attribute lookup, element-sibling
//! navigation and indices, and the normalized/raw/own text variants.

mod node;

pub use node::NodeKind;

use std::num::NonZeroU32;

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, so `Option<NodeId>` is the same
/// size as `NodeId` (niche optimization). Within one `Document`, a `NodeId`
/// identifies a node; equality of ids is node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
///
/// Each node stores its kind (element, text, comment, etc.) and links to
/// parent, children, and siblings for tree navigation.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node, if any. The document node has no parent.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An attribute on an element.
///
/// Attributes keep their authored name and order; lookup by name is
/// ASCII-case-insensitive (see [`Document::attr`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name as authored.
    pub name: String,
    /// The attribute value.
    pub value: String,
}

/// A document tree.
///
/// The `Document` owns all nodes in an arena and provides tree navigation,
/// the element accessors the selector engine matches against, and a small
/// mutation API for building trees. The selector engine itself only ever
/// takes `&Document`.
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document root node id (the Document node, not the root element).
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a new empty document containing only the document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        // Index 1: the document root node
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root: NodeId::from_index(1),
        }
    }

    /// Returns the document root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root element of the document (the first top-level element).
    ///
    /// Returns `None` if the document has no element children.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| self.node(id).kind.is_element())
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a valid node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    /// Returns a mutable reference to the `NodeData` for the given node.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    // --- Element accessors ---

    /// Returns the local tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the namespace prefix of an element node, if any.
    #[must_use]
    pub fn prefix(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { prefix, .. } => prefix.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if two elements have the same expanded name
    /// (prefix and local name, ASCII-case-insensitive).
    #[must_use]
    pub fn same_tag(&self, a: NodeId, b: NodeId) -> bool {
        match (&self.node(a).kind, &self.node(b).kind) {
            (
                NodeKind::Element { name: an, prefix: ap, .. },
                NodeKind::Element { name: bn, prefix: bp, .. },
            ) => {
                an.eq_ignore_ascii_case(bn)
                    && match (ap, bp) {
                        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => false,
        }
    }

    /// Returns the attributes of an element node, in document order.
    ///
    /// Returns an empty slice for non-element nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute by name on an element node.
    ///
    /// Name lookup is ASCII-case-insensitive; the first match in document
    /// order wins.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Returns `true` if the element has an attribute with the given name
    /// (ASCII-case-insensitive).
    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    // --- Text accessors ---

    /// Returns the single text value of a leaf node (text, data, CDATA,
    /// comment content; a doctype's declared name).
    #[must_use]
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        self.node(id).kind.value()
    }

    /// Returns the normalized text of an element: the concatenated text of
    /// all descendant text nodes, with whitespace runs collapsed to single
    /// spaces and the ends trimmed.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        normalize_whitespace(&self.whole_text(id))
    }

    /// Returns the raw text of an element: the concatenated text of all
    /// descendant text and CDATA nodes, whitespace preserved.
    #[must_use]
    pub fn whole_text(&self, id: NodeId) -> String {
        let mut buf = String::new();
        self.collect_text(id, &mut buf);
        buf
    }

    /// Returns the normalized text held directly by an element, excluding
    /// text inside descendant elements.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> String {
        normalize_whitespace(&self.whole_own_text(id))
    }

    /// Returns the raw text held directly by an element, excluding text
    /// inside descendant elements.
    #[must_use]
    pub fn whole_own_text(&self, id: NodeId) -> String {
        let mut buf = String::new();
        for child in self.children(id) {
            if let NodeKind::Text { content } | NodeKind::CData { content } =
                &self.node(child).kind
            {
                buf.push_str(content);
            }
        }
        buf
    }

    /// Returns the combined data of an element and its descendants: the
    /// payloads of data nodes (script/style), CDATA sections, and comments.
    #[must_use]
    pub fn data(&self, id: NodeId) -> String {
        let mut buf = String::new();
        for desc in self.descendants(id) {
            if let NodeKind::Data { content }
            | NodeKind::CData { content }
            | NodeKind::Comment { content } = &self.node(desc).kind
            {
                buf.push_str(content);
            }
        }
        buf
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text { content } | NodeKind::CData { content } => {
                buf.push_str(content);
            }
            _ => {
                for child in self.children(id) {
                    self.collect_text(child, buf);
                }
            }
        }
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns the next sibling that is an element, skipping leaf nodes.
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut next = self.next_sibling(id);
        while let Some(sib) = next {
            if self.node(sib).kind.is_element() {
                return Some(sib);
            }
            next = self.next_sibling(sib);
        }
        None
    }

    /// Returns the previous sibling that is an element, skipping leaf nodes.
    #[must_use]
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut prev = self.prev_sibling(id);
        while let Some(sib) = prev {
            if self.node(sib).kind.is_element() {
                return Some(sib);
            }
            prev = self.prev_sibling(sib);
        }
        None
    }

    /// Returns this element's 0-based index among its parent's element
    /// children. A node with no parent has index 0.
    #[must_use]
    pub fn element_sibling_index(&self, id: NodeId) -> usize {
        let mut index = 0;
        let mut prev = self.prev_sibling(id);
        while let Some(sib) = prev {
            if self.node(sib).kind.is_element() {
                index += 1;
            }
            prev = self.prev_sibling(sib);
        }
        index
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns an iterator over the element children of a node.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|&child| self.node(child).kind.is_element())
    }

    /// Returns an iterator over a node and its ancestors (walking up to
    /// the document node).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Returns an iterator over all descendants of a node, in preorder.
    /// The node itself is not included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    // --- Mutation ---

    /// Allocates a new node in the arena and returns its `NodeId`.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Creates and appends an element with the given qualified name and
    /// attributes, returning its id. A name containing `:` is split into
    /// prefix and local name.
    pub fn append_element(&mut self, parent: NodeId, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let (prefix, local) = match name.split_once(':') {
            Some((p, l)) => (Some(p.to_string()), l.to_string()),
            None => (None, name.to_string()),
        };
        let attributes = attrs
            .iter()
            .map(|&(k, v)| Attribute {
                name: k.to_string(),
                value: v.to_string(),
            })
            .collect();
        let el = self.create_node(NodeKind::Element {
            name: local,
            prefix,
            attributes,
        });
        self.append_child(parent, el);
        el
    }

    /// Creates and appends a text node, returning its id.
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> NodeId {
        let node = self.create_node(NodeKind::Text {
            content: content.to_string(),
        });
        self.append_child(parent, node);
        node
    }

    /// Appends a child node to the end of a parent's child list.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `child` already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent; detach it first"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Inserts `new_child` before `reference` in the parent's child list.
    ///
    /// # Panics
    ///
    /// Panics if `reference` has no parent, or in debug builds if
    /// `new_child` already has a parent.
    #[allow(clippy::expect_used)]
    pub fn insert_before(&mut self, reference: NodeId, new_child: NodeId) {
        debug_assert!(
            self.node(new_child).parent.is_none(),
            "new_child already has a parent; detach it first"
        );

        let parent = self
            .node(reference)
            .parent
            .expect("reference has no parent");
        self.node_mut(new_child).parent = Some(parent);

        if let Some(prev) = self.node(reference).prev_sibling {
            self.node_mut(prev).next_sibling = Some(new_child);
            self.node_mut(new_child).prev_sibling = Some(prev);
        } else {
            self.node_mut(parent).first_child = Some(new_child);
        }

        self.node_mut(new_child).next_sibling = Some(reference);
        self.node_mut(reference).prev_sibling = Some(new_child);
    }

    /// Detaches a node from its parent. The node stays allocated in the
    /// arena but becomes unreachable from the tree.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        self.node_mut(id).parent = None;
        self.node_mut(id).prev_sibling = None;
        self.node_mut(id).next_sibling = None;
    }

    /// Returns the total number of nodes in the arena (excluding the
    /// placeholder slot).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
#[must_use]
pub(crate) fn normalize_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_ws = false;
    for c in input.chars() {
        if c.is_whitespace() {
            in_ws = true;
        } else {
            if in_ws && !out.is_empty() {
                out.push(' ');
            }
            in_ws = false;
            out.push(c);
        }
    }
    out
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).parent;
        Some(current)
    }
}

/// Preorder iterator over all descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // Deeper first
        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        // Then across
        if let Some(sibling) = self.doc.next_sibling(current) {
            self.next = Some(sibling);
            return Some(current);
        }

        // Then up, stopping at the subtree root
        let mut ancestor = self.doc.parent(current);
        while let Some(anc) = ancestor {
            if anc == self.root {
                self.next = None;
                return Some(current);
            }
            if let Some(sibling) = self.doc.next_sibling(anc) {
                self.next = Some(sibling);
                return Some(current);
            }
            ancestor = self.doc.parent(anc);
        }

        self.next = None;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_node(doc: &mut Document, parent: NodeId, content: &str) -> NodeId {
        doc.append_text(parent, content)
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert!(matches!(doc.node(doc.root()).kind, NodeKind::Document));
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_append_element_and_navigate() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.append_element(root, "div", &[("class", "x")]);

        assert_eq!(doc.first_child(root), Some(div));
        assert_eq!(doc.parent(div), Some(root));
        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.attr(div, "class"), Some("x"));
    }

    #[test]
    fn test_attr_lookup_is_case_insensitive() {
        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.append_element(root, "img", &[("SRC", "a.png")]);

        assert_eq!(doc.attr(el, "src"), Some("a.png"));
        assert_eq!(doc.attr(el, "Src"), Some("a.png"));
        assert!(doc.has_attr(el, "sRc"));
        assert!(!doc.has_attr(el, "href"));
    }

    #[test]
    fn test_namespaced_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.append_element(root, "dc:name", &[]);

        assert_eq!(doc.tag_name(el), Some("name"));
        assert_eq!(doc.prefix(el), Some("dc"));
    }

    #[test]
    fn test_same_tag() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append_element(root, "P", &[]);
        let b = doc.append_element(root, "p", &[]);
        let c = doc.append_element(root, "dc:p", &[]);

        assert!(doc.same_tag(a, b));
        assert!(!doc.same_tag(a, c));
    }

    #[test]
    fn test_children_iterator() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = text_node(&mut doc, root, "A");
        let b = text_node(&mut doc, root, "B");
        let c = text_node(&mut doc, root, "C");

        let children: Vec<NodeId> = doc.children(root).collect();
        assert_eq!(children, vec![a, b, c]);
    }

    #[test]
    fn test_element_siblings_skip_leaves() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p", &[]);
        text_node(&mut doc, root, " ");
        let q = doc.append_element(root, "q", &[]);
        text_node(&mut doc, root, " ");
        let r = doc.append_element(root, "r", &[]);

        assert_eq!(doc.next_element_sibling(p), Some(q));
        assert_eq!(doc.next_element_sibling(q), Some(r));
        assert_eq!(doc.next_element_sibling(r), None);
        assert_eq!(doc.prev_element_sibling(r), Some(q));
        assert_eq!(doc.prev_element_sibling(p), None);
        assert_eq!(doc.element_sibling_index(p), 0);
        assert_eq!(doc.element_sibling_index(q), 1);
        assert_eq!(doc.element_sibling_index(r), 2);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p", &[]);
        let a = text_node(&mut doc, p, "hello ");
        let b = doc.append_element(p, "b", &[]);
        let b_text = text_node(&mut doc, b, "world");

        let desc: Vec<NodeId> = doc.descendants(root).collect();
        assert_eq!(desc, vec![p, a, b, b_text]);
    }

    #[test]
    fn test_ancestors() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, "outer", &[]);
        let inner = doc.append_element(outer, "inner", &[]);

        let ancestors: Vec<NodeId> = doc.ancestors(inner).collect();
        assert_eq!(ancestors, vec![inner, outer, root]);
    }

    #[test]
    fn test_text_is_normalized() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p", &[]);
        text_node(&mut doc, p, "  hello \n");
        let b = doc.append_element(p, "b", &[]);
        text_node(&mut doc, b, "  big\tworld ");

        assert_eq!(doc.text(p), "hello big world");
        assert_eq!(doc.whole_text(p), "  hello \n  big\tworld ");
    }

    #[test]
    fn test_own_text_excludes_descendants() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p", &[]);
        text_node(&mut doc, p, "own ");
        let b = doc.append_element(p, "b", &[]);
        text_node(&mut doc, b, "nested");
        text_node(&mut doc, p, " more");

        assert_eq!(doc.own_text(p), "own more");
        assert_eq!(doc.whole_own_text(p), "own  more");
        assert_eq!(doc.text(p), "own nested more");
    }

    #[test]
    fn test_data_collects_script_and_comments() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.append_element(root, "div", &[]);
        let script = doc.append_element(div, "script", &[]);
        let payload = doc.create_node(NodeKind::Data {
            content: "var x = 1;".to_string(),
        });
        doc.append_child(script, payload);
        let comment = doc.create_node(NodeKind::Comment {
            content: " note ".to_string(),
        });
        doc.append_child(div, comment);

        assert_eq!(doc.data(div), "var x = 1; note ");
        assert_eq!(doc.text(div), "");
    }

    #[test]
    fn test_insert_before_and_detach() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = text_node(&mut doc, root, "A");
        let c = text_node(&mut doc, root, "C");
        let b = doc.create_node(NodeKind::Text {
            content: "B".to_string(),
        });
        doc.insert_before(c, b);

        let children: Vec<NodeId> = doc.children(root).collect();
        assert_eq!(children, vec![a, b, c]);

        doc.detach(b);
        let children: Vec<NodeId> = doc.children(root).collect();
        assert_eq!(children, vec![a, c]);
        assert_eq!(doc.parent(b), None);
        assert_eq!(doc.next_sibling(a), Some(c));
    }

    #[test]
    fn test_root_element() {
        let mut doc = Document::new();
        let root = doc.root();
        assert_eq!(doc.root_element(), None);

        text_node(&mut doc, root, " ");
        let html = doc.append_element(root, "html", &[]);
        assert_eq!(doc.root_element(), Some(html));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a  b \n c  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \t\n "), "");
        assert_eq!(normalize_whitespace("one"), "one");
    }

    #[test]
    fn test_node_value() {
        let mut doc = Document::new();
        let text = doc.create_node(NodeKind::Text {
            content: "hello".to_string(),
        });
        let comment = doc.create_node(NodeKind::Comment {
            content: "a comment".to_string(),
        });
        let el = doc.create_node(NodeKind::Element {
            name: "div".to_string(),
            prefix: None,
            attributes: vec![],
        });

        assert_eq!(doc.node_value(text), Some("hello"));
        assert_eq!(doc.node_value(comment), Some("a comment"));
        assert_eq!(doc.node_value(el), None);
    }
}
