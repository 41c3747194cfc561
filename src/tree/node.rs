//! Node type definitions.
//!
//! The `NodeKind` enum represents every node type the selector engine can
//! encounter. Each variant carries its node-type-specific payload; the
//! navigation links (parent, children, siblings) live in `NodeData`.

use super::Attribute;

/// The kind of a document node and its associated data.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document node — there is exactly one per `Document`.
    Document,

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The element's local name, case-preserved as authored.
        name: String,
        /// Namespace prefix (e.g., `"dc"` in `<dc:name>`), if any.
        prefix: Option<String>,
        /// Attributes on this element, in document order.
        attributes: Vec<Attribute>,
    },

    /// A text node containing character data.
    Text {
        /// The text content, whitespace preserved.
        content: String,
    },

    /// A data node: the raw payload of a `script` or `style` element.
    Data {
        /// The data content (not treated as visible text).
        content: String,
    },

    /// A CDATA section, e.g., `<![CDATA[...]]>`.
    CData {
        /// The CDATA content (no escaping applied).
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },

    /// A document type declaration, e.g., `<!DOCTYPE html>`.
    Doctype {
        /// The root element name declared in the DOCTYPE.
        name: String,
    },
}

impl NodeKind {
    /// Returns `true` for element nodes.
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    /// Returns `true` for leaf nodes: every kind that is neither an element
    /// nor the document node (text, data, CDATA, comment, doctype).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Element { .. } | Self::Document)
    }

    /// Returns the single text value carried by a leaf node.
    ///
    /// Elements and the document node have no value and return `None`.
    /// A doctype's value is its declared root element name.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Text { content }
            | Self::Data { content }
            | Self::CData { content }
            | Self::Comment { content } => Some(content),
            Self::Doctype { name } => Some(name),
            Self::Element { .. } | Self::Document => None,
        }
    }
}
