//! # selectoxide
//!
//! A CSS-style selector engine over an in-memory document tree. Queries
//! compile once into an evaluator tree with cost-ordered conjunctions,
//! then run as a single preorder traversal producing matches in document
//! order.
//!
//! ## Quick Start
//!
//! ```
//! use selectoxide::{select, Document};
//!
//! let mut doc = Document::new();
//! let div = doc.append_element(doc.root(), "div", &[("class", "header")]);
//! doc.append_element(div, "p", &[]);
//! doc.append_element(div, "p", &[("class", "note")]);
//!
//! let notes = select::select(&doc, "div.header > p.note").unwrap();
//! assert_eq!(notes.len(), 1);
//! ```
//!
//! Beyond the standard selector surface, node-type pseudo-elements
//! (`::comment`, `::text`, `::data`, `::cdata`) select non-element nodes,
//! and the text pseudo-classes apply to a selected node's own value:
//!
//! ```
//! use selectoxide::{select, tree::NodeKind, Document};
//!
//! let mut doc = Document::new();
//! let root = doc.append_element(doc.root(), "config", &[]);
//! let note = doc.create_node(NodeKind::Comment { content: " FIXME ".into() });
//! doc.append_child(root, note);
//!
//! let hits = select::select(&doc, "::comment:contains(fixme)").unwrap();
//! assert_eq!(hits, vec![note]);
//! ```

pub mod error;
pub mod select;
pub mod tree;

// Re-export primary types at the crate root for convenience.
pub use error::SelectorError;
pub use select::{escape_css_identifier, unescape_css_identifier, Evaluator};
pub use tree::{Attribute, Document, NodeId};
