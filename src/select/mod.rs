//! Selector queries over a [`Document`].
//!
//! The entry points here pair the parser with the collector: a query
//! string is compiled once into an [`Evaluator`] and applied to a tree in
//! a single preorder pass. Compile a query yourself with [`evaluator_of`]
//! when running it against many documents.
//!
//! ```
//! use selectoxide::select;
//! use selectoxide::tree::Document;
//!
//! let mut doc = Document::new();
//! let list = doc.append_element(doc.root(), "list", &[]);
//! doc.append_element(list, "item", &[("id", "a")]);
//! doc.append_element(list, "item", &[("id", "b")]);
//!
//! let items = select::select(&doc, "list > item").unwrap();
//! assert_eq!(items.len(), 2);
//! assert_eq!(doc.attr(items[0], "id"), Some("a"));
//! ```

pub mod collector;
pub mod combining;
pub mod evaluator;
pub mod parser;
pub mod queue;

pub use collector::{filter_out, Matches};
pub use evaluator::Evaluator;
pub use queue::{escape_css_identifier, unescape_css_identifier};

use crate::error::SelectorError;
use crate::tree::{Document, NodeId};

/// Compiles a query into a reusable [`Evaluator`].
///
/// # Errors
///
/// Returns [`SelectorError::EmptyQuery`] for a blank query, or
/// [`SelectorError::Parse`] for a malformed one.
pub fn evaluator_of(query: &str) -> Result<Evaluator, SelectorError> {
    parser::parse(query)
}

/// Selects all nodes in the document matching the query, in document
/// order.
///
/// # Errors
///
/// Returns a [`SelectorError`] if the query does not parse.
pub fn select(doc: &Document, query: &str) -> Result<Vec<NodeId>, SelectorError> {
    let eval = parser::parse(query)?;
    Ok(collector::collect(doc, &eval, doc.root()))
}

/// Selects all nodes matching a pre-compiled evaluator.
///
/// The evaluator's transient state is reset before the traversal, so the
/// same evaluator can be reused across calls and documents.
#[must_use]
pub fn select_with(doc: &Document, eval: &Evaluator) -> Vec<NodeId> {
    collector::collect(doc, eval, doc.root())
}

/// Selects matching nodes within the subtrees at `roots`, in root order
/// then document order, deduplicated by node identity when the roots
/// overlap.
///
/// # Errors
///
/// Returns a [`SelectorError`] if the query does not parse.
pub fn select_in(
    doc: &Document,
    query: &str,
    roots: &[NodeId],
) -> Result<Vec<NodeId>, SelectorError> {
    let eval = parser::parse(query)?;
    Ok(collector::collect_multi(doc, &eval, roots))
}

/// Returns the first matching node in document order, stopping the
/// traversal as soon as it is found.
///
/// # Errors
///
/// Returns a [`SelectorError`] if the query does not parse.
pub fn select_first(doc: &Document, query: &str) -> Result<Option<NodeId>, SelectorError> {
    let eval = parser::parse(query)?;
    Ok(collector::find_first(doc, &eval, doc.root()))
}

/// Returns the first node under `root` (inclusive) matching a
/// pre-compiled evaluator.
#[must_use]
pub fn select_first_with(doc: &Document, eval: &Evaluator, root: NodeId) -> Option<NodeId> {
    collector::find_first(doc, eval, root)
}

/// Returns a lazy iterator over the nodes under `root` (inclusive)
/// matching the evaluator. Traversal work is done on demand, one match at
/// a time.
#[must_use]
pub fn stream<'a>(doc: &'a Document, eval: &'a Evaluator, root: NodeId) -> Matches<'a> {
    collector::stream(doc, eval, root)
}
