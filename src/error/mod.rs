//! Error types for selector parsing.
//!
//! There are exactly two failure classes. A malformed query surfaces as
//! [`SelectorError::Parse`] with a message naming the offending fragment.
//! An empty or blank query (an argument error, not a syntax error) surfaces
//! as [`SelectorError::EmptyQuery`] and is checked before parsing begins.
//!
//! Matching has no error path: once a query has compiled, evaluation is a
//! total function over any document tree. In particular, user-supplied
//! regular expressions are compiled at parse time, so an invalid pattern is
//! reported here rather than deferred to match time.

use thiserror::Error;

/// The error type returned when a selector query cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The query is not a valid CSS selector. The message includes the
    /// original query and the fragment where parsing stopped.
    #[error("could not parse query: {0}")]
    Parse(String),

    /// The query string was empty or contained only whitespace.
    #[error("query must not be empty")]
    EmptyQuery,
}

impl SelectorError {
    /// Creates a parse error pointing at the unconsumed remainder of a query.
    pub(crate) fn unexpected(query: &str, remainder: &str) -> Self {
        Self::Parse(format!("'{query}': unexpected token at '{remainder}'"))
    }
}
