//! Recursive-descent parser from query text to an [`Evaluator`] tree.
//!
//! The grammar is the familiar selector surface: comma-separated complex
//! selectors, each a chain of simple-selector sequences joined by
//! combinators (descendant whitespace, `>`, `+`, `~`). Sub-queries inside
//! `:has`, `:is`, and `:not` re-enter the parser on the balanced
//! parenthesized contents.
//!
//! Parsing either produces a complete evaluator or fails with a
//! [`SelectorError`] naming the offending fragment; no partial tree is
//! ever returned.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::Regex;

use crate::error::SelectorError;
use crate::select::combining::Combining;
use crate::select::evaluator::Evaluator;
use crate::select::queue::{unescape, TokenQueue};

const COMBINATORS: [char; 3] = ['>', '+', '~'];
const ATTRIBUTE_OPS: [&str; 6] = ["!=", "^=", "$=", "*=", "~=", "="];

/// Compiles a query into an evaluator.
///
/// # Errors
///
/// Returns [`SelectorError::EmptyQuery`] for a blank query, or
/// [`SelectorError::Parse`] naming the offending fragment for a malformed
/// one.
pub fn parse(query: &str) -> Result<Evaluator, SelectorError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::EmptyQuery);
    }
    QueryParser::new(trimmed).parse_query()
}

struct QueryParser<'a> {
    query: &'a str,
    tq: TokenQueue<'a>,
}

impl<'a> QueryParser<'a> {
    fn new(query: &'a str) -> Self {
        Self {
            query,
            tq: TokenQueue::new(query),
        }
    }

    fn unexpected(&self) -> SelectorError {
        SelectorError::unexpected(self.query, self.tq.remainder())
    }

    /// selector-group: selector (',' selector)*
    fn parse_query(&mut self) -> Result<Evaluator, SelectorError> {
        let first = self.parse_selector()?;
        if self.tq.is_empty() {
            return Ok(first);
        }
        let mut or = Combining::new(vec![first]);
        while self.tq.match_chomp(",") {
            or.add(self.parse_selector()?);
        }
        if !self.tq.is_empty() {
            return Err(self.unexpected());
        }
        Ok(Evaluator::Or(or))
    }

    /// selector: sequence (combinator sequence)*, stopping at ',' or end.
    ///
    /// A leading combinator anchors the chain at the search root, so
    /// `> p` means "p that is a direct child of the root".
    fn parse_selector(&mut self) -> Result<Evaluator, SelectorError> {
        self.tq.consume_whitespace();
        let mut current = if self.tq.matches_any(&COMBINATORS) {
            Evaluator::Root
        } else {
            self.parse_sequence()?
        };

        loop {
            let seen_white = self.tq.consume_whitespace();
            if self.tq.is_empty() || self.tq.matches_char(',') {
                break;
            }
            if let Some(combinator) = self.tq.chomp_any(&COMBINATORS) {
                self.tq.consume_whitespace();
                let right = self.parse_sequence()?;
                current = Self::combine(current, combinator, right);
            } else if seen_white {
                let right = self.parse_sequence()?;
                current = Self::combine(current, ' ', right);
            } else {
                return Err(self.unexpected());
            }
        }
        Ok(current)
    }

    /// Wraps the left side in the structural evaluator for the combinator
    /// and conjoins it with the right side. Member order is chosen so the
    /// textual rendering reads left to right.
    fn combine(left: Evaluator, combinator: char, right: Evaluator) -> Evaluator {
        let boxed = Box::new(left);
        let wrapper = match combinator {
            '>' => Evaluator::ImmediateParent(boxed),
            '+' => Evaluator::ImmediatePreviousSibling(boxed),
            '~' => Evaluator::PreviousSibling(boxed),
            _ => Evaluator::Ancestor(boxed),
        };
        Evaluator::And(Combining::new(vec![wrapper, right]))
    }

    /// sequence: one or more simple selectors with no space between them
    /// (`div.header[lang=en]`).
    fn parse_sequence(&mut self) -> Result<Evaluator, SelectorError> {
        let mut evals = vec![self.parse_simple()?];
        while !self.tq.is_empty()
            && !self.tq.peek().is_some_and(char::is_whitespace)
            && !self.tq.matches_any(&COMBINATORS)
            && !self.tq.matches_char(',')
        {
            evals.push(self.parse_simple()?);
        }
        if evals.len() == 1 {
            // single-member sequences stay unwrapped
            Ok(evals.remove(0))
        } else {
            Ok(Evaluator::And(Combining::new(evals)))
        }
    }

    fn parse_simple(&mut self) -> Result<Evaluator, SelectorError> {
        if self.tq.match_chomp("#") {
            self.by_id()
        } else if self.tq.match_chomp(".") {
            self.by_class()
        } else if self.tq.matches_char('[') {
            self.by_attribute()
        } else if self.tq.matches("*|") {
            self.by_tag()
        } else if self.tq.match_chomp("*") {
            Ok(Evaluator::AllElements)
        } else if self.tq.match_chomp("::") {
            self.by_node_type()
        } else if self.tq.match_chomp(":") {
            self.by_pseudo()
        } else if self.tq.matches_word() {
            self.by_tag()
        } else {
            Err(self.unexpected())
        }
    }

    fn by_id(&mut self) -> Result<Evaluator, SelectorError> {
        let id = self.tq.consume_css_identifier()?;
        if id.is_empty() {
            return Err(self.unexpected());
        }
        Ok(Evaluator::Id(id))
    }

    fn by_class(&mut self) -> Result<Evaluator, SelectorError> {
        let class = self.tq.consume_css_identifier()?;
        if class.is_empty() {
            return Err(self.unexpected());
        }
        Ok(Evaluator::Class(class))
    }

    /// Tag selectors, including the namespace forms `ns|tag`, `*|tag`,
    /// and `ns|*`. Names are normalized to lowercase `ns:tag`.
    fn by_tag(&mut self) -> Result<Evaluator, SelectorError> {
        let name = self.tq.consume_element_selector()?.to_lowercase();
        if name.is_empty() {
            return Err(self.unexpected());
        }
        if let Some(local) = name.strip_prefix("*|") {
            // any namespace: plain name, or any-prefix form
            return Ok(Evaluator::Or(Combining::new(vec![
                Evaluator::Tag(local.to_string()),
                Evaluator::TagEndsWith(format!(":{local}")),
            ])));
        }
        if let Some(ns) = name.strip_suffix("|*") {
            return Ok(Evaluator::TagStartsWith(format!("{ns}:")));
        }
        Ok(Evaluator::Tag(name.replacen('|', ":", 1)))
    }

    /// Attribute selectors: `[*]`, `[attr]`, `[^prefix]`, and the value
    /// operator forms. Values may be quoted.
    fn by_attribute(&mut self) -> Result<Evaluator, SelectorError> {
        let contents = self.tq.chomp_balanced('[', ']')?;
        let mut cq = TokenQueue::new(&contents);
        let key = cq.consume_to_any(&ATTRIBUTE_OPS).trim().to_string();
        if key.is_empty() {
            return Err(self.unexpected());
        }

        if cq.is_empty() {
            return Ok(if key == "*" {
                Evaluator::HasAnyAttribute
            } else if let Some(prefix) = key.strip_prefix('^') {
                Evaluator::AttributeStarting(prefix.to_lowercase())
            } else {
                Evaluator::Attribute(key)
            });
        }

        for op in ATTRIBUTE_OPS {
            if cq.match_chomp(op) {
                let value = Self::attribute_value(&mut cq);
                return Ok(match op {
                    "!=" => Evaluator::AttributeWithValueNot { key, value },
                    "^=" => Evaluator::AttributeWithValueStarting { key, value },
                    "$=" => Evaluator::AttributeWithValueEnding { key, value },
                    "*=" => Evaluator::AttributeWithValueContaining { key, value },
                    "~=" => Evaluator::AttributeWithValueMatching {
                        key,
                        pattern: Self::compile_regex(&value)?,
                    },
                    _ => Evaluator::AttributeWithValue { key, value },
                });
            }
        }
        Err(self.unexpected())
    }

    /// The value side of an attribute operator, trimmed, with one layer
    /// of matching quotes removed.
    fn attribute_value(cq: &mut TokenQueue) -> String {
        let raw = cq.remainder().trim();
        let stripped = raw
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(raw);
        stripped.to_string()
    }

    fn compile_regex(source: &str) -> Result<Regex, SelectorError> {
        Regex::new(source)
            .map_err(|e| SelectorError::Parse(format!("invalid regex '{source}': {e}")))
    }

    /// `::name` node-type selectors.
    fn by_node_type(&mut self) -> Result<Evaluator, SelectorError> {
        let name = self.tq.consume_css_identifier()?.to_ascii_lowercase();
        match name.as_str() {
            "node" => Ok(Evaluator::MatchAnyNode),
            "leafnode" => Ok(Evaluator::MatchLeafNode),
            "comment" => Ok(Evaluator::MatchComment),
            "text" => Ok(Evaluator::MatchTextNode),
            "data" => Ok(Evaluator::MatchDataNode),
            "cdata" => Ok(Evaluator::MatchCData),
            _ => Err(SelectorError::Parse(format!(
                "unknown node type '::{name}' in '{}'",
                self.query
            ))),
        }
    }

    /// `:name` and `:name(args)` pseudo-classes.
    fn by_pseudo(&mut self) -> Result<Evaluator, SelectorError> {
        let name = self.tq.consume_css_identifier()?.to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.unexpected());
        }
        let args = if self.tq.matches_char('(') {
            Some(self.tq.chomp_balanced('(', ')')?)
        } else {
            None
        };

        match (name.as_str(), args) {
            ("lt", Some(a)) => Ok(Evaluator::IndexLessThan(Self::parse_index(&a)?)),
            ("gt", Some(a)) => Ok(Evaluator::IndexGreaterThan(Self::parse_index(&a)?)),
            ("eq", Some(a)) => Ok(Evaluator::IndexEquals(Self::parse_index(&a)?)),
            ("contains", Some(a)) => Ok(Evaluator::ContainsText(unescape(&a).to_lowercase())),
            ("containsown", Some(a)) => {
                Ok(Evaluator::ContainsOwnText(unescape(&a).to_lowercase()))
            }
            ("containsdata", Some(a)) => {
                Ok(Evaluator::ContainsData(unescape(&a).to_lowercase()))
            }
            ("containswholetext", Some(a)) => {
                Ok(Evaluator::ContainsWholeText(unescape(&a)))
            }
            ("containswholeowntext", Some(a)) => {
                Ok(Evaluator::ContainsWholeOwnText(unescape(&a)))
            }
            ("matches", Some(a)) => Ok(Evaluator::MatchesText(Self::compile_regex(&a)?)),
            ("matchesown", Some(a)) => Ok(Evaluator::MatchesOwnText(Self::compile_regex(&a)?)),
            ("matcheswholetext", Some(a)) => {
                Ok(Evaluator::MatchesWholeText(Self::compile_regex(&a)?))
            }
            ("matcheswholeowntext", Some(a)) => {
                Ok(Evaluator::MatchesWholeOwnText(Self::compile_regex(&a)?))
            }
            ("not", Some(a)) => Ok(Evaluator::Not(Box::new(self.sub_query("not", &a)?))),
            ("is", Some(a)) => Ok(Evaluator::Is(Box::new(self.sub_query("is", &a)?))),
            ("has", Some(a)) => Ok(Evaluator::Has {
                inner: Box::new(self.sub_query("has", &a)?),
                memo: RefCell::new(HashMap::new()),
            }),
            ("nth-child", Some(a)) => Self::nth(&a, false, false),
            ("nth-last-child", Some(a)) => Self::nth(&a, false, true),
            ("nth-of-type", Some(a)) => Self::nth(&a, true, false),
            ("nth-last-of-type", Some(a)) => Self::nth(&a, true, true),
            ("first-child", None) => Ok(Evaluator::IsFirstChild),
            ("last-child", None) => Ok(Evaluator::IsLastChild),
            ("first-of-type", None) => Ok(Evaluator::NthChild {
                a: 0,
                b: 1,
                of_type: true,
                from_last: false,
            }),
            ("last-of-type", None) => Ok(Evaluator::NthChild {
                a: 0,
                b: 1,
                of_type: true,
                from_last: true,
            }),
            ("only-child", None) => Ok(Evaluator::IsOnlyChild),
            ("only-of-type", None) => Ok(Evaluator::IsOnlyOfType),
            ("empty", None) => Ok(Evaluator::IsEmpty),
            ("root", None) => Ok(Evaluator::IsRoot),
            ("blank", None) => Ok(Evaluator::Blank),
            ("matchtext", _) => Err(SelectorError::Parse(
                "':matchText' is not supported; select text nodes with '::text' instead"
                    .to_string(),
            )),
            (
                "lt" | "gt" | "eq" | "contains" | "containsown" | "containsdata"
                | "containswholetext" | "containswholeowntext" | "matches" | "matchesown"
                | "matcheswholetext" | "matcheswholeowntext" | "not" | "is" | "has"
                | "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type",
                None,
            ) => Err(SelectorError::Parse(format!(
                "pseudo-class ':{name}' requires arguments"
            ))),
            _ => Err(SelectorError::Parse(format!(
                "unknown pseudo-class ':{name}' in '{}'",
                self.query
            ))),
        }
    }

    /// Recursively parses a `:has`/`:is`/`:not` argument. A blank argument
    /// is a malformed selector here, not an empty top-level query.
    fn sub_query(&self, name: &str, args: &str) -> Result<Evaluator, SelectorError> {
        match parse(args) {
            Err(SelectorError::EmptyQuery) => Err(SelectorError::Parse(format!(
                "':{name}' requires a selector argument in '{}'",
                self.query
            ))),
            other => other,
        }
    }

    fn parse_index(args: &str) -> Result<usize, SelectorError> {
        args.trim()
            .parse()
            .map_err(|_| SelectorError::Parse(format!("could not parse index '{args}'")))
    }

    /// `an+b` formulas, plus the `odd`/`even` keywords.
    fn nth(args: &str, of_type: bool, from_last: bool) -> Result<Evaluator, SelectorError> {
        let compact: String = args
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let bad = || SelectorError::Parse(format!("could not parse nth-index '{args}'"));

        let (a, b) = match compact.as_str() {
            "odd" => (2, 1),
            "even" => (2, 0),
            other => {
                if let Some(n_at) = other.find('n') {
                    let a = match &other[..n_at] {
                        "" | "+" => 1,
                        "-" => -1,
                        coeff => coeff.parse().map_err(|_| bad())?,
                    };
                    let b = match &other[n_at + 1..] {
                        "" => 0,
                        offset => offset.parse().map_err(|_| bad())?,
                    };
                    (a, b)
                } else {
                    (0, other.parse().map_err(|_| bad())?)
                }
            }
        };
        Ok(Evaluator::NthChild {
            a,
            b,
            of_type,
            from_last,
        })
    }
}
