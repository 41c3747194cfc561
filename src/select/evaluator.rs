//! Compiled selector predicates.
//!
//! A parsed query compiles to a tree of `Evaluator`s. Leaf variants test
//! one fact about a candidate node (its tag, an attribute, its position
//! among siblings, its text). Structural variants wrap an inner evaluator
//! and relocate the test onto an ancestor or preceding sibling, which is
//! how combinators are expressed: `div > p` compiles to
//! `And(Tag(p), ImmediateParent(Tag(div)))`. `And`/`Or` compose members
//! through [`Combining`], which evaluates cheapest-first.
//!
//! Evaluators are immutable once built, except for the `:has` memo, which
//! caches sub-tree search results during one traversal and is cleared by
//! [`Evaluator::reset`] before the next.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::select::combining::Combining;
use crate::tree::{normalize_whitespace, Document, NodeId, NodeKind};

/// A compiled selector predicate.
#[derive(Debug)]
pub enum Evaluator {
    /// `*`: any element.
    AllElements,
    /// `tag` or `ns|tag`: expanded name match, stored as `ns:tag`.
    Tag(String),
    /// `ns|*`: expanded name starts with `ns:`.
    TagStartsWith(String),
    /// `*|tag` (namespace-agnostic half): expanded name ends with `:tag`.
    TagEndsWith(String),
    /// `#id`.
    Id(String),
    /// `.class`: class list membership.
    Class(String),
    /// `[*]`: the element has at least one attribute.
    HasAnyAttribute,
    /// `[attr]`: attribute presence.
    Attribute(String),
    /// `[^prefix]`: any attribute whose name starts with the prefix.
    AttributeStarting(String),
    /// `[attr=value]`.
    AttributeWithValue { key: String, value: String },
    /// `[attr!=value]`: value differs, or the attribute is absent.
    AttributeWithValueNot { key: String, value: String },
    /// `[attr^=prefix]`.
    AttributeWithValueStarting { key: String, value: String },
    /// `[attr$=suffix]`.
    AttributeWithValueEnding { key: String, value: String },
    /// `[attr*=substring]`.
    AttributeWithValueContaining { key: String, value: String },
    /// `[attr~=regex]`.
    AttributeWithValueMatching { key: String, pattern: Regex },
    /// `:lt(n)`: 0-based element sibling index below `n`.
    IndexLessThan(usize),
    /// `:gt(n)`.
    IndexGreaterThan(usize),
    /// `:eq(n)`.
    IndexEquals(usize),
    /// `:root`: the root element of the searched tree.
    IsRoot,
    /// `:first-child`.
    IsFirstChild,
    /// `:last-child`.
    IsLastChild,
    /// `:only-child`.
    IsOnlyChild,
    /// `:only-of-type`.
    IsOnlyOfType,
    /// `:empty`: no child nodes other than blank text, comments, and
    /// declarations.
    IsEmpty,
    /// The `:nth-*` family, including `:first-of-type`/`:last-of-type`
    /// (which are `an+b` with `a = 0, b = 1`).
    NthChild {
        a: i32,
        b: i32,
        of_type: bool,
        from_last: bool,
    },
    /// `:contains(text)`: normalized, case-insensitive. The needle is
    /// stored lowercased.
    ContainsText(String),
    /// `:containsOwn(text)`.
    ContainsOwnText(String),
    /// `:containsData(data)`.
    ContainsData(String),
    /// `:containsWholeText(text)`: raw, case-sensitive.
    ContainsWholeText(String),
    /// `:containsWholeOwnText(text)`.
    ContainsWholeOwnText(String),
    /// `:matches(regex)` against normalized text.
    MatchesText(Regex),
    /// `:matchesOwn(regex)`.
    MatchesOwnText(Regex),
    /// `:matchesWholeText(regex)` against raw text.
    MatchesWholeText(Regex),
    /// `:matchesWholeOwnText(regex)`.
    MatchesWholeOwnText(Regex),
    /// `:blank`: empty or whitespace-only own value.
    Blank,
    /// `::node`: any node, element or leaf.
    MatchAnyNode,
    /// `::leafnode`: any non-element node.
    MatchLeafNode,
    /// `::comment`.
    MatchComment,
    /// `::text`: text nodes, including CDATA sections.
    MatchTextNode,
    /// `::data`: data (script/style content) nodes.
    MatchDataNode,
    /// `::cdata`.
    MatchCData,
    /// Descendant combinator: some ancestor matches the inner evaluator.
    Ancestor(Box<Evaluator>),
    /// Child combinator (`>`): the parent matches the inner evaluator.
    ImmediateParent(Box<Evaluator>),
    /// Sibling combinator (`~`): some preceding element sibling matches.
    PreviousSibling(Box<Evaluator>),
    /// Adjacent combinator (`+`): the immediately preceding element
    /// sibling matches.
    ImmediatePreviousSibling(Box<Evaluator>),
    /// Anchor for queries with a leading combinator (`> p`): matches the
    /// node the search was rooted at.
    Root,
    /// `:has(selector)`, with a per-traversal memo of sub-tree search
    /// results.
    Has {
        inner: Box<Evaluator>,
        memo: RefCell<HashMap<NodeId, bool>>,
    },
    /// `:is(selector-list)`.
    Is(Box<Evaluator>),
    /// `:not(selector)`.
    Not(Box<Evaluator>),
    /// Conjunction of a selector sequence.
    And(Combining),
    /// Disjunction of comma-separated selectors.
    Or(Combining),
}

impl Evaluator {
    /// Tests the candidate node against this evaluator, with `root` as the
    /// node the search was rooted at.
    ///
    /// Elements are tested with element semantics, leaf nodes with their
    /// own-value semantics; the document node matches nothing except the
    /// root anchor.
    pub fn matches_node(&self, doc: &Document, root: NodeId, node: NodeId) -> bool {
        match self {
            Self::Root => node == root,
            Self::And(c) => c.all_match(doc, root, node),
            Self::Or(c) => c.any_match(doc, root, node),
            Self::Is(inner) => inner.matches_node(doc, root, node),
            Self::Not(inner) => !inner.matches_node(doc, root, node),
            Self::Ancestor(inner) => {
                let mut cur = doc.parent(node);
                while let Some(p) = cur {
                    if inner.matches_node(doc, root, p) {
                        return true;
                    }
                    if p == root {
                        break;
                    }
                    cur = doc.parent(p);
                }
                false
            }
            Self::ImmediateParent(inner) => doc
                .parent(node)
                .is_some_and(|p| inner.matches_node(doc, root, p)),
            Self::PreviousSibling(inner) => {
                let mut cur = doc.prev_element_sibling(node);
                while let Some(s) = cur {
                    if inner.matches_node(doc, root, s) {
                        return true;
                    }
                    cur = doc.prev_element_sibling(s);
                }
                false
            }
            Self::ImmediatePreviousSibling(inner) => doc
                .prev_element_sibling(node)
                .is_some_and(|s| inner.matches_node(doc, root, s)),
            _ => match &doc.node(node).kind {
                NodeKind::Document => false,
                NodeKind::Element { .. } => self.matches_element(doc, root, node),
                _ => self.matches_leaf(doc, node),
            },
        }
    }

    /// Element-semantics match for non-structural variants.
    fn matches_element(&self, doc: &Document, root: NodeId, el: NodeId) -> bool {
        match self {
            Self::AllElements | Self::MatchAnyNode => true,
            Self::Tag(name) => expanded_name(doc, el).eq_ignore_ascii_case(name),
            Self::TagStartsWith(prefix) => {
                let expanded = expanded_name(doc, el);
                expanded.len() >= prefix.len()
                    && expanded[..prefix.len()].eq_ignore_ascii_case(prefix)
            }
            Self::TagEndsWith(suffix) => {
                let expanded = expanded_name(doc, el);
                expanded.len() >= suffix.len()
                    && expanded[expanded.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
            }
            Self::Id(id) => doc
                .attr(el, "id")
                .is_some_and(|v| v.eq_ignore_ascii_case(id)),
            Self::Class(class) => doc
                .attr(el, "class")
                .is_some_and(|v| v.split_whitespace().any(|c| c.eq_ignore_ascii_case(class))),
            Self::HasAnyAttribute => !doc.attributes(el).is_empty(),
            Self::Attribute(key) => doc.has_attr(el, key),
            Self::AttributeStarting(prefix) => doc
                .attributes(el)
                .iter()
                .any(|a| a.name.to_ascii_lowercase().starts_with(prefix)),
            Self::AttributeWithValue { key, value } => {
                doc.attr(el, key).is_some_and(|v| v.trim() == value)
            }
            Self::AttributeWithValueNot { key, value } => {
                doc.attr(el, key).unwrap_or("") != value
            }
            Self::AttributeWithValueStarting { key, value } => {
                doc.attr(el, key).is_some_and(|v| v.starts_with(value))
            }
            Self::AttributeWithValueEnding { key, value } => {
                doc.attr(el, key).is_some_and(|v| v.ends_with(value))
            }
            Self::AttributeWithValueContaining { key, value } => {
                doc.attr(el, key).is_some_and(|v| v.contains(value))
            }
            Self::AttributeWithValueMatching { key, pattern } => {
                doc.attr(el, key).is_some_and(|v| pattern.is_match(v))
            }
            Self::IndexLessThan(index) => doc.element_sibling_index(el) < *index,
            Self::IndexGreaterThan(index) => doc.element_sibling_index(el) > *index,
            Self::IndexEquals(index) => doc.element_sibling_index(el) == *index,
            Self::IsRoot => {
                let anchor = if matches!(doc.node(root).kind, NodeKind::Document) {
                    doc.root_element()
                } else {
                    Some(root)
                };
                anchor == Some(el)
            }
            Self::IsFirstChild => {
                element_parent(doc, el).is_some() && doc.prev_element_sibling(el).is_none()
            }
            Self::IsLastChild => {
                element_parent(doc, el).is_some() && doc.next_element_sibling(el).is_none()
            }
            Self::IsOnlyChild => {
                element_parent(doc, el).is_some()
                    && doc.prev_element_sibling(el).is_none()
                    && doc.next_element_sibling(el).is_none()
            }
            Self::IsOnlyOfType => {
                element_parent(doc, el).is_some()
                    && !sibling_walk(doc, el, false).any(|s| doc.same_tag(s, el))
                    && !sibling_walk(doc, el, true).any(|s| doc.same_tag(s, el))
            }
            Self::IsEmpty => doc.children(el).all(|child| match &doc.node(child).kind {
                NodeKind::Text { content } => content.trim().is_empty(),
                NodeKind::Comment { .. } | NodeKind::Doctype { .. } => true,
                _ => false,
            }),
            Self::NthChild {
                a,
                b,
                of_type,
                from_last,
            } => {
                if element_parent(doc, el).is_none() {
                    return false;
                }
                // widened so extreme authored constants can't overflow
                let pos = i64::from(nth_position(doc, el, *of_type, *from_last));
                let (a, b) = (i64::from(*a), i64::from(*b));
                if a == 0 {
                    pos == b
                } else {
                    (pos - b) * a >= 0 && (pos - b) % a == 0
                }
            }
            Self::ContainsText(needle) => doc.text(el).to_lowercase().contains(needle),
            Self::ContainsOwnText(needle) => doc.own_text(el).to_lowercase().contains(needle),
            Self::ContainsData(needle) => doc.data(el).to_lowercase().contains(needle),
            Self::ContainsWholeText(needle) => doc.whole_text(el).contains(needle),
            Self::ContainsWholeOwnText(needle) => doc.whole_own_text(el).contains(needle),
            Self::MatchesText(pattern) => pattern.is_match(&doc.text(el)),
            Self::MatchesOwnText(pattern) => pattern.is_match(&doc.own_text(el)),
            Self::MatchesWholeText(pattern) => pattern.is_match(&doc.whole_text(el)),
            Self::MatchesWholeOwnText(pattern) => pattern.is_match(&doc.whole_own_text(el)),
            Self::Blank => doc.text(el).is_empty(),
            Self::Has { inner, memo } => {
                if let Some(&hit) = memo.borrow().get(&el) {
                    return hit;
                }
                // sub-search rooted at the candidate, so a leading `>`
                // in the sub-query anchors to the candidate itself
                let found = doc
                    .descendants(el)
                    .any(|d| inner.matches_node(doc, el, d));
                memo.borrow_mut().insert(el, found);
                found
            }
            Self::MatchLeafNode
            | Self::MatchComment
            | Self::MatchTextNode
            | Self::MatchDataNode
            | Self::MatchCData => false,
            // structural wrappers and composites are handled in matches_node
            _ => false,
        }
    }

    /// Leaf-semantics match: node-type matchers test the kind, the text
    /// family tests the node's own value, everything element-shaped fails.
    fn matches_leaf(&self, doc: &Document, leaf: NodeId) -> bool {
        let kind = &doc.node(leaf).kind;
        match self {
            Self::MatchAnyNode | Self::MatchLeafNode => true,
            Self::MatchComment => matches!(kind, NodeKind::Comment { .. }),
            Self::MatchTextNode => {
                matches!(kind, NodeKind::Text { .. } | NodeKind::CData { .. })
            }
            Self::MatchDataNode => matches!(kind, NodeKind::Data { .. }),
            Self::MatchCData => matches!(kind, NodeKind::CData { .. }),
            Self::ContainsText(needle) | Self::ContainsOwnText(needle) => doc
                .node_value(leaf)
                .is_some_and(|v| normalize_whitespace(v).to_lowercase().contains(needle)),
            Self::ContainsData(needle) => doc
                .node_value(leaf)
                .is_some_and(|v| v.to_lowercase().contains(needle)),
            Self::ContainsWholeText(needle) | Self::ContainsWholeOwnText(needle) => {
                doc.node_value(leaf).is_some_and(|v| v.contains(needle))
            }
            Self::MatchesText(pattern)
            | Self::MatchesOwnText(pattern)
            | Self::MatchesWholeText(pattern)
            | Self::MatchesWholeOwnText(pattern) => {
                doc.node_value(leaf).is_some_and(|v| pattern.is_match(v))
            }
            Self::Blank => doc.node_value(leaf).is_none_or(|v| v.trim().is_empty()),
            _ => false,
        }
    }

    /// Static relative evaluation expense, used to order `And`/`Or`
    /// member testing cheapest-first.
    #[must_use]
    pub fn cost(&self) -> u32 {
        match self {
            Self::Tag(_) | Self::TagStartsWith(_) | Self::TagEndsWith(_) | Self::IsRoot => 1,
            Self::Root
            | Self::MatchAnyNode
            | Self::MatchLeafNode
            | Self::MatchComment
            | Self::MatchTextNode
            | Self::MatchDataNode
            | Self::MatchCData => 1,
            Self::Id(_) => 2,
            Self::Class(_)
            | Self::HasAnyAttribute
            | Self::Attribute(_)
            | Self::AttributeStarting(_)
            | Self::Blank => 4,
            Self::AttributeWithValue { .. }
            | Self::AttributeWithValueNot { .. }
            | Self::AttributeWithValueStarting { .. }
            | Self::AttributeWithValueEnding { .. }
            | Self::AttributeWithValueContaining { .. } => 6,
            Self::AttributeWithValueMatching { .. }
            | Self::ContainsText(_)
            | Self::ContainsOwnText(_)
            | Self::ContainsData(_)
            | Self::ContainsWholeText(_)
            | Self::ContainsWholeOwnText(_)
            | Self::MatchesText(_)
            | Self::MatchesOwnText(_)
            | Self::MatchesWholeText(_)
            | Self::MatchesWholeOwnText(_) => 8,
            Self::AllElements
            | Self::IndexLessThan(_)
            | Self::IndexGreaterThan(_)
            | Self::IndexEquals(_)
            | Self::IsFirstChild
            | Self::IsLastChild
            | Self::IsOnlyChild
            | Self::IsOnlyOfType
            | Self::IsEmpty
            | Self::NthChild { .. } => 10,
            Self::Ancestor(inner)
            | Self::ImmediateParent(inner)
            | Self::PreviousSibling(inner)
            | Self::ImmediatePreviousSibling(inner)
            | Self::Is(inner)
            | Self::Not(inner) => 2 + inner.cost(),
            Self::Has { inner, .. } => 10 + inner.cost(),
            Self::And(c) | Self::Or(c) => c.cost(),
        }
    }

    /// Returns `true` if this evaluator can match non-element nodes, so
    /// the collector knows to visit leaves.
    #[must_use]
    pub fn wants_nodes(&self) -> bool {
        match self {
            Self::MatchAnyNode
            | Self::MatchLeafNode
            | Self::MatchComment
            | Self::MatchTextNode
            | Self::MatchDataNode
            | Self::MatchCData => true,
            Self::Is(inner) | Self::Not(inner) => inner.wants_nodes(),
            Self::And(c) | Self::Or(c) => c.wants_nodes(),
            _ => false,
        }
    }

    /// Clears per-traversal memoized state, transitively. Must be called
    /// before reusing an evaluator against a changed tree.
    pub fn reset(&self) {
        match self {
            Self::Has { inner, memo } => {
                memo.borrow_mut().clear();
                inner.reset();
            }
            Self::Ancestor(inner)
            | Self::ImmediateParent(inner)
            | Self::PreviousSibling(inner)
            | Self::ImmediatePreviousSibling(inner)
            | Self::Is(inner)
            | Self::Not(inner) => inner.reset(),
            Self::And(c) | Self::Or(c) => c.reset(),
            _ => {}
        }
    }
}

/// The element's expanded name: `ns:tag`, or just `tag` without a prefix.
fn expanded_name(doc: &Document, el: NodeId) -> String {
    let name = doc.tag_name(el).unwrap_or("");
    match doc.prefix(el) {
        Some(p) => format!("{p}:{name}"),
        None => name.to_string(),
    }
}

/// The parent, if it is an element (the document node is not a parent for
/// child-position purposes).
fn element_parent(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.parent(node)
        .filter(|&p| doc.node(p).kind.is_element())
}

/// Iterates element siblings before (or, with `forward`, after) a node.
fn sibling_walk(doc: &Document, node: NodeId, forward: bool) -> impl Iterator<Item = NodeId> + '_ {
    let step = move |n: NodeId| {
        if forward {
            doc.next_element_sibling(n)
        } else {
            doc.prev_element_sibling(n)
        }
    };
    std::iter::successors(step(node), move |&n| step(n))
}

/// 1-based sibling position for the `:nth-*` family: among all element
/// siblings, or same-tag siblings for `-of-type`, counted from the end for
/// `-last-`.
fn nth_position(doc: &Document, el: NodeId, of_type: bool, from_last: bool) -> i32 {
    let count = sibling_walk(doc, el, from_last)
        .filter(|&s| !of_type || doc.same_tag(s, el))
        .count();
    i32::try_from(count).unwrap_or(i32::MAX - 1) + 1
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllElements => write!(f, "*"),
            Self::Tag(name) => write!(f, "{}", name.replacen(':', "|", 1)),
            Self::TagStartsWith(prefix) => {
                write!(f, "{}|*", prefix.trim_end_matches(':'))
            }
            Self::TagEndsWith(suffix) => write!(f, "*|{}", suffix.trim_start_matches(':')),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::HasAnyAttribute => write!(f, "[*]"),
            Self::Attribute(key) => write!(f, "[{key}]"),
            Self::AttributeStarting(prefix) => write!(f, "[^{prefix}]"),
            Self::AttributeWithValue { key, value } => write!(f, "[{key}={value}]"),
            Self::AttributeWithValueNot { key, value } => write!(f, "[{key}!={value}]"),
            Self::AttributeWithValueStarting { key, value } => write!(f, "[{key}^={value}]"),
            Self::AttributeWithValueEnding { key, value } => write!(f, "[{key}$={value}]"),
            Self::AttributeWithValueContaining { key, value } => write!(f, "[{key}*={value}]"),
            Self::AttributeWithValueMatching { key, pattern } => {
                write!(f, "[{key}~={}]", pattern.as_str())
            }
            Self::IndexLessThan(index) => write!(f, ":lt({index})"),
            Self::IndexGreaterThan(index) => write!(f, ":gt({index})"),
            Self::IndexEquals(index) => write!(f, ":eq({index})"),
            Self::IsRoot => write!(f, ":root"),
            Self::IsFirstChild => write!(f, ":first-child"),
            Self::IsLastChild => write!(f, ":last-child"),
            Self::IsOnlyChild => write!(f, ":only-child"),
            Self::IsOnlyOfType => write!(f, ":only-of-type"),
            Self::IsEmpty => write!(f, ":empty"),
            Self::NthChild {
                a,
                b,
                of_type,
                from_last,
            } => {
                let name = match (of_type, from_last) {
                    (false, false) => "nth-child",
                    (false, true) => "nth-last-child",
                    (true, false) => "nth-of-type",
                    (true, true) => "nth-last-of-type",
                };
                if *a == 0 {
                    write!(f, ":{name}({b})")
                } else {
                    write!(f, ":{name}({a}n{b:+})")
                }
            }
            Self::ContainsText(needle) => write!(f, ":contains({needle})"),
            Self::ContainsOwnText(needle) => write!(f, ":containsOwn({needle})"),
            Self::ContainsData(needle) => write!(f, ":containsData({needle})"),
            Self::ContainsWholeText(needle) => write!(f, ":containsWholeText({needle})"),
            Self::ContainsWholeOwnText(needle) => {
                write!(f, ":containsWholeOwnText({needle})")
            }
            Self::MatchesText(pattern) => write!(f, ":matches({})", pattern.as_str()),
            Self::MatchesOwnText(pattern) => write!(f, ":matchesOwn({})", pattern.as_str()),
            Self::MatchesWholeText(pattern) => {
                write!(f, ":matchesWholeText({})", pattern.as_str())
            }
            Self::MatchesWholeOwnText(pattern) => {
                write!(f, ":matchesWholeOwnText({})", pattern.as_str())
            }
            Self::Blank => write!(f, ":blank"),
            Self::MatchAnyNode => write!(f, "::node"),
            Self::MatchLeafNode => write!(f, "::leafnode"),
            Self::MatchComment => write!(f, "::comment"),
            Self::MatchTextNode => write!(f, "::text"),
            Self::MatchDataNode => write!(f, "::data"),
            Self::MatchCData => write!(f, "::cdata"),
            Self::Ancestor(inner) => write!(f, "{inner} "),
            Self::ImmediateParent(inner) => write!(f, "{inner} > "),
            Self::PreviousSibling(inner) => write!(f, "{inner} ~ "),
            Self::ImmediatePreviousSibling(inner) => write!(f, "{inner} + "),
            Self::Root => Ok(()),
            Self::Has { inner, .. } => write!(f, ":has({inner})"),
            Self::Is(inner) => write!(f, ":is({inner})"),
            Self::Not(inner) => write!(f, ":not({inner})"),
            Self::And(c) => write!(f, "{}", c.join("")),
            Self::Or(c) => write!(f, "{}", c.join(", ")),
        }
    }
}
