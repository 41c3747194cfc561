//! Cost-ordered conjunction and disjunction of evaluators.
//!
//! `And` and `Or` both wrap a [`Combining`]: the member evaluators in the
//! order they were written, plus a stable-sorted view by ascending match
//! cost. Matching walks the sorted view so cheap checks (tag, id) run
//! before expensive ones (text containment, `:has`), short-circuiting as
//! soon as the outcome is known. Display always uses the written order,
//! so a query round-trips through its evaluator unchanged.

use crate::select::evaluator::Evaluator;
use crate::tree::{Document, NodeId};

/// Shared state for `And`/`Or` evaluators.
#[derive(Debug)]
pub struct Combining {
    /// Member evaluators in the order they were written in the query.
    evaluators: Vec<Evaluator>,
    /// Indices into `evaluators`, stable-sorted by ascending cost.
    sorted: Vec<usize>,
    /// Sum of member costs.
    cost: u32,
    /// True if any member matches non-element nodes.
    wants_nodes: bool,
}

impl Combining {
    /// Builds a combiner over the given members, computing the sorted
    /// evaluation order.
    #[must_use]
    pub fn new(evaluators: Vec<Evaluator>) -> Self {
        let mut combining = Self {
            evaluators,
            sorted: Vec::new(),
            cost: 0,
            wants_nodes: false,
        };
        combining.update();
        combining
    }

    /// Appends a member and recomputes the evaluation order.
    pub fn add(&mut self, evaluator: Evaluator) {
        self.evaluators.push(evaluator);
        self.update();
    }

    /// Recomputes cost, node interest, and the sorted evaluation order.
    ///
    /// The sort is stable, so members of equal cost keep their written
    /// order.
    fn update(&mut self) {
        self.cost = self.evaluators.iter().map(Evaluator::cost).sum();
        self.wants_nodes = self.evaluators.iter().any(Evaluator::wants_nodes);
        self.sorted = (0..self.evaluators.len()).collect();
        let evaluators = &self.evaluators;
        self.sorted.sort_by_key(|&i| evaluators[i].cost());
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// Returns `true` if the combiner has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// Members in written order.
    #[must_use]
    pub fn evaluators(&self) -> &[Evaluator] {
        &self.evaluators
    }

    /// Sum of member costs.
    #[must_use]
    pub(crate) fn cost(&self) -> u32 {
        self.cost
    }

    /// True if any member matches non-element nodes.
    #[must_use]
    pub(crate) fn wants_nodes(&self) -> bool {
        self.wants_nodes
    }

    /// Members in ascending-cost order.
    pub(crate) fn iter_sorted(&self) -> impl Iterator<Item = &Evaluator> {
        self.sorted.iter().map(|&i| &self.evaluators[i])
    }

    /// Conjunction: every member must match. Evaluated cheapest-first,
    /// stopping at the first failure.
    pub(crate) fn all_match(&self, doc: &Document, root: NodeId, node: NodeId) -> bool {
        self.iter_sorted().all(|e| e.matches_node(doc, root, node))
    }

    /// Disjunction: any member may match. Evaluated cheapest-first,
    /// stopping at the first success.
    pub(crate) fn any_match(&self, doc: &Document, root: NodeId, node: NodeId) -> bool {
        self.iter_sorted().any(|e| e.matches_node(doc, root, node))
    }

    /// Clears memoized state in all members.
    pub(crate) fn reset(&self) {
        for e in &self.evaluators {
            e.reset();
        }
    }

    /// Joins member displays with `sep`, in written order.
    pub(crate) fn join(&self, sep: &str) -> String {
        self.evaluators
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep)
    }
}
