use std::fmt::Debug;

use crate::explanations::Deduction;

/// A binary decision of the search.
///
/// The left branch of the decision is tried first; afterwards its refutation (the right branch)
/// remains as the alternative.
pub trait Decision: Debug {
    /// Whether the decision still has an untried branch.
    fn has_next(&self) -> bool;

    /// Swaps the branches of the decision, so that the branch which is currently taken becomes
    /// the left branch.
    fn reverse(&mut self);

    /// Resets the decision so that it can be applied again from its left branch.
    fn rewind(&mut self);

    /// The left branch of the decision.
    fn positive_deduction(&self) -> Deduction;

    /// The right branch of the decision.
    fn negative_deduction(&self) -> Deduction;
}

/// The applied decisions of the search, from the root to the current decision.
///
/// The empty chain is the root. The decision at depth `d` (starting at 1) is the `d`-th decision
/// from the root; its predecessor is the decision at depth `d - 1`.
#[derive(Clone, Debug)]
pub struct DecisionChain<D> {
    decisions: Vec<D>,
}

impl<D> Default for DecisionChain<D> {
    fn default() -> Self {
        DecisionChain {
            decisions: Vec::new(),
        }
    }
}

impl<D> DecisionChain<D> {
    pub fn new() -> Self {
        DecisionChain::default()
    }

    /// The depth of the current decision; 0 at the root.
    pub fn depth(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_root(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Applies `decision` below the current decision.
    pub fn push(&mut self, decision: D) {
        self.decisions.push(decision);
    }

    /// Removes the current decision, making its predecessor current.
    pub fn pop(&mut self) -> Option<D> {
        self.decisions.pop()
    }

    pub fn current(&self) -> Option<&D> {
        self.decisions.last()
    }

    /// The decision at `depth`.
    pub fn get(&self, depth: usize) -> Option<&D> {
        depth
            .checked_sub(1)
            .and_then(|index| self.decisions.get(index))
    }

    /// The decisions from the root to the current decision.
    pub fn iter(&self) -> impl Iterator<Item = &D> + '_ {
        self.decisions.iter()
    }
}

impl<D> FromIterator<D> for DecisionChain<D> {
    fn from_iter<T: IntoIterator<Item = D>>(iter: T) -> Self {
        DecisionChain {
            decisions: iter.into_iter().collect(),
        }
    }
}

/// The decisions to apply after a backjump: first the refutation of `decision_to_refute`, then
/// the forced decisions, oldest first.
#[derive(Clone, Debug)]
pub struct ForcedDecisionPath<D> {
    decision_to_refute: D,
    forced: Vec<D>,
}

impl<D> ForcedDecisionPath<D> {
    pub fn new(decision_to_refute: D, forced: Vec<D>) -> Self {
        ForcedDecisionPath {
            decision_to_refute,
            forced,
        }
    }

    pub fn decision_to_refute(&self) -> &D {
        &self.decision_to_refute
    }

    pub fn forced_decisions(&self) -> &[D] {
        &self.forced
    }

    /// The number of forced decisions.
    pub fn len(&self) -> usize {
        self.forced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forced.is_empty()
    }

    pub fn into_parts(self) -> (D, Vec<D>) {
        (self.decision_to_refute, self.forced)
    }
}
