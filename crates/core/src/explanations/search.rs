use crate::explanations::Decision;
use crate::explanations::DecisionChain;
use crate::explanations::ForcedDecisionPath;

/// The store which restores the state of the search to an earlier depth.
pub trait BacktrackStore {
    /// The depth of the current state; one level per applied decision, 0 at the root.
    fn current_depth(&self) -> usize;

    /// Restores the state as it was at `depth`.
    fn unwind_to_depth(&mut self, depth: usize);
}

/// The search loop, as seen by a backjump strategy.
pub trait SearchDriver {
    type Decision: Decision;

    /// The applied decisions. A backjump strategy pops the decisions it undoes.
    fn decision_chain(&mut self) -> &mut DecisionChain<Self::Decision>;

    /// Hands the decisions to apply next to the search.
    fn install_decision_path(&mut self, path: ForcedDecisionPath<Self::Decision>);
}
