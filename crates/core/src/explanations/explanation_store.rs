use crate::engine::VariableId;
use crate::explanations::Deduction;
use crate::explanations::Explanation;

/// Records why deductions hold, so that explanations can be expressed in terms of decisions.
pub trait ExplanationStore {
    /// Replaces every deduction with a recorded explanation by that explanation, recursively.
    /// The result consists of deductions without recorded explanation, typically decisions.
    fn flatten(&self, explanation: &Explanation) -> Explanation;

    /// Records that `deduction` holds because of `explanation`.
    fn store(&mut self, deduction: Deduction, explanation: Explanation);

    /// Forgets that the left branch `decision` was taken on `variable`.
    fn remove_left_decision_for(&mut self, variable: VariableId, decision: &Deduction);

    /// Whether backjumps should be reported in the log.
    fn is_tracing_enabled(&self) -> bool;
}
