use std::fmt::Debug;

use crate::explanations::Explanation;

/// Decides which decision to refute given the explanation of a failure.
pub trait DecisionJumper: Debug {
    /// The depth of the decision to refute; 0 when no decision is involved in the failure.
    fn compute_target_depth(&self, explanation: &Explanation, current_depth: usize) -> usize;
}

/// Refutes the most recent decision which is part of the explanation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MostRecentImplicatedDecision;

impl DecisionJumper for MostRecentImplicatedDecision {
    fn compute_target_depth(&self, explanation: &Explanation, _current_depth: usize) -> usize {
        explanation.most_recent_decision_depth()
    }
}

/// Refutes the current decision, regardless of the explanation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MostRecentLevel;

impl DecisionJumper for MostRecentLevel {
    fn compute_target_depth(&self, _explanation: &Explanation, current_depth: usize) -> usize {
        current_depth
    }
}

/// Selects one of the provided jumpers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum JumperKind {
    /// See [`MostRecentImplicatedDecision`].
    #[default]
    MostRecentImplicatedDecision,
    /// See [`MostRecentLevel`].
    MostRecentLevel,
}

impl DecisionJumper for JumperKind {
    fn compute_target_depth(&self, explanation: &Explanation, current_depth: usize) -> usize {
        match self {
            JumperKind::MostRecentImplicatedDecision => {
                MostRecentImplicatedDecision.compute_target_depth(explanation, current_depth)
            }
            JumperKind::MostRecentLevel => {
                MostRecentLevel.compute_target_depth(explanation, current_depth)
            }
        }
    }
}
