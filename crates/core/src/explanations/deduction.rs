use std::fmt::Display;

use crate::engine::VariableId;

/// The branch of a binary decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    /// The decision itself, `variable = value`.
    Left,
    /// Its refutation, `variable != value`.
    Right,
}

/// A fact established during search, which can be part of an [`Explanation`].
///
/// [`Explanation`]: crate::explanations::Explanation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Deduction {
    /// A branch of the decision on `variable` and `value` applied at `depth` of the decision
    /// chain.
    BranchingDecision {
        depth: usize,
        variable: VariableId,
        value: i32,
        branch: Branch,
    },
    /// The removal of `value` from the domain of `variable`.
    ValueRemoval { variable: VariableId, value: i32 },
}

impl Deduction {
    /// The left branch of the decision `variable = value` applied at `depth`.
    pub fn left_branch(depth: usize, variable: VariableId, value: i32) -> Deduction {
        Deduction::BranchingDecision {
            depth,
            variable,
            value,
            branch: Branch::Left,
        }
    }

    /// The right branch of the decision `variable = value` applied at `depth`.
    pub fn right_branch(depth: usize, variable: VariableId, value: i32) -> Deduction {
        Deduction::BranchingDecision {
            depth,
            variable,
            value,
            branch: Branch::Right,
        }
    }

    /// The depth of the decision, if this deduction is a branching decision.
    pub fn decision_depth(&self) -> Option<usize> {
        match self {
            Deduction::BranchingDecision { depth, .. } => Some(*depth),
            Deduction::ValueRemoval { .. } => None,
        }
    }

    pub fn variable(&self) -> VariableId {
        match self {
            Deduction::BranchingDecision { variable, .. }
            | Deduction::ValueRemoval { variable, .. } => *variable,
        }
    }

    pub fn is_left_branch(&self) -> bool {
        matches!(
            self,
            Deduction::BranchingDecision {
                branch: Branch::Left,
                ..
            }
        )
    }
}

impl Display for Deduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deduction::BranchingDecision {
                depth,
                variable,
                value,
                branch: Branch::Left,
            } => write!(f, "[{depth}] {variable} = {value}"),
            Deduction::BranchingDecision {
                depth,
                variable,
                value,
                branch: Branch::Right,
            } => write!(f, "[{depth}] {variable} != {value}"),
            Deduction::ValueRemoval { variable, value } => write!(f, "{variable} - {{{value}}}"),
        }
    }
}
