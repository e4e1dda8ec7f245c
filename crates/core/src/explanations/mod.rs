//! Explanations of deductions and the strategies which use them to backjump after a
//! contradiction.
//!
//! A [`BackjumpStrategy`] receives the explanation of a contradiction, asks a
//! [`DecisionJumper`] which decision to refute, restores the [`BacktrackStore`] to the state
//! before that decision and hands the decisions to apply next to the [`SearchDriver`].
mod backjump_strategy;
mod conflict_based_backjumping;
mod decision;
mod deduction;
mod explanation;
mod explanation_store;
mod jumpers;
mod path_repair;
mod recorder;
mod search;
#[cfg(test)]
pub(crate) mod test_utils;

pub use backjump_strategy::BackjumpContext;
pub use backjump_strategy::BackjumpError;
pub use backjump_strategy::BackjumpOutcome;
pub use backjump_strategy::BackjumpStatistics;
pub use backjump_strategy::BackjumpStrategy;
pub use conflict_based_backjumping::ConflictBasedBackjumping;
pub use decision::*;
pub use deduction::*;
pub use explanation::Explanation;
pub use explanation_store::ExplanationStore;
pub use jumpers::*;
pub use path_repair::PathRepair;
pub use recorder::ExplanationRecorder;
pub use search::*;
