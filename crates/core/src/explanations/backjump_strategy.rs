use std::fmt::Debug;

use log::info;
use thiserror::Error;

use crate::basic_types::Cause;
use crate::create_statistics_struct;
use crate::explanations::BacktrackStore;
use crate::explanations::Decision;
use crate::explanations::DecisionChain;
use crate::explanations::Explanation;
use crate::explanations::ExplanationStore;
use crate::explanations::SearchDriver;
use crate::propel_assert_simple;
use crate::statistics::CumulativeMovingAverage;

/// The collaborators of a backjump.
#[derive(Debug)]
pub struct BackjumpContext<'a, Store, Explanations, Driver> {
    pub store: &'a mut Store,
    pub explanations: &'a mut Explanations,
    pub driver: &'a mut Driver,
}

impl<'a, Store, Explanations, Driver> BackjumpContext<'a, Store, Explanations, Driver> {
    pub fn new(
        store: &'a mut Store,
        explanations: &'a mut Explanations,
        driver: &'a mut Driver,
    ) -> Self {
        BackjumpContext {
            store,
            explanations,
            driver,
        }
    }
}

/// How the search continues after a backjump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackjumpOutcome {
    /// No decision is left to refute; there is no solution below the root.
    Exhausted,
    /// The decision at `target_depth` is refuted, followed by `forced_path_length` forced
    /// decisions.
    Repaired {
        target_depth: usize,
        forced_path_length: usize,
    },
}

/// A backjump which cannot be performed. The state of the search is undefined afterwards.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BackjumpError {
    #[error("the decision to refute at depth {depth} has no alternative left")]
    MissingAlternative { depth: usize },
    #[error("the target depth {target} lies below the current depth {current}")]
    TargetBeyondCurrentDepth { target: usize, current: usize },
}

create_statistics_struct!(
    /// Statistics of a [`BackjumpStrategy`].
    BackjumpStatistics {
        /// The number of contradictions which were handled.
        num_backjumps: u64,
        /// The number of decisions which were refuted.
        num_refuted_decisions: u64,
        /// The number of times the search space was exhausted.
        num_exhausted: u64,
        /// The average number of forced decisions per backjump.
        average_forced_path_length: CumulativeMovingAverage,
        /// The average number of levels between the current decision and the refuted decision.
        average_backjump_distance: CumulativeMovingAverage,
    }
);

/// Decides how the search backtracks after a contradiction, given its explanation.
pub trait BackjumpStrategy: Debug {
    /// Handles a contradiction with the given (unflattened) explanation.
    fn on_contradiction<Store, Explanations, Driver>(
        &mut self,
        explanation: &Explanation,
        cause: Cause,
        context: BackjumpContext<'_, Store, Explanations, Driver>,
    ) -> Result<BackjumpOutcome, BackjumpError>
    where
        Store: BacktrackStore,
        Explanations: ExplanationStore,
        Driver: SearchDriver,
    {
        let complete = context.explanations.flatten(explanation);
        self.backtrack_on(complete, cause, context)
    }

    /// Backtracks given the flattened explanation of a contradiction raised by `cause`.
    fn backtrack_on<Store, Explanations, Driver>(
        &mut self,
        explanation: Explanation,
        cause: Cause,
        context: BackjumpContext<'_, Store, Explanations, Driver>,
    ) -> Result<BackjumpOutcome, BackjumpError>
    where
        Store: BacktrackStore,
        Explanations: ExplanationStore,
        Driver: SearchDriver;

    fn statistics(&self) -> &BackjumpStatistics;
}

/// Checks that the target lies on the chain and that the decision there can be refuted.
pub(crate) fn validate_target<D: Decision>(
    chain: &DecisionChain<D>,
    target: usize,
    current: usize,
) -> Result<(), BackjumpError> {
    if target > current || target > chain.depth() {
        return Err(BackjumpError::TargetBeyondCurrentDepth { target, current });
    }
    if let Some(decision) = chain.get(target) {
        if !decision.has_next() {
            return Err(BackjumpError::MissingAlternative { depth: target });
        }
    }
    Ok(())
}

/// Records that the negative branch of `decision` follows from `explanation` without the
/// positive branch.
pub(crate) fn explain_refutation<D: Decision>(
    decision: &D,
    explanation: &mut Explanation,
    explanations: &mut impl ExplanationStore,
) {
    let positive = decision.positive_deduction();
    propel_assert_simple!(
        positive.is_left_branch(),
        "the positive deduction of {decision:?} is not a left branch"
    );

    let _ = explanation.remove(&positive);
    explanations.remove_left_decision_for(positive.variable(), &positive);

    let flattened = explanations.flatten(explanation);
    explanations.store(decision.negative_deduction(), flattened);
}

pub(crate) fn log_backjump<D: Decision>(
    explanations: &impl ExplanationStore,
    decision: Option<&D>,
) {
    if explanations.is_tracing_enabled() {
        match decision {
            Some(decision) => info!("Backjump on {decision:?}"),
            None => info!("Backjump on the root"),
        }
    }
}
