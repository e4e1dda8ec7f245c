use crate::basic_types::Cause;
use crate::explanations::backjump_strategy::explain_refutation;
use crate::explanations::backjump_strategy::log_backjump;
use crate::explanations::backjump_strategy::validate_target;
use crate::explanations::BackjumpContext;
use crate::explanations::BackjumpError;
use crate::explanations::BackjumpOutcome;
use crate::explanations::BackjumpStatistics;
use crate::explanations::BackjumpStrategy;
use crate::explanations::BacktrackStore;
use crate::explanations::Decision;
use crate::explanations::DecisionChain;
use crate::explanations::DecisionJumper;
use crate::explanations::Explanation;
use crate::explanations::ExplanationStore;
use crate::explanations::ForcedDecisionPath;
use crate::explanations::SearchDriver;
use crate::propel_assert_moderate;
use crate::statistics::MovingAverage;

/// Explanation-based backjumping: the decision selected by the jumper is refuted and every
/// decision made after it is discarded.
///
/// The refutation is recorded in the [`ExplanationStore`]: the negative branch of the refuted
/// decision is explained by the conflict explanation without its positive branch.
#[derive(Debug, Default)]
pub struct ConflictBasedBackjumping<Jumper> {
    jumper: Jumper,
    statistics: BackjumpStatistics,
}

impl<Jumper: DecisionJumper> ConflictBasedBackjumping<Jumper> {
    pub fn new(jumper: Jumper) -> Self {
        ConflictBasedBackjumping {
            jumper,
            statistics: BackjumpStatistics::default(),
        }
    }

    pub fn jumper(&self) -> &Jumper {
        &self.jumper
    }

    pub(crate) fn target_depth(&self, explanation: &Explanation, current_depth: usize) -> usize {
        self.jumper.compute_target_depth(explanation, current_depth)
    }

    /// Records the refutation of the decision at `target` without changing the chain.
    pub(crate) fn update_explanations<D: Decision>(
        &self,
        target: usize,
        explanation: &mut Explanation,
        explanations: &mut impl ExplanationStore,
        chain: &DecisionChain<D>,
    ) {
        if let Some(decision) = chain.get(target) {
            explain_refutation(decision, explanation, explanations);
        }
    }

    pub(crate) fn statistics_mut(&mut self) -> &mut BackjumpStatistics {
        &mut self.statistics
    }
}

impl<Jumper: DecisionJumper> BackjumpStrategy for ConflictBasedBackjumping<Jumper> {
    fn backtrack_on<Store, Explanations, Driver>(
        &mut self,
        mut explanation: Explanation,
        _cause: Cause,
        context: BackjumpContext<'_, Store, Explanations, Driver>,
    ) -> Result<BackjumpOutcome, BackjumpError>
    where
        Store: BacktrackStore,
        Explanations: ExplanationStore,
        Driver: SearchDriver,
    {
        let current = context.store.current_depth();
        let target = self.target_depth(&explanation, current);

        let chain = context.driver.decision_chain();
        propel_assert_moderate!(chain.depth() == current);
        validate_target(chain, target, current)?;

        self.update_explanations(target, &mut explanation, &mut *context.explanations, chain);
        log_backjump(&*context.explanations, chain.get(target));

        context.store.unwind_to_depth(target.saturating_sub(1));
        while chain.depth() > target {
            let _ = chain.pop();
        }

        self.statistics.num_backjumps += 1;
        self.statistics
            .average_backjump_distance
            .add_term((current - target) as u64);

        let Some(decision) = chain.pop() else {
            self.statistics.num_exhausted += 1;
            return Ok(BackjumpOutcome::Exhausted);
        };

        self.statistics.num_refuted_decisions += 1;
        self.statistics.average_forced_path_length.add_term(0);
        context
            .driver
            .install_decision_path(ForcedDecisionPath::new(decision, Vec::new()));

        Ok(BackjumpOutcome::Repaired {
            target_depth: target,
            forced_path_length: 0,
        })
    }

    fn statistics(&self) -> &BackjumpStatistics {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explanations::test_utils::left;
    use crate::explanations::test_utils::right;
    use crate::explanations::test_utils::search_state;
    use crate::explanations::ExplanationRecorder;
    use crate::explanations::MostRecentImplicatedDecision;

    #[test]
    fn decisions_above_the_refuted_decision_are_discarded() {
        let (mut store, mut driver) = search_state(&[false, true, false, false]);
        let mut recorder = ExplanationRecorder::default();
        let mut strategy = ConflictBasedBackjumping::new(MostRecentImplicatedDecision);

        let outcome = strategy.backtrack_on(
            [left(1), left(3)].into_iter().collect(),
            Cause::Null,
            BackjumpContext::new(&mut store, &mut recorder, &mut driver),
        );

        assert_eq!(
            Ok(BackjumpOutcome::Repaired {
                target_depth: 3,
                forced_path_length: 0
            }),
            outcome
        );
        assert_eq!(vec![2], store.unwound_to);
        assert_eq!(2, driver.chain.depth());

        let path = driver.installed.expect("the refutation is installed");
        assert_eq!(3, path.decision_to_refute().depth);
        assert_eq!(0, path.decision_to_refute().num_rewinds);
        assert!(path.is_empty());

        assert_eq!(
            Some(&[left(1)].into_iter().collect::<Explanation>()),
            recorder.explanation_of(&right(3))
        );
        assert_eq!(1.0, strategy.statistics().average_backjump_distance.value());
    }

    #[test]
    fn refuting_a_right_branch_fails() {
        let (mut store, mut driver) = search_state(&[false, true]);
        let mut recorder = ExplanationRecorder::default();
        let mut strategy = ConflictBasedBackjumping::new(MostRecentImplicatedDecision);

        let outcome = strategy.backtrack_on(
            [left(2)].into_iter().collect(),
            Cause::Null,
            BackjumpContext::new(&mut store, &mut recorder, &mut driver),
        );

        assert_eq!(Err(BackjumpError::MissingAlternative { depth: 2 }), outcome);
    }

    #[test]
    fn no_implicated_decision_exhausts_the_search() {
        let (mut store, mut driver) = search_state(&[false, false]);
        let mut recorder = ExplanationRecorder::default();
        let mut strategy = ConflictBasedBackjumping::new(MostRecentImplicatedDecision);

        let outcome = strategy.backtrack_on(
            Explanation::new(),
            Cause::Null,
            BackjumpContext::new(&mut store, &mut recorder, &mut driver),
        );

        assert_eq!(Ok(BackjumpOutcome::Exhausted), outcome);
        assert_eq!(0, store.depth);
        assert!(driver.chain.is_root());
        assert_eq!(1, strategy.statistics().num_exhausted);
    }
}
