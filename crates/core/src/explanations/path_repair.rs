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
use crate::explanations::ConflictBasedBackjumping;
use crate::explanations::Decision;
use crate::explanations::DecisionJumper;
use crate::explanations::Explanation;
use crate::explanations::ExplanationStore;
use crate::explanations::ForcedDecisionPath;
use crate::explanations::SearchDriver;
use crate::propel_assert_moderate;
use crate::statistics::MovingAverage;

/// Dynamic backtracking following the path-repair principle.
///
/// Like [`ConflictBasedBackjumping`], the decision selected by the jumper is refuted. The
/// decisions made after it are not discarded but replayed as forced decisions once the
/// refutation is applied; a decision whose alternatives are exhausted is reversed, so that the
/// branch which was taken is replayed.
///
/// With [`MostRecentLevel`](crate::explanations::MostRecentLevel) as jumper, this is
/// chronological backtracking.
#[derive(Debug, Default)]
pub struct PathRepair<Jumper> {
    backjumping: ConflictBasedBackjumping<Jumper>,
}

impl<Jumper: DecisionJumper> PathRepair<Jumper> {
    pub fn new(jumper: Jumper) -> Self {
        PathRepair {
            backjumping: ConflictBasedBackjumping::new(jumper),
        }
    }

    pub fn jumper(&self) -> &Jumper {
        self.backjumping.jumper()
    }
}

impl<Jumper: DecisionJumper> BackjumpStrategy for PathRepair<Jumper> {
    fn backtrack_on<Store, Explanations, Driver>(
        &mut self,
        mut explanation: Explanation,
        cause: Cause,
        context: BackjumpContext<'_, Store, Explanations, Driver>,
    ) -> Result<BackjumpOutcome, BackjumpError>
    where
        Store: BacktrackStore,
        Explanations: ExplanationStore,
        Driver: SearchDriver,
    {
        let current = context.store.current_depth();
        let target = self.backjumping.target_depth(&explanation, current);

        let chain = context.driver.decision_chain();
        propel_assert_moderate!(chain.depth() == current);
        validate_target(chain, target, current)?;

        // A bound from the objective is explained as in regular backjumping first.
        if cause == Cause::ObjectiveManager {
            self.backjumping.update_explanations(
                target,
                &mut explanation,
                &mut *context.explanations,
                chain,
            );
        }

        context.store.unwind_to_depth(target.saturating_sub(1));

        let mut forced = Vec::with_capacity(chain.depth() - target);
        while chain.depth() > target {
            let Some(mut decision) = chain.pop() else {
                break;
            };
            if !decision.has_next() {
                decision.reverse();
            }
            decision.rewind();
            forced.push(decision);
        }
        forced.reverse();

        let statistics = self.backjumping.statistics_mut();
        statistics.num_backjumps += 1;
        statistics
            .average_backjump_distance
            .add_term((current - target) as u64);

        let Some(decision) = chain.pop() else {
            log_backjump::<Driver::Decision>(&*context.explanations, None);
            statistics.num_exhausted += 1;
            return Ok(BackjumpOutcome::Exhausted);
        };

        explain_refutation(&decision, &mut explanation, &mut *context.explanations);
        log_backjump(&*context.explanations, Some(&decision));

        let forced_path_length = forced.len();
        statistics.num_refuted_decisions += 1;
        statistics
            .average_forced_path_length
            .add_term(forced_path_length as u64);

        context
            .driver
            .install_decision_path(ForcedDecisionPath::new(decision, forced));

        Ok(BackjumpOutcome::Repaired {
            target_depth: target,
            forced_path_length,
        })
    }

    fn statistics(&self) -> &BackjumpStatistics {
        self.backjumping.statistics()
    }
}
