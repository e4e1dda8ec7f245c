use crate::basic_types::PropagationStatus;
use crate::engine::EventMask;
use crate::engine::PropagationContext;
use crate::engine::PropagatorId;
use crate::engine::VariableId;

/// The position of a propagator in the watcher list of one of its watched variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchSlot {
    /// The variable is watched; the propagator occupies position `slot` in
    /// [`VariableStore::watchers`](crate::engine::VariableStore::watchers) of the variable.
    Variable { variable: VariableId, slot: usize },
    /// The variable is a constant and is never watched.
    Constant,
}

/// A filtering algorithm, as seen by the propagation engine.
///
/// A propagator takes part in two kinds of executions:
/// * fine executions ([`Propagator::propagate_on`]), which react to the pending events of a
///   single watched variable;
/// * coarse executions ([`Propagator::propagate`]), which run the whole filtering given the
///   pending propagator-level events.
///
/// All domain changes go through the [`PropagationContext`], so that the engine learns about
/// them with the propagator as their cause.
pub trait Propagator<Domains> {
    /// The identifier of this propagator.
    fn id(&self) -> PropagatorId;

    /// The name of the propagator, used in logging.
    fn name(&self) -> &str;

    /// For each watched variable (in the order of the propagator) its position in the watcher
    /// list of that variable.
    fn watched_variables(&self) -> &[WatchSlot];

    /// Whether this propagator currently reacts to events.
    fn is_active(&self) -> bool;

    /// Whether this propagator keeps no incremental state and should be re-activated before
    /// every coarse execution.
    fn is_stateless(&self) -> bool;

    /// Marks this propagator as active.
    fn set_active(&mut self);

    /// Decides whether the event `mask` on the watched variable at `watch_index` should be
    /// scheduled for a fine execution.
    fn advise(&mut self, watch_index: usize, mask: EventMask) -> bool {
        let _ = (watch_index, mask);
        true
    }

    /// The coarse execution of this propagator.
    fn propagate(&mut self, context: PropagationContext<'_, Domains>, mask: EventMask)
        -> PropagationStatus;

    /// The fine execution of this propagator for the watched variable at `watch_index`.
    fn propagate_on(
        &mut self,
        context: PropagationContext<'_, Domains>,
        watch_index: usize,
        mask: EventMask,
    ) -> PropagationStatus;
}
