use crate::basic_types::Cause;
use crate::containers::StorageKey;
use crate::engine::EventType;
use crate::engine::PropagatorId;

/// The stable identifier of a variable of the domain layer.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableId(pub u32);

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VariableId({})", self.0)
    }
}

/// The compact index of a variable inside the engine.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct VariableIndex(u32);

impl StorageKey for VariableIndex {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableIndex(index as u32)
    }
}

/// A propagator which watches a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watcher {
    /// The watching propagator.
    pub propagator: PropagatorId,
    /// The position of the variable among the watched variables of the propagator.
    pub watch_index: usize,
}

/// The domain layer, as far as the engine is concerned.
///
/// Variables are created once for a problem instance; the engine never creates or destroys them,
/// it only indexes the information below. Whenever a domain changes, the domain layer is required
/// to report the change through a [`VariableUpdateListener`].
pub trait VariableStore {
    /// The identifiers of all variables.
    fn variable_ids(&self) -> impl Iterator<Item = VariableId> + '_;

    /// The number of values in the domain of `variable`.
    fn domain_size(&self, variable: VariableId) -> usize;

    /// Whether the domain of `variable` is a single value.
    fn is_instantiated(&self, variable: VariableId) -> bool;

    /// The propagators watching `variable`, in a fixed order. The position of a propagator in
    /// this list is the `slot` which the propagator reports in its
    /// [`WatchSlot`](crate::engine::WatchSlot).
    fn watchers(&self, variable: VariableId) -> &[Watcher];
}

/// Receives every change made to a domain.
pub trait VariableUpdateListener {
    fn on_variable_update(&mut self, variable: VariableId, event: EventType, cause: Cause);
}
