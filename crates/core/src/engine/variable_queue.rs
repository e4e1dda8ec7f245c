use crate::containers::KeyValueHeap;
use crate::containers::StorageKey;
use crate::engine::VariableIndex;

/// The ready set of the engine: scheduled variables ordered by decreasing activity, ties broken
/// by the lower variable index.
///
/// The priority of a variable is fixed when it is scheduled; activity updates only affect
/// variables scheduled afterwards.
#[derive(Debug)]
pub(crate) struct VariableQueue {
    heap: KeyValueHeap<VariableIndex, f64>,
}

impl VariableQueue {
    pub(crate) fn new(num_variables: usize) -> Self {
        let mut heap = KeyValueHeap::default();
        for index in 0..num_variables {
            heap.grow(VariableIndex::create_from_index(index), 0.0);
        }
        heap.delete_all();

        VariableQueue { heap }
    }

    /// Adds the variable to the ready set; returns false if it was already scheduled.
    pub(crate) fn schedule(&mut self, variable: VariableIndex, activity: f64) -> bool {
        if self.is_scheduled(variable) {
            return false;
        }

        self.heap.insert(variable, activity);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<VariableIndex> {
        self.heap.pop_max()
    }

    pub(crate) fn is_scheduled(&self, variable: VariableIndex) -> bool {
        self.heap.is_key_present(variable)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.has_no_nonremoved_elements()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.num_nonremoved_elements()
    }
}
