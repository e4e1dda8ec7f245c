use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::engine::propagation::PropagatorIndex;
use crate::propel_assert_moderate;

/// The FIFO queue of propagators awaiting a coarse execution.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropagatorQueue {
    queue: VecDeque<PropagatorIndex>,
    is_enqueued: KeyedVec<PropagatorIndex, bool>,
}

impl PropagatorQueue {
    pub(crate) fn new(num_propagators: usize) -> PropagatorQueue {
        PropagatorQueue {
            queue: VecDeque::with_capacity(num_propagators),
            is_enqueued: KeyedVec::with_len(num_propagators, false),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Appends the propagator to the queue; returns false if it was already enqueued.
    pub(crate) fn enqueue_propagator(&mut self, propagator: PropagatorIndex) -> bool {
        if self.is_propagator_enqueued(propagator) {
            return false;
        }

        self.is_enqueued[propagator] = true;
        self.queue.push_back(propagator);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorIndex> {
        let next_propagator = self.queue.pop_front();

        if let Some(propagator) = next_propagator {
            propel_assert_moderate!(self.is_enqueued[propagator]);
            self.is_enqueued[propagator] = false;
        }

        next_propagator
    }

    /// Takes the propagator out of the queue; returns whether it was enqueued.
    pub(crate) fn remove(&mut self, propagator: PropagatorIndex) -> bool {
        if !self.is_propagator_enqueued(propagator) {
            return false;
        }

        self.is_enqueued[propagator] = false;
        if let Some(position) = self.queue.iter().position(|&p| p == propagator) {
            let _ = self.queue.remove(position);
        }
        true
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator: PropagatorIndex) -> bool {
        self.is_enqueued.get(propagator).copied().unwrap_or_default()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = PropagatorIndex> + '_ {
        self.queue.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    fn propagator(index: usize) -> PropagatorIndex {
        PropagatorIndex::create_from_index(index)
    }

    #[test]
    fn test_fifo_ordering() {
        let mut queue = PropagatorQueue::new(5);

        assert!(queue.enqueue_propagator(propagator(1)));
        assert!(queue.enqueue_propagator(propagator(0)));
        assert!(queue.enqueue_propagator(propagator(3)));

        assert_eq!(Some(propagator(1)), queue.pop());
        assert_eq!(Some(propagator(0)), queue.pop());
        assert_eq!(Some(propagator(3)), queue.pop());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn enqueueing_twice_keeps_a_single_entry() {
        let mut queue = PropagatorQueue::new(2);

        assert!(queue.enqueue_propagator(propagator(1)));
        assert!(!queue.enqueue_propagator(propagator(1)));

        assert_eq!(1, queue.len());
    }

    #[test]
    fn removed_propagator_is_no_longer_popped() {
        let mut queue = PropagatorQueue::new(3);
        let _ = queue.enqueue_propagator(propagator(0));
        let _ = queue.enqueue_propagator(propagator(2));

        assert!(queue.remove(propagator(0)));
        assert!(!queue.remove(propagator(0)));

        assert!(!queue.is_propagator_enqueued(propagator(0)));
        assert_eq!(Some(propagator(2)), queue.pop());
        assert!(queue.is_empty());
    }
}
