//! A heap where the keys range from [0, ..., n - 1] and the values are floating points. The heap
//! can be queried to return the key with the maximum value, and keys can be (temporarily)
//! removed/readded as necessary. Keys with equal values are served in increasing key order, which
//! keeps the order of extraction deterministic.

// The implementation could be more efficient in the following ways:
//  - Currently more comparisons are done than necessary when sifting
//  - Possibly the recursion could be unrolled
use super::KeyedVec;
use super::StorageKey;
use crate::propel_assert_moderate;

/// A [max-heap](https://en.wikipedia.org/wiki/Min-max_heap)
/// which allows for generalised `Key`s (required to implement [StorageKey]) and `Value`s (which are
/// required to be ordered).
///
/// Every key is allocated once through [`KeyValueHeap::grow`]; afterwards keys move in and out of
/// the heap through [`KeyValueHeap::restore_key`]/[`KeyValueHeap::insert`] and
/// [`KeyValueHeap::delete_key`]/[`KeyValueHeap::pop_max`] without any allocation.
#[derive(Debug, Clone)]
pub struct KeyValueHeap<Key, Value> {
    /// Contains the values stored as a heap; the value of key `i` is at index
    /// [`KeyValueHeap::map_key_to_position\[i\]`][KeyValueHeap::map_key_to_position]
    values: Vec<Value>,
    /// `map_key_to_position[i]` is the index of the value of the key `i` in
    /// [`KeyValueHeap::values`]
    map_key_to_position: KeyedVec<Key, usize>,
    /// `map_position_to_key[i]` is the key which is associated with `i` in
    /// [`KeyValueHeap::values`]
    map_position_to_key: Vec<Key>,
    /// The index of the last element in [`KeyValueHeap::values`]
    end_position: usize,
}

impl<Key: StorageKey, Value> Default for KeyValueHeap<Key, Value> {
    fn default() -> Self {
        Self {
            values: Default::default(),
            map_key_to_position: Default::default(),
            map_position_to_key: Default::default(),
            end_position: Default::default(),
        }
    }
}

impl<Key, Value> KeyValueHeap<Key, Value>
where
    Key: StorageKey + Copy,
    Value: PartialOrd + Copy,
{
    /// Deletes the key with maximum value from the heap and returns it, or None if the heap is
    /// empty.
    ///
    ///  The time-complexity of this operation is O(logn).
    pub fn pop_max(&mut self) -> Option<Key> {
        if !self.has_no_nonremoved_elements() {
            let best_key = self.map_position_to_key[0];
            propel_assert_moderate!(0 == self.map_key_to_position[best_key]);
            self.delete_key(best_key);
            Some(best_key)
        } else {
            None
        }
    }

    /// Places `key` in the heap with the provided `value`. If the key is already present, its
    /// value is replaced and the heap is repaired.
    ///
    /// The run-time complexity of this operation is O(logn)
    pub fn insert(&mut self, key: Key, value: Value) {
        if self.is_key_present(key) {
            self.delete_key(key);
        }
        let position = self.map_key_to_position[key];
        self.values[position] = value;
        self.restore_key(key);
    }

    /// Restores the entry with key 'key' to the heap if the key is not present, otherwise does
    /// nothing. Its value is the previous value used before 'delete_key' was called.
    ///
    ///  The run-time complexity of this operation is O(logn)
    pub fn restore_key(&mut self, key: Key) {
        if !self.is_key_present(key) {
            // The key is somewhere in the range [end_position, max_size-1]
            // We place the key at the end of the heap, increase end_position, and sift up
            let position = self.map_key_to_position[key];
            propel_assert_moderate!(position >= self.end_position);
            self.swap_positions(position, self.end_position);
            self.end_position += 1;
            self.sift_up(self.end_position - 1);
        }
    }

    /// Removes the entry with key 'key' (temporarily) from the heap if the key is present,
    /// otherwise does nothing. Its value remains recorded internally and is available upon
    /// calling [`KeyValueHeap::restore_key`].
    ///
    /// The run-time complexity of this operation is O(logn)
    pub fn delete_key(&mut self, key: Key) {
        if self.is_key_present(key) {
            // Place the key at the end of the heap, decrement the heap, and sift down to ensure a
            // valid heap
            let position = self.map_key_to_position[key];
            self.swap_positions(position, self.end_position - 1);
            self.end_position -= 1;
            if position < self.end_position {
                self.sift_down(position);
                self.sift_up(position);
            }
        }
    }

    /// Returns how many elements are in the heap (including the (temporarily) "removed" values)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn num_nonremoved_elements(&self) -> usize {
        self.end_position
    }

    /// Returns whether there are elements left in the heap (excluding the "removed" values)
    pub fn has_no_nonremoved_elements(&self) -> bool {
        self.num_nonremoved_elements() == 0
    }

    /// Returns whether the key is currently not (temporarily) removed
    pub fn is_key_present(&self, key: Key) -> bool {
        key.index() < self.map_key_to_position.len()
            && self.map_key_to_position[key] < self.end_position
    }

    /// Increases the size of the heap by one and adjust the data structures appropriately by adding
    /// `Key` and `Value`
    pub fn grow(&mut self, key: Key, value: Value) {
        let last_index = self.values.len();
        self.values.push(value);
        // Initially the key is placed placed at the very end, will be placed in the correct
        // position below to ensure a valid heap structure
        let _ = self.map_key_to_position.push(last_index);
        self.map_position_to_key.push(key);
        propel_assert_moderate!(
            self.map_position_to_key[last_index].index() == key.index()
                && self.map_key_to_position[key] == last_index
        );
        self.swap_positions(self.end_position, last_index);
        self.end_position += 1;
        self.sift_up(self.end_position - 1);
    }

    /// (Temporarily) removes every key from the heap; the recorded values are kept.
    ///
    /// The run-time complexity of this operation is O(1)
    pub fn delete_all(&mut self) {
        self.end_position = 0;
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        let key_i = self.map_position_to_key[a];
        propel_assert_moderate!(self.map_key_to_position[key_i] == a);
        let key_j = self.map_position_to_key[b];
        propel_assert_moderate!(self.map_key_to_position[key_j] == b);

        self.values.swap(a, b);
        self.map_position_to_key.swap(a, b);
        self.map_key_to_position.swap(key_i.index(), key_j.index());

        propel_assert_moderate!(
            self.map_key_to_position[key_i] == b && self.map_key_to_position[key_j] == a
        );
    }

    /// Whether the entry at position `a` should be served before the entry at position `b`.
    fn precedes(&self, a: usize, b: usize) -> bool {
        self.values[a] > self.values[b]
            || (self.values[a] == self.values[b]
                && self.map_position_to_key[a].index() < self.map_position_to_key[b].index())
    }

    fn sift_up(&mut self, position: usize) {
        // Only sift up if not at the root
        if position > 0 {
            let parent_position = Self::get_parent_position(position);
            // Continue sift up if the heap property is violated
            if self.precedes(position, parent_position) {
                self.swap_positions(parent_position, position);
                self.sift_up(parent_position);
            }
        }
    }

    fn sift_down(&mut self, position: usize) {
        propel_assert_moderate!(position < self.end_position);

        if !self.is_heap_locally(position) {
            let best_child_position = self.get_best_child_position(position);
            self.swap_positions(best_child_position, position);
            self.sift_down(best_child_position);
        }
    }

    fn is_heap_locally(&self, position: usize) -> bool {
        // Either the node is a leaf, or it satisfies the heap property (the parent precedes its
        // children)
        if self.is_leaf(position) {
            return true;
        }

        let left_child_position = Self::get_left_child_position(position);
        let right_child_position = Self::get_right_child_position(position);

        // if does not have right child, then just compare with left child.
        if right_child_position >= self.end_position {
            return self.precedes(position, left_child_position);
        }

        // Otherwise the node has two children, compare with both.
        self.precedes(position, left_child_position)
            && self.precedes(position, right_child_position)
    }

    fn is_leaf(&self, position: usize) -> bool {
        Self::get_left_child_position(position) >= self.end_position
    }

    fn get_best_child_position(&self, position: usize) -> usize {
        propel_assert_moderate!(!self.is_leaf(position));

        let left_child_position = Self::get_left_child_position(position);
        let right_child_position = Self::get_right_child_position(position);

        if right_child_position < self.end_position
            && self.precedes(right_child_position, left_child_position)
        {
            right_child_position
        } else {
            left_child_position
        }
    }

    fn get_parent_position(child_position: usize) -> usize {
        propel_assert_moderate!(child_position > 0, "Root has no parent.");
        (child_position - 1) / 2
    }

    fn get_left_child_position(position: usize) -> usize {
        2 * position + 1
    }

    fn get_right_child_position(position: usize) -> usize {
        2 * position + 2
    }
}
