use super::KeyedVec;
use super::StorageKey;

/// Maps the (possibly sparse) identifiers of externally owned objects onto a compact index range.
///
/// The map is built once from the identifiers which are known at construction time; it covers the
/// range `[min_id, max_id]` with a flat vector so that lookups never hash.
#[derive(Debug, Clone)]
pub struct DenseIdMap<Index> {
    offset: u32,
    indices: Vec<Option<Index>>,
}

impl<Index> Default for DenseIdMap<Index> {
    fn default() -> Self {
        Self {
            offset: 0,
            indices: Vec::new(),
        }
    }
}

impl<Index: StorageKey + Copy> DenseIdMap<Index> {
    /// Create the map for the provided identifiers; the `i`-th identifier is mapped onto index `i`.
    ///
    /// Identifiers are expected to be unique.
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        let ids = ids.into_iter().collect::<Vec<_>>();
        let Some(min_id) = ids.iter().copied().min() else {
            return Self::default();
        };
        let max_id = ids.iter().copied().max().unwrap_or(min_id);

        let mut indices = vec![None; (max_id - min_id) as usize + 1];
        for (index, id) in ids.into_iter().enumerate() {
            let slot = &mut indices[(id - min_id) as usize];
            crate::propel_assert_simple!(slot.is_none(), "identifier {id} occurs more than once");
            *slot = Some(Index::create_from_index(index));
        }

        Self {
            offset: min_id,
            indices,
        }
    }

    /// The index of `id`, or `None` when the identifier was not known at construction.
    pub fn get(&self, id: u32) -> Option<Index> {
        let position = id.checked_sub(self.offset)? as usize;
        self.indices.get(position).copied().flatten()
    }

    /// The number of identifiers which are mapped.
    pub fn len(&self) -> usize {
        self.indices.iter().filter(|index| index.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.iter().all(Option::is_none)
    }

    /// Create a [`KeyedVec`] which holds `value` for every mapped index.
    pub fn new_keyed_vec<Value: Clone>(&self, value: Value) -> KeyedVec<Index, Value> {
        KeyedVec::with_len(self.len(), value)
    }
}
