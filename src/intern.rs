use std::collections::HashMap;
use std::hash::Hash;

/// Assigns dense, first-seen indices to distinct values.
///
/// The first distinct value gets index 0, the next 1, and so on; a value's
/// index never changes once assigned, and indices are contiguous `[0..len)`.
/// The reverse mapping is kept alongside so interned values can later be
/// emitted in index order (materials and meshes depend on that ordering).
#[derive(Debug)]
pub struct InternTable<K> {
    indices: HashMap<K, usize>,
    values: Vec<K>,
}

impl<K: Clone + Eq + Hash> InternTable<K> {
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Returns the index already assigned to `value`, or assigns the next
    /// sequential one (the table size before insertion).
    pub fn intern(&mut self, value: K) -> usize {
        if let Some(&idx) = self.indices.get(&value) {
            return idx;
        }
        let idx = self.values.len();
        self.indices.insert(value.clone(), idx);
        self.values.push(value);
        idx
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Interned values in index order.
    pub fn values(&self) -> &[K] {
        &self.values
    }
}

impl<K: Clone + Eq + Hash> Default for InternTable<K> {
    fn default() -> Self {
        Self::new()
    }
}
