//! Insertion-ordered grouping and per-group aggregation.
//!
//! Groups come out in the order their key was first seen; members keep input
//! order. Every aggregation over an `OrderedGroups` walks the same sequence, so
//! several reducers applied in one pass agree on group and row order.

use ahash::AHashMap;
use std::hash::Hash;

/// An insertion-ordered multimap: key -> members, in first-seen key order.
#[derive(Clone, Debug)]
pub struct OrderedGroups<K, V> {
    index: AHashMap<K, usize>,
    groups: Vec<(K, Vec<V>)>,
}

impl<K: Hash + Eq + Clone, V> Default for OrderedGroups<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V> OrderedGroups<K, V> {
    pub fn new() -> Self {
        Self { index: AHashMap::new(), groups: Vec::new() }
    }

    /// Append `value` to the group for `key`, opening the group if the key is new.
    pub fn push(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].1.push(value),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![value]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl<K, V> IntoIterator for OrderedGroups<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = std::vec::IntoIter<(K, Vec<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition `items` by `key_fn`, keeping first-seen group order.
pub fn group_by<I, K, V, F>(items: I, mut key_fn: F) -> OrderedGroups<K, V>
where
    I: IntoIterator<Item = V>,
    K: Hash + Eq + Clone,
    F: FnMut(&V) -> K,
{
    let mut groups = OrderedGroups::new();
    for item in items {
        let key = key_fn(&item);
        groups.push(key, item);
    }
    groups
}

/// Fold each group into one value. The reducer sees the key and the full ordered
/// member slice; stops at the first reducer error.
pub fn aggregate<K, V, T, E, F>(groups: &OrderedGroups<K, V>, mut reducer: F) -> Result<Vec<T>, E>
where
    K: Hash + Eq + Clone,
    F: FnMut(&K, &[V]) -> Result<T, E>,
{
    groups.iter().map(|(k, members)| reducer(k, members)).collect()
}

/// Column reducers for use inside an `aggregate` closure.
pub mod reduce {
    use ahash::AHashSet;
    use std::hash::Hash;

    /// All present values in order, duplicates removed (first occurrence wins).
    pub fn concat_distinct<T, I>(values: I) -> Vec<T>
    where
        T: Hash + Eq + Clone,
        I: IntoIterator<Item = Option<T>>,
    {
        let mut seen = AHashSet::new();
        values
            .into_iter()
            .flatten()
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}
