use core::hash::Hash;
use std::collections::HashMap;
use std::vec;

/// A realized one-to-many mapping from keys to the values that produced them.
///
/// Created by [`to_lookup`][crate::query::QueryExt::to_lookup] and used
/// internally by the relational joins. Groups keep the order in which their
/// key first appeared in the source, and values within a group keep source
/// order. Looking up a key that is absent yields an empty slice rather than a
/// failure.
///
/// A `Lookup` is itself a sequence of `(key, values)` pairs, so it can be fed
/// straight back into another deferred query.
#[derive(Clone, Debug)]
pub struct Lookup<K, V> {
    groups: Vec<(K, Vec<V>)>,
    index: HashMap<K, usize>,
}

impl<K, V> Lookup<K, V>
where
    K: Hash + Eq,
{
    pub(crate) fn from_values<I, F>(values: I, mut key: F) -> Self
    where
        I: IntoIterator<Item = V>,
        F: FnMut(&V) -> K,
        K: Clone,
    {
        let mut lookup = Self {
            groups: Vec::new(),
            index: HashMap::new(),
        };
        for value in values {
            let key = key(&value);
            match lookup.index.get(&key) {
                Some(&at) => lookup.groups[at].1.push(value),
                None => {
                    lookup.index.insert(key.clone(), lookup.groups.len());
                    lookup.groups.push((key, vec![value]));
                }
            }
        }
        lookup
    }

    /// Returns the values grouped under `key`, or an empty slice if the key
    /// is absent.
    pub fn get(&self, key: &K) -> &[V] {
        self.index
            .get(key)
            .map(|&at| self.groups[at].1.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if any value was grouped under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
}

impl<K, V> Lookup<K, V> {
    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the lookup holds no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates the groups in first-appearance key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups.iter().map(|(key, values)| (key, values.as_slice()))
    }
}

impl<K, V> IntoIterator for Lookup<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = vec::IntoIter<(K, Vec<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_preserve_first_appearance_order() {
        let lookup = Lookup::from_values(vec!["apple", "avocado", "banana", "apricot"], |word| {
            word.as_bytes()[0]
        });
        let keys: Vec<u8> = lookup.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![b'a', b'b']);
        assert_eq!(lookup.get(&b'a'), ["apple", "avocado", "apricot"]);
        assert_eq!(lookup.len(), 2);
    }

    #[test]
    fn missing_keys_yield_an_empty_slice() {
        let lookup = Lookup::from_values(vec![1, 2], |n| n % 2);
        assert!(lookup.get(&7).is_empty());
        assert!(!lookup.contains_key(&7));
    }
}
