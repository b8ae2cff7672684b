//! The capability set shared by every map of this crate

/// An associative container, independent of its storage strategy.
///
/// Both [`ChainedHashMap`](crate::ChainedHashMap) and
/// [`OpenAddressingHashMap`](crate::OpenAddressingHashMap) implement this trait, so
/// callers can pick a backing strategy at runtime through
/// `Box<dyn AssociativeMap<K, V>>`.
pub trait AssociativeMap<K, V> {
    /// Inserts a key-value pair
    fn insert(&mut self, key: K, value: V);

    /// Overwrites the value of an existing key. Absent keys are ignored.
    ///
    /// Returns true if a value was overwritten.
    fn update(&mut self, key: &K, value: V) -> bool;

    /// Removes a key, returning its value if it was present
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Returns a reference to the value stored for `key`
    fn find(&self, key: &K) -> Option<&V>;

    /// Returns the number of live entries
    fn count(&self) -> usize;

    /// Returns true if the map holds no entries
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns true if the map holds `key`
    fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns a copy of the value stored for `key`, or the default value when
    /// the key is absent
    fn get(&self, key: &K) -> V
    where
        V: Default + Clone,
    {
        self.find(key).cloned().unwrap_or_default()
    }
}
