use std::fmt;

use crate::{
    AssociativeMap,
    chain::Chain,
    cursor::BucketCursor,
    entry::Entry,
    hashing::{HashFn, next_prime},
};

/// A hash table resolving collisions by separate chaining.
///
/// Every bucket is a singly linked chain kept sorted ascending by key, so a
/// lookup stops at the first node whose key is not smaller than the target.
/// The bucket count is the smallest prime not below the requested size and
/// never changes after construction.
///
/// The hash function maps `(key, bucket_count)` to a bucket index. Indices are
/// reduced modulo the bucket count before use.
pub struct ChainedHashMap<K, V, H = HashFn<K>> {
    /// The buckets, each an ordered chain of entries
    buckets: Vec<Chain<Entry<K, V>>>,
    /// Number of entries across all buckets
    count: usize,
    /// The hash function selecting a bucket for a key
    hash: H,
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for ChainedHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashMap")
            .field("bucket_count", &self.buckets.len())
            .field("count", &self.count)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<K: Clone, V: Clone, H: Clone> Clone for ChainedHashMap<K, V, H> {
    fn clone(&self) -> Self {
        Self { buckets: self.buckets.clone(), count: self.count, hash: self.hash.clone() }
    }
}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: Ord,
    H: Fn(&K, usize) -> usize,
{
    /// Creates a map with `next_prime(size)` buckets
    #[must_use]
    pub fn new(size: usize, hash: H) -> Self {
        let bucket_count = next_prime(size);
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Chain::new);

        Self { buckets, count: 0, hash }
    }

    /// Computes the bucket index for a key
    fn bucket_index(&self, key: &K) -> usize {
        let bucket_count = self.buckets.len();
        (self.hash)(key, bucket_count).checked_rem(bucket_count).unwrap_or(0)
    }

    /// Inserts a key-value pair, keeping the bucket sorted.
    ///
    /// If the key is already present its value is replaced and the old value
    /// returned; the count is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let bucket = self.buckets.get_mut(index)?;

        if bucket.is_empty() {
            bucket.push_front(Entry::new(key, value));
            self.count = self.count.saturating_add(1);
            return None;
        }

        let (prev, candidate) = bucket.seek(|entry| *entry.key() < key);
        let existing = candidate.and_then(|id| bucket.get_mut(id)).filter(|entry| *entry.key() == key);
        if let Some(entry) = existing {
            return Some(entry.replace_value(value));
        }

        bucket.insert_after(prev, Entry::new(key, value));
        self.count = self.count.saturating_add(1);
        None
    }

    /// Returns a reference to the value stored for `key`
    pub fn find(&self, key: &K) -> Option<&V> {
        let bucket = self.buckets.get(self.bucket_index(key))?;
        let (_, candidate) = bucket.seek(|entry| entry.key() < key);
        candidate
            .and_then(|id| bucket.get(id))
            .filter(|entry| entry.key() == key)
            .map(Entry::value)
    }

    /// Returns a mutable reference to the value stored for `key`
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        let bucket = self.buckets.get_mut(index)?;
        let (_, candidate) = bucket.seek(|entry| entry.key() < key);
        candidate
            .and_then(|id| bucket.get_mut(id))
            .filter(|entry| entry.key() == key)
            .map(Entry::value_mut)
    }

    /// Overwrites the value of an existing key.
    ///
    /// Absent keys are ignored: `update` never grows the map. Returns true if a
    /// value was overwritten.
    pub fn update(&mut self, key: &K, value: V) -> bool {
        self.find_mut(key).map(|slot| *slot = value).is_some()
    }

    /// Removes a key, returning its value if it was present
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let bucket = self.buckets.get_mut(index)?;
        let (prev, candidate) = bucket.seek(|entry| entry.key() < key);

        let found = candidate.and_then(|id| bucket.get(id)).is_some_and(|entry| entry.key() == key);
        if !found {
            return None;
        }

        let entry = bucket.remove_after(prev)?;
        self.count = self.count.saturating_sub(1);
        Some(entry.into_pair().1)
    }

    /// Returns a copy of the stored value, or the default value when `key` is
    /// absent
    #[must_use]
    pub fn get(&self, key: &K) -> V
    where
        V: Default + Clone,
    {
        self.find(key).cloned().unwrap_or_default()
    }

    /// Returns a mutable reference to the value of `key`, inserting the default
    /// value first if the key is absent
    ///
    /// # Panics
    ///
    /// Never in practice: bucket indices are reduced modulo the bucket count and
    /// the node handle comes from the chain it is looked up in.
    #[allow(clippy::expect_used)]
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let index = self.bucket_index(&key);
        let bucket = self.buckets.get_mut(index).expect("bucket index is within range");
        let (prev, candidate) = bucket.seek(|entry| *entry.key() < key);

        let existing = candidate.filter(|&id| bucket.get(id).is_some_and(|e| *e.key() == key));
        let id = existing.unwrap_or_else(|| {
            self.count = self.count.saturating_add(1);
            bucket.insert_after(prev, Entry::new(key, V::default()))
        });
        bucket.get_mut(id).expect("node handle is live").value_mut()
    }

    /// Returns true if the map holds `key`
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }
}

impl<K, V, H> ChainedHashMap<K, V, H> {
    /// Returns the number of entries
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Empties every bucket. The bucket array itself is kept.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.count = 0;
    }

    /// Returns the entries of one bucket in ascending key order, or `None` if
    /// `index` is out of range
    #[must_use]
    pub fn bucket(&self, index: usize) -> Option<impl Iterator<Item = (&K, &V)>> {
        self.buckets.get(index).map(|bucket| bucket.iter().map(Entry::as_pair))
    }

    /// Returns an iterator over all entries, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flat_map(Chain::iter).map(Entry::as_pair)
    }

    /// Returns a cursor positioned at the first entry of the table
    pub fn cursor(&mut self) -> BucketCursor<'_, K, V, H> {
        BucketCursor::new(self)
    }

    /// Gives the cursor read access to the buckets
    pub(crate) fn buckets(&self) -> &[Chain<Entry<K, V>>] {
        &self.buckets
    }

    /// Gives the cursor write access to the buckets
    pub(crate) fn buckets_mut(&mut self) -> &mut [Chain<Entry<K, V>>] {
        &mut self.buckets
    }
}

impl<K, V, H> Extend<(K, V)> for ChainedHashMap<K, V, H>
where
    K: Ord,
    H: Fn(&K, usize) -> usize,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, H> AssociativeMap<K, V> for ChainedHashMap<K, V, H>
where
    K: Ord,
    H: Fn(&K, usize) -> usize,
{
    fn insert(&mut self, key: K, value: V) {
        Self::insert(self, key, value);
    }

    fn update(&mut self, key: &K, value: V) -> bool {
        Self::update(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Self::remove(self, key)
    }

    fn find(&self, key: &K) -> Option<&V> {
        Self::find(self, key)
    }

    fn count(&self) -> usize {
        self.count
    }
}

impl<K: fmt::Display, V: fmt::Display, H> fmt::Display for ChainedHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, bucket) in self.buckets.iter().enumerate() {
            write!(f, "| {index} |")?;
            for entry in bucket.iter() {
                write!(f, " {entry} ->")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::modulo;

    fn new_map() -> ChainedHashMap<u32, String> {
        let hash: HashFn<u32> = modulo;
        ChainedHashMap::new(11, hash)
    }

    fn bucket_keys(map: &ChainedHashMap<u32, String>, index: usize) -> Vec<u32> {
        map.bucket(index).map(|entries| entries.map(|(k, _)| *k).collect()).unwrap_or_default()
    }

    #[test]
    fn test_bucket_count_is_prime() {
        assert_eq!(new_map().bucket_count(), 11);
        assert_eq!(ChainedHashMap::<u32, u32>::new(10, modulo).bucket_count(), 11);
        assert_eq!(ChainedHashMap::<u32, u32>::new(0, modulo).bucket_count(), 2);
        assert_eq!(ChainedHashMap::<u32, u32>::new(100, modulo).bucket_count(), 101);
    }

    #[test]
    fn test_insert_and_find() {
        let mut map = new_map();
        assert_eq!(map.insert(179, "Mashkov".to_string()), None);
        assert_eq!(map.insert(178, "Celentano".to_string()), None);

        assert_eq!(map.find(&179), Some(&"Mashkov".to_string()));
        assert_eq!(map.find(&178), Some(&"Celentano".to_string()));
        assert_eq!(map.find(&177), None);
        assert_eq!(map.count(), 2);
    }

    #[test]
    fn test_colliding_keys_are_sorted() {
        let mut map = new_map();
        for key in [36, 14, 3, 25] {
            map.insert(key, key.to_string());
        }

        // 3, 14, 25 and 36 all land in bucket 3
        assert_eq!(bucket_keys(&map, 3), vec![3, 14, 25, 36]);
        assert_eq!(map.count(), 4);
    }

    #[test]
    fn test_collision_scenario() {
        let mut map = new_map();
        map.insert(3, "three".to_string());
        map.insert(14, "fourteen".to_string());
        assert_eq!(bucket_keys(&map, 3), vec![3, 14]);
        assert_eq!(map.find(&14), Some(&"fourteen".to_string()));

        assert_eq!(map.remove(&3), Some("three".to_string()));
        assert_eq!(map.find(&3), None);
        assert_eq!(bucket_keys(&map, 3), vec![14]);
        assert_eq!(map.count(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = new_map();
        map.insert(14, "a".to_string());
        map.insert(3, "b".to_string());
        assert_eq!(map.insert(14, "c".to_string()), Some("a".to_string()));
        assert_eq!(map.insert(3, "d".to_string()), Some("b".to_string()));

        assert_eq!(map.count(), 2);
        assert_eq!(map.find(&14), Some(&"c".to_string()));
        assert_eq!(map.find(&3), Some(&"d".to_string()));
        assert_eq!(bucket_keys(&map, 3), vec![3, 14]);
    }

    #[test]
    fn test_update_ignores_absent_keys() {
        let mut map = new_map();
        map.insert(5, "Taratorkina".to_string());

        assert!(map.update(&5, "Anna Taratorkina".to_string()));
        assert!(!map.update(&7, "Anna Taratorkina".to_string()));

        assert_eq!(map.count(), 1);
        assert_eq!(map.find(&5), Some(&"Anna Taratorkina".to_string()));
        assert_eq!(map.find(&7), None);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut map = new_map();
        map.insert(1100, "x".to_string());
        assert_eq!(map.remove(&3000), None);
        assert_eq!(map.remove(&11), None);
        assert_eq!(map.count(), 1);
    }

    #[test]
    fn test_remove_middle_and_tail() {
        let mut map = new_map();
        for key in [3, 14, 25, 36] {
            map.insert(key, key.to_string());
        }
        assert_eq!(map.remove(&25), Some("25".to_string()));
        assert_eq!(bucket_keys(&map, 3), vec![3, 14, 36]);
        assert_eq!(map.remove(&36), Some("36".to_string()));
        assert_eq!(bucket_keys(&map, 3), vec![3, 14]);

        map.insert(25, "again".to_string());
        assert_eq!(bucket_keys(&map, 3), vec![3, 14, 25]);
        assert_eq!(map.count(), 3);
    }

    #[test]
    fn test_get_returns_found_value() {
        let mut map = new_map();
        map.insert(7, "seven".to_string());
        assert_eq!(map.get(&7), "seven");
        assert_eq!(map.get(&8), String::new());
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut map = new_map();
        map.insert(179, "Mashkov".to_string());

        *map.get_or_insert_default(179) = "Vladimir Mashkoff".to_string();
        assert_eq!(map.count(), 1);
        assert_eq!(map.get(&179), "Vladimir Mashkoff");

        map.get_or_insert_default(185).push_str("Igor Ternyuk");
        assert_eq!(map.count(), 2);
        assert_eq!(map.get(&185), "Igor Ternyuk");

        assert!(map.get_or_insert_default(666).is_empty());
        assert_eq!(map.count(), 3);
        assert!(map.contains_key(&666));
    }

    #[test]
    fn test_clear_keeps_buckets() {
        let mut map = new_map();
        map.extend([(1, "a".to_string()), (2, "b".to_string()), (13, "c".to_string())]);
        assert_eq!(map.count(), 3);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.bucket_count(), 11);
        assert_eq!(map.find(&1), None);
        assert_eq!(map.iter().count(), 0);

        map.insert(13, "d".to_string());
        assert_eq!(map.find(&13), Some(&"d".to_string()));
    }

    #[test]
    fn test_iter_in_bucket_order() {
        let mut map = new_map();
        map.extend([(12, "a".to_string()), (1, "b".to_string()), (5, "c".to_string())]);
        let keys: Vec<u32> = map.iter().map(|(k, _)| *k).collect();
        // buckets 1 (keys 1, 12) then 5
        assert_eq!(keys, vec![1, 12, 5]);
    }

    #[test]
    fn test_out_of_range_hash_is_reduced() {
        let mut map: ChainedHashMap<u32, u32, _> = ChainedHashMap::new(5, |k: &u32, _| *k as usize);
        map.insert(12, 1);
        assert_eq!(map.find(&12), Some(&1));
        assert_eq!(bucket_keys_u32(&map, 2), vec![12]);
    }

    fn bucket_keys_u32<H>(map: &ChainedHashMap<u32, u32, H>, index: usize) -> Vec<u32> {
        map.bucket(index).map(|entries| entries.map(|(k, _)| *k).collect()).unwrap_or_default()
    }

    #[test]
    fn test_string_keys() {
        let mut map = ChainedHashMap::new(7, crate::hashing::shift_sum::<String>);
        map.insert("Lewis".to_string(), 116);
        map.insert("Tyson".to_string(), 109);
        assert_eq!(map.find(&"Lewis".to_string()), Some(&116));
        assert_eq!(map.get(&"Valuev".to_string()), 0);
    }

    #[test]
    fn test_display() {
        let hash: HashFn<u32> = modulo;
        let mut map: ChainedHashMap<u32, &str> = ChainedHashMap::new(2, hash);
        map.insert(1, "one");
        map.insert(3, "three");
        assert_eq!(map.to_string(), "| 0 |\n| 1 | (1, one) -> (3, three) ->\n");
    }
}
