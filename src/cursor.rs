use std::fmt;

use crate::{
    chain::{Chain, NodeId},
    chained::ChainedHashMap,
    entry::Entry,
};

/// External cursor over a [`ChainedHashMap`].
///
/// Walks buckets in index order and the nodes of each bucket in key order. The
/// cursor holds the map mutably, so the map cannot change under it; the only
/// mutation it allows is [`set_value`](Self::set_value) on the current entry.
///
/// ```
/// use hashtab::{ChainedHashMap, hashing::HashFn, hashing::modulo};
///
/// let hash: HashFn<u32> = modulo;
/// let mut map = ChainedHashMap::new(11, hash);
/// map.insert(185, "Igor Ternyuk");
/// map.insert(7, "Taratorkina");
///
/// let mut cursor = map.cursor();
/// while !cursor.is_end() {
///     if cursor.key() == Some(&185) {
///         cursor.set_value("Ingvarr");
///     }
///     cursor.advance();
/// }
/// assert_eq!(map.find(&185), Some(&"Ingvarr"));
/// ```
pub struct BucketCursor<'a, K, V, H> {
    /// The map being walked
    map: &'a mut ChainedHashMap<K, V, H>,
    /// Current bucket index and node, or `None` at the end of the table
    position: Option<(usize, NodeId)>,
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for BucketCursor<'_, K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketCursor")
            .field("bucket_index", &self.bucket_index())
            .field("entry", &self.entry())
            .finish_non_exhaustive()
    }
}

impl<'a, K, V, H> BucketCursor<'a, K, V, H> {
    /// Creates a cursor positioned at the first entry of the table
    pub fn new(map: &'a mut ChainedHashMap<K, V, H>) -> Self {
        let position = first_occupied(map.buckets(), 0);
        Self { map, position }
    }

    /// Moves back to the first entry of the table
    pub fn reset(&mut self) {
        self.position = first_occupied(self.map.buckets(), 0);
    }

    /// Moves to the next entry: the successor in the current bucket, else the
    /// head of the next non-empty bucket. Does nothing at the end of the table.
    pub fn advance(&mut self) {
        let Some((bucket_index, node)) = self.position else {
            return;
        };
        let buckets = self.map.buckets();
        self.position = match buckets.get(bucket_index).and_then(|bucket| bucket.next(node)) {
            Some(next) => Some((bucket_index, next)),
            None => first_occupied(buckets, bucket_index.saturating_add(1)),
        };
    }

    /// Returns true once every entry has been visited
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.position.is_none()
    }

    /// Returns the index of the bucket holding the current entry
    #[must_use]
    pub fn bucket_index(&self) -> Option<usize> {
        self.position.map(|(bucket_index, _)| bucket_index)
    }

    /// Returns the current entry
    #[must_use]
    pub fn entry(&self) -> Option<&Entry<K, V>> {
        let (bucket_index, node) = self.position?;
        self.map.buckets().get(bucket_index)?.get(node)
    }

    /// Returns the key of the current entry
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.entry().map(Entry::key)
    }

    /// Returns the value of the current entry
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.entry().map(Entry::value)
    }

    /// Replaces the value of the current entry, returning the old one.
    ///
    /// Key order and the entry count are unchanged. Returns `None` at the end of
    /// the table.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        let (bucket_index, node) = self.position?;
        let entry = self.map.buckets_mut().get_mut(bucket_index)?.get_mut(node)?;
        Some(entry.replace_value(value))
    }
}

/// Finds the head of the first non-empty bucket at or after `start`
fn first_occupied<T>(buckets: &[Chain<T>], start: usize) -> Option<(usize, NodeId)> {
    buckets
        .iter()
        .enumerate()
        .skip(start)
        .find_map(|(index, bucket)| bucket.head().map(|head| (index, head)))
}

#[cfg(test)]
mod tests {
    use crate::{
        ChainedHashMap,
        hashing::{HashFn, modulo},
    };

    fn new_map(keys: &[u32]) -> ChainedHashMap<u32, String> {
        let hash: HashFn<u32> = modulo;
        let mut map = ChainedHashMap::new(11, hash);
        for &key in keys {
            map.insert(key, key.to_string());
        }
        map
    }

    #[test]
    fn test_empty_table_starts_at_end() {
        let mut map = new_map(&[]);
        let mut cursor = map.cursor();
        assert!(cursor.is_end());
        assert_eq!(cursor.key(), None);
        assert_eq!(cursor.bucket_index(), None);
        assert_eq!(cursor.set_value("x".to_string()), None);
        cursor.advance();
        assert!(cursor.is_end());
    }

    #[test]
    fn test_visits_every_entry_in_bucket_order() {
        let mut map = new_map(&[14, 3, 5, 21, 10, 25]);
        let expected = map.count();
        let mut cursor = map.cursor();

        let mut visited = Vec::new();
        let mut buckets = Vec::new();
        while !cursor.is_end() {
            visited.extend(cursor.key().copied());
            buckets.extend(cursor.bucket_index());
            cursor.advance();
        }

        // bucket 3: 3, 14, 25; bucket 5: 5; bucket 10: 10, 21
        assert_eq!(visited, vec![3, 14, 25, 5, 10, 21]);
        assert_eq!(buckets, vec![3, 3, 3, 5, 10, 10]);
        assert_eq!(visited.len(), expected);
    }

    #[test]
    fn test_set_value() {
        let mut map = new_map(&[185, 7, 179]);
        let mut cursor = map.cursor();
        while !cursor.is_end() {
            if cursor.key() == Some(&185) {
                assert_eq!(cursor.set_value("Ingvarr".to_string()), Some("185".to_string()));
            }
            cursor.advance();
        }

        assert_eq!(map.find(&185), Some(&"Ingvarr".to_string()));
        assert_eq!(map.find(&7), Some(&"7".to_string()));
        assert_eq!(map.count(), 3);
    }

    #[test]
    fn test_reset() {
        let mut map = new_map(&[1, 2]);
        let mut cursor = map.cursor();
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_end());

        cursor.reset();
        assert_eq!(cursor.key(), Some(&1));
        assert_eq!(cursor.value(), Some(&"1".to_string()));
        assert_eq!(cursor.entry().map(|e| *e.key()), Some(1));
    }
}
