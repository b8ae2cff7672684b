use std::{fmt, iter, mem};

use crate::{
    AssociativeMap,
    entry::Entry,
    error::BuildError,
    hashing::{HashFn, next_prime},
};

/// Fill factor above which the table grows, unless configured otherwise
pub const DEFAULT_MAX_FILL_FACTOR: f64 = 0.7;

/// Requested size used by [`OpenAddressingBuilder`] when none is given
const DEFAULT_SIZE: usize = 16;

/// Lowest fill factor accepted by [`OpenAddressingHashMap::set_max_fill_factor`]
const MIN_FILL_FACTOR_SETTING: f64 = 0.05;

/// Highest fill factor accepted by [`OpenAddressingHashMap::set_max_fill_factor`]
const MAX_FILL_FACTOR_SETTING: f64 = 0.95;

/// Collision resolution policy of an [`OpenAddressingHashMap`].
///
/// After a failed probe, move number `i` (starting at 1) advances the index by:
/// - `Linear`: 1
/// - `Quadratic`: `floor(i^2 / 2)`
/// - `DoubleHashing(secondary)`: `secondary(key, capacity) * i`
///
/// A secondary hash that is zero modulo the capacity is treated as 1 so the
/// sequence always moves.
pub enum Probing<K> {
    /// Step to the next slot
    Linear,
    /// Step by `floor(i^2 / 2)` on move `i`
    Quadratic,
    /// Step by a multiple of a second, key-dependent hash
    DoubleHashing(HashFn<K>),
}

impl<K> Clone for Probing<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Probing<K> {}

impl<K> fmt::Debug for Probing<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::Quadratic => f.write_str("Quadratic"),
            Self::DoubleHashing(_) => f.write_str("DoubleHashing"),
        }
    }
}

impl<K> Probing<K> {
    /// Returns the step taken by move `attempt` of the probe sequence for `key`
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn step(&self, key: &K, attempt: usize, capacity: usize) -> usize {
        // u128 keeps attempt^2 and secondary * attempt exact for any usize input
        let modulus = capacity as u128;
        let attempt = attempt as u128;
        let step = match self {
            Self::Linear => 1,
            Self::Quadratic => attempt * attempt / 2,
            Self::DoubleHashing(secondary) => {
                let base = secondary(key, capacity).checked_rem(capacity).unwrap_or(0).max(1);
                base as u128 * attempt
            }
        };
        step.checked_rem(modulus).map_or(0, |step| step as usize)
    }
}

/// Status of a slot, as exposed by [`OpenAddressingHashMap::slot_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Never written since the table was (re)built
    Empty,
    /// Holds a live entry
    Occupied,
    /// Held an entry that was removed (tombstone)
    Deleted,
}

/// A single cell of the table
#[derive(Debug, Clone)]
enum Slot<K, V> {
    /// Never written since the table was (re)built
    Empty,
    /// Holds a live entry
    Occupied(Entry<K, V>),
    /// Tombstone left by a removal
    Deleted,
}

impl<K, V> Slot<K, V> {
    /// Returns the status tag of the slot
    const fn status(&self) -> SlotStatus {
        match self {
            Self::Empty => SlotStatus::Empty,
            Self::Occupied(_) => SlotStatus::Occupied,
            Self::Deleted => SlotStatus::Deleted,
        }
    }

    /// Returns the entry of an occupied slot
    const fn entry(&self) -> Option<&Entry<K, V>> {
        match self {
            Self::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns the value of an occupied slot mutably
    const fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Self::Occupied(entry) => Some(entry.value_mut()),
            _ => None,
        }
    }
}

/// Allocates `capacity` empty slots
fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

/// A hash table resolving collisions by open addressing.
///
/// Entries live in a single slot array whose capacity starts at the smallest
/// prime not below twice the requested size. Removal leaves a tombstone
/// ([`SlotStatus::Deleted`]) that lookups skip and insertions never reuse.
/// Tombstones count toward the fill factor; once it exceeds the maximum after
/// an insertion, the table doubles and every live entry is rehashed, which
/// reclaims all tombstones.
///
/// `insert` does not look for an existing copy of the key: inserting a key
/// twice stores two live entries, and lookups return the one met first along
/// the probe sequence. Use [`update`](Self::update) or
/// [`get_or_insert_default`](Self::get_or_insert_default) to overwrite.
///
/// Since tombstones are only reclaimed by growth, a workload that keeps
/// inserting and removing keys grows the capacity even when the number of live
/// entries stays small. [`clear`](Self::clear) resets the slots without
/// shrinking.
pub struct OpenAddressingHashMap<K, V, H = HashFn<K>> {
    /// The slot array
    slots: Vec<Slot<K, V>>,
    /// Number of occupied slots
    count: usize,
    /// Number of non-empty slots (occupied plus tombstones)
    used: usize,
    /// Fill factor above which the table grows
    max_fill_factor: f64,
    /// The collision resolution policy
    probing: Probing<K>,
    /// The primary hash function selecting the first slot of a probe sequence
    hash: H,
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for OpenAddressingHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAddressingHashMap")
            .field("slots", &self.slots)
            .field("count", &self.count)
            .field("used", &self.used)
            .field("max_fill_factor", &self.max_fill_factor)
            .field("probing", &self.probing)
            .finish_non_exhaustive()
    }
}

impl<K: Clone, V: Clone, H: Clone> Clone for OpenAddressingHashMap<K, V, H> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            count: self.count,
            used: self.used,
            max_fill_factor: self.max_fill_factor,
            probing: self.probing,
            hash: self.hash.clone(),
        }
    }
}

impl<K, V, H> OpenAddressingHashMap<K, V, H>
where
    K: Eq,
    H: Fn(&K, usize) -> usize,
{
    /// Creates a table of `next_prime(2 * size)` slots with the default maximum
    /// fill factor
    #[must_use]
    pub fn new(size: usize, hash: H, probing: Probing<K>) -> Self {
        Self::with_parameters(size, DEFAULT_MAX_FILL_FACTOR, probing, hash)
    }

    /// Creates a table from already validated parameters
    fn with_parameters(size: usize, max_fill_factor: f64, probing: Probing<K>, hash: H) -> Self {
        let capacity = next_prime(size.saturating_mul(2));
        Self { slots: empty_slots(capacity), count: 0, used: 0, max_fill_factor, probing, hash }
    }

    /// Computes the first slot of the probe sequence for a key
    fn home_slot(&self, key: &K) -> usize {
        let capacity = self.slots.len();
        (self.hash)(key, capacity).checked_rem(capacity).unwrap_or(0)
    }

    /// Returns the slots visited for `key`, home slot first, at most `capacity`
    /// of them
    fn probe_sequence<'a>(&'a self, key: &'a K) -> impl Iterator<Item = usize> + 'a {
        let capacity = self.slots.len();
        let start = self.home_slot(key);
        let moves = (1..capacity).scan(start, move |index, attempt| {
            let step = self.probing.step(key, attempt, capacity);
            *index = index.wrapping_add(step).checked_rem(capacity).unwrap_or(0);
            Some(*index)
        });
        iter::once(start).chain(moves)
    }

    /// Follows the probe sequence for `key`.
    ///
    /// Returns the slot holding the key, if found, and the number of slots
    /// inspected.
    fn probe(&self, key: &K) -> (Option<usize>, usize) {
        let mut inspected = 0_usize;
        for index in self.probe_sequence(key) {
            inspected = inspected.saturating_add(1);
            match self.slots.get(index) {
                None | Some(Slot::Empty) => return (None, inspected),
                Some(Slot::Occupied(entry)) if entry.key() == key => {
                    return (Some(index), inspected);
                }
                Some(_) => {}
            }
        }
        (None, inspected)
    }

    /// Returns the slot holding `key`.
    ///
    /// Stops at the first empty slot; tombstones are skipped.
    #[must_use]
    pub fn has(&self, key: &K) -> Option<usize> {
        self.probe(key).0
    }

    /// Returns how many slots a lookup of `key` inspects
    #[must_use]
    pub fn probe_length(&self, key: &K) -> usize {
        self.probe(key).1
    }

    /// Returns the first empty slot along the probe sequence of `key`
    fn vacant_slot(&self, key: &K) -> Option<usize> {
        self.probe_sequence(key)
            .find(|&index| matches!(self.slots.get(index), Some(Slot::Empty)))
    }

    /// Stores an entry in the first empty slot of its probe sequence, growing
    /// the table if the sequence has none. Returns the slot used.
    fn place(&mut self, entry: Entry<K, V>) -> usize {
        loop {
            let vacant = self
                .vacant_slot(entry.key())
                .and_then(|index| Some((index, self.slots.get_mut(index)?)));
            if let Some((index, slot)) = vacant {
                *slot = Slot::Occupied(entry);
                self.count = self.count.saturating_add(1);
                self.used = self.used.saturating_add(1);
                return index;
            }
            log::trace!("probe sequence exhausted at capacity {}", self.slots.len());
            self.grow();
        }
    }

    /// Doubles the capacity and rehashes every live entry. Tombstones are
    /// dropped.
    fn grow(&mut self) {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity.saturating_mul(2);
        let old_slots = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.count = 0;
        self.used = 0;

        for slot in old_slots {
            if let Slot::Occupied(entry) = slot {
                self.place(entry);
            }
        }
        log::debug!(
            "grew table from {old_capacity} to {} slots, {} live entries",
            self.slots.len(),
            self.count
        );
    }

    /// Inserts a key-value pair into the first empty slot of its probe
    /// sequence, then grows the table if the fill factor exceeds the maximum.
    ///
    /// An existing entry for the same key is not replaced.
    pub fn insert(&mut self, key: K, value: V) {
        self.place(Entry::new(key, value));
        if self.fill_factor() > self.max_fill_factor {
            self.grow();
        }
    }

    /// Returns a reference to the value stored for `key`
    pub fn find(&self, key: &K) -> Option<&V> {
        let index = self.has(key)?;
        self.slots.get(index).and_then(Slot::entry).map(Entry::value)
    }

    /// Returns a mutable reference to the value stored for `key`
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.has(key)?;
        self.slots.get_mut(index).and_then(Slot::value_mut)
    }

    /// Overwrites the value of an existing key. Absent keys are ignored.
    ///
    /// Returns true if a value was overwritten.
    pub fn update(&mut self, key: &K, value: V) -> bool {
        self.find_mut(key).map(|slot| *slot = value).is_some()
    }

    /// Removes a key, leaving a tombstone in its slot, and returns its value.
    ///
    /// The capacity never shrinks.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.has(key)?;
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Deleted) {
            Slot::Occupied(entry) => {
                self.count = self.count.saturating_sub(1);
                Some(entry.into_pair().1)
            }
            other => {
                *slot = other;
                None
            }
        }
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
    /// value first if the key is absent.
    ///
    /// When an insertion would push the fill factor over the maximum, the table
    /// grows before the entry is placed.
    ///
    /// # Panics
    ///
    /// Never in practice: the slot index comes from probing the current table.
    #[allow(clippy::expect_used, clippy::cast_precision_loss)]
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let existing = self.has(&key);
        let index = existing.unwrap_or_else(|| {
            let fill_after = self.used.saturating_add(1) as f64 / self.slots.len() as f64;
            if fill_after > self.max_fill_factor {
                self.grow();
            }
            self.place(Entry::new(key, V::default()))
        });
        self.slots
            .get_mut(index)
            .and_then(Slot::value_mut)
            .expect("slot located by probing is occupied")
    }

    /// Returns true if the map holds `key`
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.has(key).is_some()
    }
}

impl<K, V, H> OpenAddressingHashMap<K, V, H> {
    /// Returns the number of live entries
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of live entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the map holds no live entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the share of non-empty slots, tombstones included
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_factor(&self) -> f64 {
        match self.slots.len() {
            0 => 0.0,
            capacity => self.used as f64 / capacity as f64,
        }
    }

    /// Returns the fill factor above which the table grows
    #[must_use]
    pub const fn max_fill_factor(&self) -> f64 {
        self.max_fill_factor
    }

    /// Sets the fill factor above which the table grows, clamped to
    /// `[0.05, 0.95]`. Takes effect on the next insertion.
    pub fn set_max_fill_factor(&mut self, max_fill_factor: f64) {
        self.max_fill_factor = max_fill_factor.clamp(MIN_FILL_FACTOR_SETTING, MAX_FILL_FACTOR_SETTING);
    }

    /// Returns the collision resolution policy
    #[must_use]
    pub const fn probing(&self) -> Probing<K> {
        self.probing
    }

    /// Returns the status of the slot at `index`
    #[must_use]
    pub fn slot_status(&self, index: usize) -> Option<SlotStatus> {
        self.slots.get(index).map(Slot::status)
    }

    /// Returns the entry stored in the slot at `index`, if it is occupied
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<(&K, &V)> {
        self.slots.get(index).and_then(Slot::entry).map(Entry::as_pair)
    }

    /// Returns an iterator over the live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().filter_map(Slot::entry).map(Entry::as_pair)
    }

    /// Resets every slot to empty. The capacity is unchanged.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.count = 0;
        self.used = 0;
    }
}

impl<K, V, H> Extend<(K, V)> for OpenAddressingHashMap<K, V, H>
where
    K: Eq,
    H: Fn(&K, usize) -> usize,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, H> AssociativeMap<K, V> for OpenAddressingHashMap<K, V, H>
where
    K: Eq,
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

impl<K: fmt::Display, V: fmt::Display, H> fmt::Display for OpenAddressingHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "| {index} | <empty>")?,
                Slot::Occupied(entry) => writeln!(f, "| {index} | {entry}")?,
                Slot::Deleted => writeln!(f, "| {index} | <deleted>")?,
            }
        }
        Ok(())
    }
}

/// Builder for an [`OpenAddressingHashMap`] with a validated configuration.
///
/// ```
/// use hashtab::{OpenAddressingBuilder, OpenAddressingHashMap, Probing, hashing};
///
/// let map: OpenAddressingHashMap<String, f64, _> =
///     OpenAddressingBuilder::new(hashing::shift_sum::<String>)
///         .size(10)
///         .probing(Probing::Quadratic)
///         .max_fill_factor(0.8)
///         .build()
///         .unwrap();
/// assert_eq!(map.capacity(), 23);
/// ```
pub struct OpenAddressingBuilder<K, H> {
    /// Requested size; the capacity becomes `next_prime(2 * size)`
    size: usize,
    /// Fill factor above which the table grows
    max_fill_factor: f64,
    /// The collision resolution policy
    probing: Probing<K>,
    /// The primary hash function
    hash: H,
}

impl<K, H> fmt::Debug for OpenAddressingBuilder<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAddressingBuilder")
            .field("size", &self.size)
            .field("max_fill_factor", &self.max_fill_factor)
            .field("probing", &self.probing)
            .finish_non_exhaustive()
    }
}

impl<K, H> OpenAddressingBuilder<K, H> {
    /// Creates a builder with linear probing, a size of 16 and the default
    /// maximum fill factor
    #[must_use]
    pub const fn new(hash: H) -> Self {
        Self {
            size: DEFAULT_SIZE,
            max_fill_factor: DEFAULT_MAX_FILL_FACTOR,
            probing: Probing::Linear,
            hash,
        }
    }

    /// Sets the requested size
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the fill factor above which the table grows
    #[must_use]
    pub fn max_fill_factor(mut self, max_fill_factor: f64) -> Self {
        self.max_fill_factor = max_fill_factor;
        self
    }

    /// Sets the collision resolution policy
    #[must_use]
    pub fn probing(mut self, probing: Probing<K>) -> Self {
        self.probing = probing;
        self
    }

    /// Builds the map.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ZeroSize`] if the size is zero and
    /// [`BuildError::InvalidFillFactor`] if the maximum fill factor is not
    /// within `(0, 1)`.
    pub fn build<V>(self) -> Result<OpenAddressingHashMap<K, V, H>, BuildError>
    where
        K: Eq,
        H: Fn(&K, usize) -> usize,
    {
        if self.size == 0 {
            return Err(BuildError::ZeroSize);
        }
        if self.max_fill_factor > 0.0 && self.max_fill_factor < 1.0 {
            Ok(OpenAddressingHashMap::with_parameters(
                self.size,
                self.max_fill_factor,
                self.probing,
                self.hash,
            ))
        } else {
            Err(BuildError::InvalidFillFactor(self.max_fill_factor))
        }
    }
}
