//! # Hashtab
//!
//! Hash tables with pluggable hash functions and two collision strategies.
//!
//! This crate provides two map implementations:
//!
//! - `ChainedHashMap`: separate chaining, every bucket a singly linked list kept
//!   in ascending key order
//! - `OpenAddressingHashMap`: a single slot array probed linearly, quadratically
//!   or by double hashing, with tombstones and growth past a maximum fill factor
//!
//! Hash functions are plain `Fn(&K, usize) -> usize` values mapping a key and a
//! table size to a slot; [`hashing`] ships the classic ones. Both maps implement
//! [`AssociativeMap`], so the backing strategy can be chosen at runtime.
//!
//! ## Separate Chaining
//!
//! ```rust
//! use hashtab::{ChainedHashMap, hashing::{HashFn, modulo}};
//!
//! let hash: HashFn<u32> = modulo;
//! let mut map = ChainedHashMap::new(11, hash);
//!
//! map.insert(14, "fourteen");
//! map.insert(3, "three");
//! map.insert(25, "twenty-five");
//!
//! // colliding keys share bucket 3 in ascending order
//! let bucket: Vec<_> = map.bucket(3).unwrap().map(|(k, _)| *k).collect();
//! assert_eq!(bucket, vec![3, 14, 25]);
//!
//! map.insert(3, "THREE");
//! assert_eq!(map.find(&3), Some(&"THREE"));
//! assert_eq!(map.count(), 3);
//!
//! map.remove(&14);
//! assert_eq!(map.find(&14), None);
//! ```
//!
//! ## Open Addressing
//!
//! ```rust
//! use hashtab::{OpenAddressingHashMap, Probing, SlotStatus, hashing::{HashFn, modulo}};
//!
//! let hash: HashFn<u32> = modulo;
//! let mut map = OpenAddressingHashMap::new(3, hash, Probing::Linear);
//! assert_eq!(map.capacity(), 7);
//!
//! map.insert(0, 'a');
//! map.insert(7, 'b');
//! map.insert(14, 'c');
//! assert_eq!(map.has(&14), Some(2));
//!
//! // removal leaves a tombstone that lookups step over
//! map.remove(&7);
//! assert_eq!(map.slot_status(1), Some(SlotStatus::Deleted));
//! assert_eq!(map.find(&14), Some(&'c'));
//! ```

/// Arena-backed singly linked list used as a bucket
mod chain;
/// Hash map with separate chaining and sorted buckets
mod chained;
/// External cursor over the buckets of a chained map
mod cursor;
/// Key-value record stored by the maps
mod entry;
/// Errors reported by map construction
mod error;
pub mod hashing;
/// The trait shared by both map implementations
mod map;
/// Hash map with open addressing
mod open_addressing;

pub use chained::ChainedHashMap;
pub use cursor::BucketCursor;
pub use entry::Entry;
pub use error::BuildError;
pub use map::AssociativeMap;
pub use open_addressing::{
    DEFAULT_MAX_FILL_FACTOR, OpenAddressingBuilder, OpenAddressingHashMap, Probing, SlotStatus,
};
