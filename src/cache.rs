//! Memoization caches for diagram operations.
//!
//! Caches are backed by [`HashMap`] and never evict: node handles are stable
//! for the lifetime of the algebra context, so a memoized result stays valid
//! forever and the caches simply grow with the work done.

use std::collections::HashMap;
use std::hash::Hash;

use crate::reference::Ref;

/// Key of a memoized node-to-node operation.
///
/// Commutative operations are keyed by their operands in ascending handle
/// order, so `Or(a, b)` and `Or(b, a)` share a single entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    Or(Ref, Ref),
    And(Ref, Ref),
    Not(Ref),
    ShiftRight(Ref),
    ShiftLeft(Ref, u32),
}

impl OpKey {
    pub fn or(a: Ref, b: Ref) -> Self {
        if a <= b {
            OpKey::Or(a, b)
        } else {
            OpKey::Or(b, a)
        }
    }

    pub fn and(a: Ref, b: Ref) -> Self {
        if a <= b {
            OpKey::And(a, b)
        } else {
            OpKey::And(b, a)
        }
    }
}

/// A cache backed by [`HashMap`] that counts hits and misses.
pub struct Cache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> Cache<K, V> {
    /// Create a new cache with initial capacity for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits should be in the range 0..=31");
        Self {
            map: HashMap::with_capacity(1 << bits),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq,
{
    /// Looks up a key in the cache.
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts a key-value pair into the cache.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}
