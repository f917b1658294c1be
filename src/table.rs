//! Hash-consing table.
//!
//! Every node of an algebra context lives in exactly one [`Table`]. Entries
//! are stored in a plain `Vec` indexed by [`Ref`], and a hash map from the
//! structural key back to the handle guarantees that putting an entry equal
//! to an existing one returns the existing handle instead of a new one.
//!
//! Entries are never removed: handles stay valid for the lifetime of the
//! table, which is what makes identity comparison of handles sound.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Index;

use crate::reference::Ref;

pub struct Table<E> {
    data: Vec<E>,
    index: HashMap<E, Ref>,
}

impl<E> Table<E> {
    /// Create a new table with capacity for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Table bits should be in the range 0..=31");
        Self {
            data: Vec::with_capacity(1 << bits),
            index: HashMap::with_capacity(1 << bits),
        }
    }

    /// Get the number of interned entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the reference to the entry behind the given handle.
    pub fn value(&self, r: Ref) -> &E {
        &self.data[r.index()]
    }
}

impl<E> Table<E>
where
    E: Clone + Eq + Hash,
{
    /// Find the handle of an entry equal to `value`, if present.
    pub fn find(&self, value: &E) -> Option<Ref> {
        self.index.get(value).copied()
    }

    /// Put a value into the table and return its unique handle.
    pub fn put(&mut self, value: E) -> Ref {
        if let Some(r) = self.find(&value) {
            return r;
        }

        let index = u32::try_from(self.data.len()).unwrap_or(u32::MAX);
        assert!(index < u32::MAX, "Table is full");

        let r = Ref::new(index);
        self.data.push(value.clone());
        self.index.insert(value, r);
        r
    }
}

impl<E> Index<Ref> for Table<E> {
    type Output = E;

    fn index(&self, r: Ref) -> &Self::Output {
        self.value(r)
    }
}
