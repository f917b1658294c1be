//! Cardinality and lexicographic extremes.
//!
//! Counts are exact [`BigUint`]s. The recursive core counts the elements of a
//! node over the bits `0..=ordinal` and is cached per node; scaling to a
//! requested width is applied outside of it, so one cache entry serves every
//! width.

use log::debug;
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::error::{AlgebraError, Result};
use crate::interval::MAX_BIT;
use crate::node::ones;
use crate::reference::Ref;

impl Bdd {
    /// Number of bit-vectors of width `max_bit + 1` in `set`.
    ///
    /// # Errors
    ///
    /// Fails with [`AlgebraError::InvalidBound`] when `max_bit` is below the ordinal of `set`.
    pub fn domain_size(&self, set: Ref, max_bit: u32) -> Result<BigUint> {
        debug!("domain_size(set = {}, max_bit = {})", set, max_bit);
        self.check_bound(set, max_bit)?;

        if self.is_empty(set) {
            return Ok(BigUint::ZERO);
        }
        if self.is_full(set) {
            return Ok(BigUint::from(1u32) << (max_bit as usize + 1));
        }

        let gap = max_bit as usize - self.ordinal(set) as usize;
        Ok(self.cardinality(set) << gap)
    }

    /// Number of elements of `r` over the bits `0..width`, where `width` is at
    /// least `ordinal(r) + 1`.
    pub(crate) fn count_below(&self, r: Ref, width: i32) -> BigUint {
        if self.is_empty(r) {
            BigUint::ZERO
        } else if self.is_full(r) {
            BigUint::from(1u32) << (width as usize)
        } else {
            let gap = (width - 1 - self.ordinal(r)) as usize;
            self.cardinality(r) << gap
        }
    }

    fn cardinality(&self, set: Ref) -> BigUint {
        if let Some(res) = self.size_cache.borrow_mut().get(&set) {
            return res.clone();
        }

        let node = self.node(set);
        let res = self.count_below(node.low, node.ordinal) + self.count_below(node.high, node.ordinal);

        self.size_cache.borrow_mut().insert(set, res.clone());
        res
    }

    /// The lexicographically largest element of `set` over bits `0..=max_bit`.
    ///
    /// # Errors
    ///
    /// Fails when `set` is empty, `max_bit` is below its ordinal, or `max_bit` exceeds 63.
    pub fn get_max(&self, set: Ref, max_bit: u32) -> Result<u64> {
        debug!("get_max(set = {}, max_bit = {})", set, max_bit);
        if self.is_empty(set) {
            return Err(AlgebraError::EmptySet);
        }
        self.check_bound(set, max_bit)?;
        if max_bit > MAX_BIT {
            return Err(AlgebraError::WidthOverflow { max_bit, limit: MAX_BIT });
        }

        let mut res = ones(max_bit + 1);
        let mut current = set;
        while !self.is_full(current) {
            let node = self.node(current);
            if self.is_empty(node.high) {
                res &= !(1u64 << node.ordinal);
                current = node.low;
            } else {
                current = node.high;
            }
        }
        Ok(res)
    }

    /// The lexicographically smallest element of `set`.
    ///
    /// # Errors
    ///
    /// Fails when `set` is empty or branches on a bit above 63.
    pub fn get_min(&self, set: Ref) -> Result<u64> {
        debug!("get_min(set = {})", set);
        if self.is_empty(set) {
            return Err(AlgebraError::EmptySet);
        }
        let ordinal = self.ordinal(set);
        if ordinal > MAX_BIT as i32 {
            return Err(AlgebraError::WidthOverflow {
                max_bit: ordinal as u32,
                limit: MAX_BIT,
            });
        }

        let mut res = 0u64;
        let mut current = set;
        while !self.is_full(current) {
            let node = self.node(current);
            if self.is_empty(node.low) {
                res |= 1u64 << node.ordinal;
                current = node.high;
            } else {
                current = node.low;
            }
        }
        Ok(res)
    }
}
