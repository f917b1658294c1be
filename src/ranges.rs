//! Conversion of sets into sorted lists of closed intervals.
//!
//! The ranges of a node are computed over the bits `0..=ordinal` and cached
//! per node. Bits above the node's ordinal are unconstrained, so reaching a
//! wider width means replicating the node's ranges under every prefix of the
//! skipped bits ("lifting"), merging copies that touch.
//!
//! The output is minimal, which can make it huge: the set of even numbers
//! over 64 bits has 2^63 ranges. Callers should only convert sets whose range
//! count they can afford, see [`Bdd::range_count`].

use std::sync::Arc;

use log::debug;

use crate::bdd::Bdd;
use crate::error::{AlgebraError, Result};
use crate::interval::MAX_BIT;
use crate::node::ones;
use crate::reference::Ref;

/// Replicate `ranges`, which cover `width - p` bits, under all `2^p` prefixes.
fn lift(width: u32, p: u32, ranges: &[(u64, u64)]) -> Vec<(u64, u64)> {
    if p == 0 {
        return ranges.to_vec();
    }

    let k = width - p;
    let mut res: Vec<(u64, u64)> = Vec::with_capacity(ranges.len());
    for i in 0..(1u64 << p) {
        let prefix = i << k;
        for &(lo, hi) in ranges {
            let (lo, hi) = (lo | prefix, hi | prefix);
            match res.last_mut() {
                // the previous copy ends right where this one starts
                Some(last) if last.1.checked_add(1) == Some(lo) => last.1 = hi,
                _ => res.push((lo, hi)),
            }
        }
    }
    res
}

impl Bdd {
    /// The minimal sorted list of disjoint closed intervals whose union is
    /// `set` over bits `0..=max_bit`.
    ///
    /// # Errors
    ///
    /// Fails when `max_bit` is below the ordinal of `set` or exceeds 63.
    pub fn to_ranges64(&self, set: Ref, max_bit: u32) -> Result<Vec<(u64, u64)>> {
        debug!("to_ranges64(set = {}, max_bit = {})", set, max_bit);
        if max_bit > MAX_BIT {
            return Err(AlgebraError::WidthOverflow { max_bit, limit: MAX_BIT });
        }
        self.check_bound(set, max_bit)?;

        if self.is_empty(set) {
            return Ok(Vec::new());
        }
        if self.is_full(set) {
            return Ok(vec![(0, ones(max_bit + 1))]);
        }

        let ordinal = self.ordinal(set) as u32;
        let ranges = self.node_ranges(set);
        Ok(lift(max_bit + 1, max_bit - ordinal, &ranges))
    }

    /// 32-bit variant of [`to_ranges64`][Self::to_ranges64].
    ///
    /// # Errors
    ///
    /// Fails when `max_bit` is below the ordinal of `set` or exceeds 31.
    pub fn to_ranges(&self, set: Ref, max_bit: u32) -> Result<Vec<(u32, u32)>> {
        if max_bit > 31 {
            return Err(AlgebraError::WidthOverflow { max_bit, limit: 31 });
        }
        let ranges = self.to_ranges64(set, max_bit)?;
        Ok(ranges.into_iter().map(|(lo, hi)| (lo as u32, hi as u32)).collect())
    }

    /// Number of ranges [`to_ranges64`][Self::to_ranges64] returns.
    pub fn range_count(&self, set: Ref, max_bit: u32) -> Result<usize> {
        Ok(self.to_ranges64(set, max_bit)?.len())
    }

    /// Ranges of a child over the bits `0..width`.
    fn child_ranges(&self, child: Ref, width: i32) -> Vec<(u64, u64)> {
        if self.is_empty(child) {
            Vec::new()
        } else if self.is_full(child) {
            vec![(0, ones(width as u32))]
        } else {
            let p = (width - 1 - self.ordinal(child)) as u32;
            lift(width as u32, p, &self.node_ranges(child))
        }
    }

    /// Ranges of a decision node over the bits `0..=ordinal`.
    fn node_ranges(&self, set: Ref) -> Arc<[(u64, u64)]> {
        if let Some(res) = self.range_cache.borrow_mut().get(&set) {
            debug!("cache: node_ranges(set = {})", set);
            return Arc::clone(res);
        }

        let node = self.node(set);
        let mask = 1u64 << node.ordinal;
        let low = self.child_ranges(node.low, node.ordinal);
        let high = self.child_ranges(node.high, node.ordinal);

        let mut res = low;
        let mut rest = high.iter();
        if let (Some(last), Some(&(first_lo, first_hi))) = (res.last_mut(), high.first()) {
            // merge across the midpoint
            if last.1 == mask - 1 && first_lo == 0 {
                last.1 = first_hi | mask;
                rest.next();
            }
        }
        res.extend(rest.map(|&(lo, hi)| (lo | mask, hi | mask)));

        let res: Arc<[(u64, u64)]> = res.into();
        self.range_cache.borrow_mut().insert(set, Arc::clone(&res));
        res
    }
}
