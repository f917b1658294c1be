//! Building sets from intervals and elements.

use std::cell::RefCell;

use log::debug;

use crate::bdd::Bdd;
use crate::cache::Cache;
use crate::error::{AlgebraError, Result};
use crate::node::ones;
use crate::reference::Ref;

/// Largest bit index an interval bound can address.
pub const MAX_BIT: u32 = 63;

/// What interval construction needs from a diagram manager.
pub(crate) trait IntervalBuilder {
    fn empty(&self) -> Ref;
    fn full(&self) -> Ref;
    fn mk(&self, ordinal: i32, high: Ref, low: Ref) -> Ref;
    fn interval_cache(&self) -> &RefCell<Cache<(u32, u64, u64), Ref>>;
}

pub(crate) fn check_value(value: u64, max_bit: u32) -> Result<()> {
    if max_bit > MAX_BIT {
        return Err(AlgebraError::WidthOverflow { max_bit, limit: MAX_BIT });
    }
    if value > ones(max_bit + 1) {
        return Err(AlgebraError::ValueOutOfRange { value, max_bit });
    }
    Ok(())
}

/// Partition `[lo, hi]` over bits `bit..=0`. Both bounds must fit into `bit + 1` bits.
pub(crate) fn interval<B: IntervalBuilder + ?Sized>(b: &B, bit: u32, lo: u64, hi: u64) -> Ref {
    let key = (bit, lo, hi);
    if let Some(&res) = b.interval_cache().borrow_mut().get(&key) {
        debug!("cache: interval(bit = {}, lo = {}, hi = {}) -> {}", bit, lo, hi, res);
        return res;
    }

    let ordinal = bit as i32;
    let res = if bit == 0 {
        if hi == 0 {
            b.mk(ordinal, b.empty(), b.full())
        } else if lo == 1 {
            b.mk(ordinal, b.full(), b.empty())
        } else {
            b.full()
        }
    } else if lo == 0 && hi == ones(bit + 1) {
        b.full()
    } else {
        let mask = 1u64 << bit;
        if hi & mask == 0 {
            let low = interval(b, bit - 1, lo, hi);
            b.mk(ordinal, b.empty(), low)
        } else if lo & mask != 0 {
            let high = interval(b, bit - 1, lo & !mask, hi & !mask);
            b.mk(ordinal, high, b.empty())
        } else {
            let low = interval(b, bit - 1, lo, mask - 1);
            let high = interval(b, bit - 1, 0, hi & !mask);
            b.mk(ordinal, high, low)
        }
    };

    b.interval_cache().borrow_mut().insert(key, res);
    res
}

impl IntervalBuilder for Bdd {
    fn empty(&self) -> Ref {
        Bdd::empty(self)
    }
    fn full(&self) -> Ref {
        Bdd::full(self)
    }
    fn mk(&self, ordinal: i32, high: Ref, low: Ref) -> Ref {
        Bdd::mk(self, ordinal, high, low)
    }
    fn interval_cache(&self) -> &RefCell<Cache<(u32, u64, u64), Ref>> {
        &self.interval_cache
    }
}

impl Bdd {
    /// The set of all bit-vectors whose bits `0..=max_bit`, read as a number,
    /// lie in the closed interval `[lo, hi]`. Bits above `max_bit` are unconstrained.
    ///
    /// Returns the empty set when `hi < lo`, whatever the bounds and width.
    ///
    /// # Errors
    ///
    /// Fails when `max_bit` exceeds 63 or a bound does not fit into `max_bit + 1` bits.
    pub fn from_range(&self, lo: u64, hi: u64, max_bit: u32) -> Result<Ref> {
        debug!("from_range(lo = {}, hi = {}, max_bit = {})", lo, hi, max_bit);
        if hi < lo {
            return Ok(self.empty());
        }
        check_value(lo, max_bit)?;
        check_value(hi, max_bit)?;
        Ok(interval(self, max_bit, lo, hi))
    }

    /// The singleton `{value}` over bits `0..=max_bit`.
    pub fn from_value(&self, value: u64, max_bit: u32) -> Result<Ref> {
        self.from_range(value, value, max_bit)
    }

    /// The union of the singletons of `values` over bits `0..=max_bit`.
    ///
    /// All values are validated before any node is built.
    pub fn from_elements(&self, values: impl IntoIterator<Item = u64>, max_bit: u32) -> Result<Ref> {
        let values: Vec<u64> = values.into_iter().collect();
        debug!("from_elements(|values| = {}, max_bit = {})", values.len(), max_bit);
        for &value in values.iter() {
            check_value(value, max_bit)?;
        }

        let mut res = self.empty();
        for value in values {
            let single = interval(self, max_bit, value, value);
            res = self.apply_or(res, single);
        }
        Ok(res)
    }

    /// The singleton `{value}` over all 32 bits.
    pub fn mk_set32(&self, value: u32) -> Ref {
        interval(self, 31, value as u64, value as u64)
    }

    /// The singleton `{value}` over all 64 bits.
    pub fn mk_set64(&self, value: u64) -> Ref {
        interval(self, MAX_BIT, value, value)
    }
}
