//! Picking members of a set.
//!
//! Randomness comes from a [`Chooser`], which every [`rand::Rng`] already is.

use log::debug;
use num_bigint::BigUint;
use rand::Rng;

use crate::bdd::Bdd;
use crate::error::{AlgebraError, Result};
use crate::node::ones;
use crate::reference::Ref;

/// Source of uniformly distributed draws.
pub trait Chooser {
    /// A uniformly random 32-bit pattern.
    fn choose_bv32(&mut self) -> u32;
    /// A uniformly random 64-bit pattern.
    fn choose_bv64(&mut self) -> u64;
    /// A uniformly random value in `0..n`, for `n > 0`.
    fn choose(&mut self, n: u64) -> u64;
}

impl<R: Rng + ?Sized> Chooser for R {
    fn choose_bv32(&mut self) -> u32 {
        self.random()
    }

    fn choose_bv64(&mut self) -> u64 {
        self.random()
    }

    fn choose(&mut self, n: u64) -> u64 {
        self.random_range(0..n)
    }
}

/// Weights are scaled down by a common shift until both fit below this bound.
const WEIGHT_LIMIT: u64 = 0xFFFF_FFFF;

fn low_word(n: &BigUint) -> u64 {
    n.iter_u64_digits().next().unwrap_or(0)
}

impl Bdd {
    fn check_sample(&self, set: Ref, max_bit: u32, limit: u32) -> Result<()> {
        if self.is_empty(set) {
            return Err(AlgebraError::EmptySet);
        }
        self.check_bound(set, max_bit)?;
        if max_bit > limit {
            return Err(AlgebraError::WidthOverflow { max_bit, limit });
        }
        Ok(())
    }

    /// Pick a member of `set` over bits `0..=max_bit`, each with equal probability.
    ///
    /// # Errors
    ///
    /// Fails when `set` is empty, `max_bit` is below its ordinal, or `max_bit` exceeds 31.
    pub fn choose_uniformly<C>(&self, chooser: &mut C, set: Ref, max_bit: u32) -> Result<u32>
    where
        C: Chooser + ?Sized,
    {
        debug!("choose_uniformly(set = {}, max_bit = {})", set, max_bit);
        self.check_sample(set, max_bit, 31)?;

        let start = (chooser.choose_bv32() as u64) & ones(max_bit + 1);
        let res = self.descend(chooser, set, start, true);
        Ok(res as u32)
    }

    /// 64-bit variant of [`choose_uniformly`][Self::choose_uniformly].
    ///
    /// # Errors
    ///
    /// Fails when `set` is empty, `max_bit` is below its ordinal, or `max_bit` exceeds 63.
    pub fn choose_uniformly64<C>(&self, chooser: &mut C, set: Ref, max_bit: u32) -> Result<u64>
    where
        C: Chooser + ?Sized,
    {
        debug!("choose_uniformly64(set = {}, max_bit = {})", set, max_bit);
        self.check_sample(set, max_bit, 63)?;

        let start = chooser.choose_bv64() & ones(max_bit + 1);
        Ok(self.descend(chooser, set, start, true))
    }

    /// Pick a member of `set` by projecting one random 64-bit pattern onto it.
    ///
    /// Bits forced by the set are overwritten; everywhere else the drawn bit
    /// decides the branch. The result is a member of `set`, but members are
    /// not equally likely.
    ///
    /// # Errors
    ///
    /// Fails when `set` is empty, `max_bit` is below its ordinal, or `max_bit` exceeds 63.
    pub fn choose<C>(&self, chooser: &mut C, set: Ref, max_bit: u32) -> Result<u64>
    where
        C: Chooser + ?Sized,
    {
        debug!("choose(set = {}, max_bit = {})", set, max_bit);
        self.check_sample(set, max_bit, 63)?;

        let start = chooser.choose_bv64() & ones(max_bit + 1);
        Ok(self.descend(chooser, set, start, false))
    }

    fn descend<C>(&self, chooser: &mut C, set: Ref, start: u64, weighted: bool) -> u64
    where
        C: Chooser + ?Sized,
    {
        let mut res = start;
        let mut current = set;
        while !self.is_full(current) {
            let node = self.node(current);
            let bit = 1u64 << node.ordinal;

            let one = if self.is_empty(node.high) {
                false
            } else if self.is_empty(node.low) {
                true
            } else if weighted {
                self.pick_high(chooser, node.high, node.low, node.ordinal)
            } else {
                res & bit != 0
            };

            if one {
                res |= bit;
                current = node.high;
            } else {
                res &= !bit;
                current = node.low;
            }
        }
        res
    }

    /// Choose the high branch with probability proportional to its share of elements.
    fn pick_high<C>(&self, chooser: &mut C, high: Ref, low: Ref, ordinal: i32) -> bool
    where
        C: Chooser + ?Sized,
    {
        let limit = BigUint::from(WEIGHT_LIMIT);
        let mut left = self.count_below(low, ordinal);
        let mut right = self.count_below(high, ordinal);
        while left >= limit || right >= limit {
            left >>= 1;
            right >>= 1;
        }

        let left = low_word(&left);
        let right = low_word(&right);
        chooser.choose(left + right) >= left
    }
}
