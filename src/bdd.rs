//! The bit-vector set manager.
//!
//! A [`Bdd`] owns every node it ever creates, together with the memoization
//! caches of all operations. Sets are handed out as [`Ref`] handles; because
//! nodes are hash-consed, two handles from the same manager are equal exactly
//! when they denote the same set.
//!
//! Variable `k` stands for bit `k` of the represented numbers, and ordinals
//! strictly decrease from the root towards the terminals. Bits that do not
//! occur on a path are unconstrained.
//!
//! # Concurrency
//!
//! A manager is single-threaded: its tables live in `RefCell`s and are
//! mutated by every operation, so a `Bdd` is deliberately not `Sync`.
//! Independent managers share nothing and may be used on separate threads.
//!
//! # Recursion depth
//!
//! All recursive algorithms descend one ordinal per level, so their depth is
//! bounded by the largest ordinal in use (at most 64 for word-sized domains).

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use log::debug;
use num_bigint::BigUint;

use crate::algebra::BooleanAlgebra;
use crate::cache::{Cache, OpKey};
use crate::error::{AlgebraError, Result};
use crate::node::{ordinal_of, Node};
use crate::reference::Ref;
use crate::table::Table;

/// Sizing of the manager's tables.
///
/// Both values are bit counts: the node table and every cache start with
/// room for `2^bits` entries and grow on demand.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddConfig {
    pub table_bits: usize,
    pub cache_bits: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            table_bits: 16,
            cache_bits: 14,
        }
    }
}

impl BddConfig {
    pub fn with_table_bits(mut self, bits: usize) -> Self {
        self.table_bits = bits;
        self
    }

    pub fn with_cache_bits(mut self, bits: usize) -> Self {
        self.cache_bits = bits;
        self
    }
}

/// Sizes and counters of a manager's tables.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BddStats {
    pub nodes: usize,
    pub op_cache: usize,
    pub interval_cache: usize,
    pub size_cache: usize,
    pub range_cache: usize,
    pub hits: usize,
    pub misses: usize,
}

pub struct Bdd {
    table: RefCell<Table<Node>>,
    cache: RefCell<Cache<OpKey, Ref>>,
    pub(crate) interval_cache: RefCell<Cache<(u32, u64, u64), Ref>>,
    pub(crate) size_cache: RefCell<Cache<Ref, BigUint>>,
    pub(crate) range_cache: RefCell<Cache<Ref, Arc<[(u64, u64)]>>>,
    empty: Ref,
    full: Ref,
}

impl Bdd {
    pub fn new() -> Self {
        Self::with_config(BddConfig::default())
    }

    pub fn with_config(config: BddConfig) -> Self {
        debug!("Creating Bdd with {:?}", config);

        let mut table = Table::new(config.table_bits);

        // Terminals occupy the first two slots: (0) is the empty set, (1) the full set.
        let empty = table.put(Node::new(Node::EMPTY_ORDINAL, Ref::new(0), Ref::new(0)));
        let full = table.put(Node::new(Node::FULL_ORDINAL, Ref::new(1), Ref::new(1)));
        assert_eq!(empty, Ref::new(0));
        assert_eq!(full, Ref::new(1));

        let bits = config.cache_bits;
        Self {
            table: RefCell::new(table),
            cache: RefCell::new(Cache::new(bits)),
            interval_cache: RefCell::new(Cache::new(bits)),
            size_cache: RefCell::new(Cache::new(bits)),
            range_cache: RefCell::new(Cache::new(bits)),
            empty,
            full,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new()
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("Bdd")
            .field("nodes", &stats.nodes)
            .field("op_cache", &stats.op_cache)
            .field("hits", &stats.hits)
            .field("misses", &stats.misses)
            .finish()
    }
}

impl Bdd {
    /// The empty set.
    pub fn empty(&self) -> Ref {
        self.empty
    }
    /// The set of all bit-vectors.
    pub fn full(&self) -> Ref {
        self.full
    }

    pub fn node(&self, r: Ref) -> Node {
        self.table.borrow()[r]
    }
    /// Ordinal of the node; [`Node::FULL_ORDINAL`] and [`Node::EMPTY_ORDINAL`] for terminals.
    pub fn ordinal(&self, r: Ref) -> i32 {
        self.node(r).ordinal
    }
    /// The one-branch of a decision node.
    pub fn high(&self, r: Ref) -> Ref {
        self.node(r).high
    }
    /// The zero-branch of a decision node.
    pub fn low(&self, r: Ref) -> Ref {
        self.node(r).low
    }

    pub fn is_empty(&self, r: Ref) -> bool {
        r == self.empty
    }
    pub fn is_full(&self, r: Ref) -> bool {
        r == self.full
    }
    pub fn is_terminal(&self, r: Ref) -> bool {
        self.is_empty(r) || self.is_full(r)
    }

    /// Number of interned nodes, terminals included.
    pub fn num_nodes(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn stats(&self) -> BddStats {
        let cache = self.cache.borrow();
        let interval_cache = self.interval_cache.borrow();
        let size_cache = self.size_cache.borrow();
        let range_cache = self.range_cache.borrow();
        BddStats {
            nodes: self.num_nodes(),
            op_cache: cache.len(),
            interval_cache: interval_cache.len(),
            size_cache: size_cache.len(),
            range_cache: range_cache.len(),
            hits: cache.hits() + interval_cache.hits() + size_cache.hits() + range_cache.hits(),
            misses: cache.misses() + interval_cache.misses() + size_cache.misses() + range_cache.misses(),
        }
    }

    /// Intern the node `(ordinal, high, low)`, collapsing it when both branches coincide.
    pub(crate) fn mk(&self, ordinal: i32, high: Ref, low: Ref) -> Ref {
        if high == low {
            return low;
        }
        debug_assert!(ordinal > self.ordinal(high), "Ordinals must decrease towards terminals");
        debug_assert!(ordinal > self.ordinal(low), "Ordinals must decrease towards terminals");
        self.table.borrow_mut().put(Node::new(ordinal, high, low))
    }

    /// Make the node branching on `bit` into `high` (bit set) and `low` (bit clear).
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not strictly above the ordinals of both children.
    pub fn mk_node(&self, bit: u32, high: Ref, low: Ref) -> Ref {
        let ordinal = ordinal_of(bit);
        assert!(
            ordinal > self.ordinal(high) && ordinal > self.ordinal(low),
            "Bit {} must be above the ordinals of both children",
            bit
        );
        self.mk(ordinal, high, low)
    }

    /// The set of all bit-vectors whose bit `k` is 1.
    pub fn bit_true(&self, k: u32) -> Ref {
        self.mk(ordinal_of(k), self.full, self.empty)
    }

    /// The set of all bit-vectors whose bit `k` is 0.
    pub fn bit_false(&self, k: u32) -> Ref {
        self.mk(ordinal_of(k), self.empty, self.full)
    }

    /// Split `r` on ordinal `m`: its (high, low) branches if `r` branches on `m`, else `(r, r)`.
    pub fn top_cofactors(&self, r: Ref, m: i32) -> (Ref, Ref) {
        let node = self.node(r);
        if node.ordinal == m {
            (node.high, node.low)
        } else {
            debug_assert!(node.ordinal < m);
            (r, r)
        }
    }

    pub(crate) fn check_bound(&self, set: Ref, max_bit: u32) -> Result<()> {
        let ordinal = self.ordinal(set);
        if (max_bit as i64) < ordinal as i64 {
            return Err(AlgebraError::InvalidBound { max_bit, ordinal });
        }
        Ok(())
    }

    /// Union of `a` and `b`.
    pub fn apply_or(&self, a: Ref, b: Ref) -> Ref {
        debug!("apply_or(a = {}, b = {})", a, b);

        if self.is_empty(a) {
            return b;
        }
        if self.is_empty(b) {
            return a;
        }
        if self.is_full(a) || self.is_full(b) {
            return self.full;
        }
        if a == b {
            return a;
        }

        let key = OpKey::or(a, b);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply_or(a = {}, b = {}) -> {}", a, b, res);
            return res;
        }

        let m = self.ordinal(a).max(self.ordinal(b));
        let (a1, a0) = self.top_cofactors(a, m);
        let (b1, b0) = self.top_cofactors(b, m);

        let t = self.apply_or(a1, b1);
        let f = self.apply_or(a0, b0);
        let res = self.mk(m, t, f);
        debug!("computed: apply_or(a = {}, b = {}) -> {}", a, b, res);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Intersection of `a` and `b`.
    pub fn apply_and(&self, a: Ref, b: Ref) -> Ref {
        debug!("apply_and(a = {}, b = {})", a, b);

        if self.is_full(a) {
            return b;
        }
        if self.is_full(b) {
            return a;
        }
        if self.is_empty(a) || self.is_empty(b) {
            return self.empty;
        }
        if a == b {
            return a;
        }

        let key = OpKey::and(a, b);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply_and(a = {}, b = {}) -> {}", a, b, res);
            return res;
        }

        let m = self.ordinal(a).max(self.ordinal(b));
        let (a1, a0) = self.top_cofactors(a, m);
        let (b1, b0) = self.top_cofactors(b, m);

        let t = self.apply_and(a1, b1);
        let f = self.apply_and(a0, b0);
        let res = self.mk(m, t, f);
        debug!("computed: apply_and(a = {}, b = {}) -> {}", a, b, res);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Complement of `a`.
    pub fn apply_not(&self, a: Ref) -> Ref {
        debug!("apply_not(a = {})", a);

        if self.is_empty(a) {
            return self.full;
        }
        if self.is_full(a) {
            return self.empty;
        }

        let key = OpKey::Not(a);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply_not(a = {}) -> {}", a, res);
            return res;
        }

        let node = self.node(a);
        let t = self.apply_not(node.high);
        let f = self.apply_not(node.low);
        let res = self.mk(node.ordinal, t, f);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Difference `a - b`.
    pub fn apply_diff(&self, a: Ref, b: Ref) -> Ref {
        debug!("apply_diff(a = {}, b = {})", a, b);
        self.apply_and(a, self.apply_not(b))
    }

    /// Symmetric difference `(a - b) | (b - a)`.
    pub fn apply_xor(&self, a: Ref, b: Ref) -> Ref {
        debug!("apply_xor(a = {}, b = {})", a, b);
        let a_minus_b = self.apply_and(a, self.apply_not(b));
        let b_minus_a = self.apply_and(b, self.apply_not(a));
        self.apply_or(a_minus_b, b_minus_a)
    }

    pub fn apply_and_many(&self, sets: impl IntoIterator<Item = Ref>) -> Ref {
        debug!("apply_and_many(...)");
        let mut res = self.full;
        for set in sets.into_iter() {
            res = self.apply_and(res, set);
        }
        res
    }

    pub fn apply_or_many(&self, sets: impl IntoIterator<Item = Ref>) -> Ref {
        debug!("apply_or_many(...)");
        let mut res = self.empty;
        for set in sets.into_iter() {
            res = self.apply_or(res, set);
        }
        res
    }

    /// Whether `a` is a subset of `b`.
    pub fn is_implied(&self, a: Ref, b: Ref) -> bool {
        debug!("is_implied(a = {}, b = {})", a, b);
        self.is_empty(self.apply_diff(a, b))
    }

    pub fn is_satisfiable(&self, a: Ref) -> bool {
        !self.is_empty(a)
    }

    /// Two sets of one manager are equivalent exactly when their handles are equal.
    pub fn are_equivalent(&self, a: Ref, b: Ref) -> bool {
        a == b
    }

    /// Whether `value` belongs to `set`. Bits above 63 read as 0.
    pub fn contains(&self, set: Ref, value: u64) -> bool {
        let mut current = set;
        while !self.is_terminal(current) {
            let node = self.node(current);
            let bit = node.ordinal < 64 && value & (1u64 << node.ordinal) != 0;
            current = if bit { node.high } else { node.low };
        }
        self.is_full(current)
    }

    /// Shift all elements one bit to the right.
    ///
    /// For example, if `set` denotes `{*0000, *1110, *1111}`, the result
    /// denotes `{*000, *111}`, where `*` is any prefix of 0s and 1s.
    pub fn shift_right(&self, set: Ref) -> Ref {
        debug!("shift_right(set = {})", set);

        if self.is_terminal(set) {
            return set;
        }

        let node = self.node(set);
        if node.ordinal == 0 {
            return self.full;
        }

        let key = OpKey::ShiftRight(set);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: shift_right(set = {}) -> {}", set, res);
            return res;
        }

        let zero = self.shift_right(node.low);
        let one = self.shift_right(node.high);
        let res = self.mk(node.ordinal - 1, one, zero);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Shift right, then clear bit `k`.
    pub fn shift_right0(&self, set: Ref, k: u32) -> Ref {
        debug!("shift_right0(set = {}, k = {})", set, k);
        let shifted = self.shift_right(set);
        self.apply_and(self.bit_false(k), shifted)
    }

    /// Shift all elements `k` bits to the left.
    ///
    /// For example, if `k = 1` and `set` denotes `{*0000, *1111}`, the result
    /// denotes `{*00000, *00001, *11110, *11111}`: the vacated low bits are
    /// unconstrained.
    ///
    /// # Panics
    ///
    /// Panics if a shifted ordinal overflows.
    pub fn shift_left(&self, set: Ref, k: u32) -> Ref {
        debug!("shift_left(set = {}, k = {})", set, k);

        if self.is_terminal(set) || k == 0 {
            return set;
        }

        let key = OpKey::ShiftLeft(set, k);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: shift_left(set = {}, k = {}) -> {}", set, k, res);
            return res;
        }

        let node = self.node(set);
        let shift = ordinal_of(k);
        assert!(node.ordinal <= i32::MAX - shift, "Shifted ordinal overflows");

        let zero = self.shift_left(node.low, k);
        let one = self.shift_left(node.high, k);
        let res = self.mk(node.ordinal + shift, one, zero);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Existentially quantify away bit `bit`.
    pub fn project_bit(&self, set: Ref, bit: u32) -> Ref {
        debug!("project_bit(set = {}, bit = {})", set, bit);

        let b = ordinal_of(bit);
        let node = self.node(set);
        if node.ordinal < b {
            set
        } else if node.ordinal == b {
            self.apply_or(node.high, node.low)
        } else {
            let mut cache = HashMap::new();
            self.project_bit_(set, b, &mut cache)
        }
    }

    fn project_bit_(&self, set: Ref, b: i32, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if let Some(&res) = cache.get(&set) {
            return res;
        }

        let node = self.node(set);
        let res = if node.ordinal < b {
            set
        } else if node.ordinal == b {
            self.apply_or(node.high, node.low)
        } else {
            let high = self.project_bit_(node.high, b, cache);
            let low = self.project_bit_(node.low, b, cache);
            self.mk(node.ordinal, high, low)
        };
        cache.insert(set, res);
        res
    }

    pub fn to_bracket_string(&self, set: Ref) -> String {
        if self.is_empty(set) {
            return "(0)".to_string();
        } else if self.is_full(set) {
            return "(1)".to_string();
        }

        let node = self.node(set);
        format!(
            "{}:(x{}, {}, {})",
            set,
            node.ordinal,
            self.to_bracket_string(node.high),
            self.to_bracket_string(node.low)
        )
    }
}

impl BooleanAlgebra for Bdd {
    type Predicate = Ref;

    fn mk_true(&self) -> Ref {
        self.full
    }
    fn mk_false(&self) -> Ref {
        self.empty
    }

    fn mk_and(&self, a: &Ref, b: &Ref) -> Ref {
        self.apply_and(*a, *b)
    }
    fn mk_or(&self, a: &Ref, b: &Ref) -> Ref {
        self.apply_or(*a, *b)
    }
    fn mk_not(&self, a: &Ref) -> Ref {
        self.apply_not(*a)
    }

    fn mk_symmetric_difference(&self, a: &Ref, b: &Ref) -> Ref {
        self.apply_xor(*a, *b)
    }

    fn is_satisfiable(&self, a: &Ref) -> bool {
        Bdd::is_satisfiable(self, *a)
    }
    fn are_equivalent(&self, a: &Ref, b: &Ref) -> bool {
        a == b
    }
    fn check_implication(&self, lhs: &Ref, rhs: &Ref) -> bool {
        self.is_implied(*lhs, *rhs)
    }

    fn is_extensional(&self) -> bool {
        true
    }
    fn is_atomic(&self) -> bool {
        false
    }
}
