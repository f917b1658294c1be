//! Decision diagrams with predicates of another Boolean algebra in the leaves.
//!
//! A [`LeafBdd`] branches on bits exactly like [`Bdd`][crate::bdd::Bdd], but
//! its terminals carry predicates of a base algebra `A`. Operations on two
//! leaves are delegated to `A`, and the result is mapped to its canonical
//! representative before it is interned, so a `LeafBdd` stays canonical even
//! over a base algebra whose predicates have many equivalent forms.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;

use log::debug;

use crate::algebra::BooleanAlgebra;
use crate::bdd::BddConfig;
use crate::cache::{Cache, OpKey};
use crate::canon::LeafCanonicalizer;
use crate::error::Result;
use crate::interval::{check_value, interval, IntervalBuilder};
use crate::node::{ordinal_of, Node};
use crate::reference::Ref;
use crate::table::Table;

/// Ordinal reported for every leaf.
pub const LEAF_ORDINAL: i32 = -1;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
enum Entry<P> {
    Leaf(P),
    Branch(Node),
}

pub struct LeafBdd<A: BooleanAlgebra> {
    alg: A,
    table: RefCell<Table<Entry<A::Predicate>>>,
    canonicalizer: RefCell<LeafCanonicalizer<A::Predicate>>,
    cache: RefCell<Cache<OpKey, Ref>>,
    interval_cache: RefCell<Cache<(u32, u64, u64), Ref>>,
    empty: Ref,
    full: Ref,
}

impl<A: BooleanAlgebra> LeafBdd<A> {
    /// # Errors
    ///
    /// Fails if `alg` claims to be atomic but its true predicate has no atom.
    pub fn new(alg: A) -> Result<Self> {
        Self::with_config(alg, BddConfig::default())
    }

    pub fn with_config(alg: A, config: BddConfig) -> Result<Self> {
        debug!("Creating LeafBdd with {:?}", config);

        let mut canonicalizer = LeafCanonicalizer::for_algebra(&alg)?;
        let f = canonicalizer.get_id(&alg, &alg.mk_false())?;
        let t = canonicalizer.get_id(&alg, &alg.mk_true())?;

        let mut table = Table::new(config.table_bits);
        let empty = table.put(Entry::Leaf(f));
        let full = table.put(Entry::Leaf(t));

        Ok(Self {
            alg,
            table: RefCell::new(table),
            canonicalizer: RefCell::new(canonicalizer),
            cache: RefCell::new(Cache::new(config.cache_bits)),
            interval_cache: RefCell::new(Cache::new(config.cache_bits)),
            empty,
            full,
        })
    }

    /// The base algebra of the leaves.
    pub fn leaf_algebra(&self) -> &A {
        &self.alg
    }

    /// The leaf holding the base algebra's false predicate.
    pub fn empty(&self) -> Ref {
        self.empty
    }
    /// The leaf holding the base algebra's true predicate.
    pub fn full(&self) -> Ref {
        self.full
    }

    pub fn is_empty(&self, r: Ref) -> bool {
        r == self.empty
    }
    pub fn is_full(&self, r: Ref) -> bool {
        r == self.full
    }

    pub fn num_nodes(&self) -> usize {
        self.table.borrow().len()
    }

    fn entry(&self, r: Ref) -> Entry<A::Predicate> {
        self.table.borrow()[r].clone()
    }

    pub fn is_leaf(&self, r: Ref) -> bool {
        matches!(self.table.borrow()[r], Entry::Leaf(_))
    }

    /// The predicate of a leaf, `None` for decision nodes.
    pub fn leaf(&self, r: Ref) -> Option<A::Predicate> {
        match &self.table.borrow()[r] {
            Entry::Leaf(p) => Some(p.clone()),
            Entry::Branch(_) => None,
        }
    }

    /// The decision node behind `r`, `None` for leaves.
    pub fn node(&self, r: Ref) -> Option<Node> {
        match self.table.borrow()[r] {
            Entry::Leaf(_) => None,
            Entry::Branch(node) => Some(node),
        }
    }

    pub fn ordinal(&self, r: Ref) -> i32 {
        self.node(r).map_or(LEAF_ORDINAL, |node| node.ordinal)
    }

    /// Intern the leaf for the canonical representative of `pred`.
    ///
    /// # Panics
    ///
    /// Panics if the base algebra fails to produce an atom while claiming to be atomic.
    pub fn mk_leaf(&self, pred: &A::Predicate) -> Ref {
        let id = self
            .canonicalizer
            .borrow_mut()
            .get_id(&self.alg, pred)
            .unwrap_or_else(|e| panic!("Leaf algebra broke its atomicity contract: {}", e));
        self.table.borrow_mut().put(Entry::Leaf(id))
    }

    fn mk(&self, ordinal: i32, high: Ref, low: Ref) -> Ref {
        if high == low {
            return low;
        }
        debug_assert!(ordinal > self.ordinal(high), "Ordinals must decrease towards leaves");
        debug_assert!(ordinal > self.ordinal(low), "Ordinals must decrease towards leaves");
        self.table.borrow_mut().put(Entry::Branch(Node::new(ordinal, high, low)))
    }

    /// Nodes whose bit `k` is 1 lead to the full leaf, the others to the empty leaf.
    pub fn bit_true(&self, k: u32) -> Ref {
        self.mk(ordinal_of(k), self.full, self.empty)
    }

    pub fn bit_false(&self, k: u32) -> Ref {
        self.mk(ordinal_of(k), self.empty, self.full)
    }

    /// See [`Bdd::from_range`][crate::bdd::Bdd::from_range].
    pub fn from_range(&self, lo: u64, hi: u64, max_bit: u32) -> Result<Ref> {
        debug!("from_range(lo = {}, hi = {}, max_bit = {})", lo, hi, max_bit);
        if hi < lo {
            return Ok(self.empty);
        }
        check_value(lo, max_bit)?;
        check_value(hi, max_bit)?;
        Ok(interval(self, max_bit, lo, hi))
    }

    fn top_cofactors(&self, r: Ref, m: i32) -> (Ref, Ref) {
        match self.node(r) {
            Some(node) if node.ordinal == m => (node.high, node.low),
            _ => (r, r),
        }
    }

    pub fn apply_or(&self, a: Ref, b: Ref) -> Ref {
        debug!("apply_or(a = {}, b = {})", a, b);

        if a == b || self.is_empty(b) {
            return a;
        }
        if self.is_empty(a) {
            return b;
        }
        if self.is_full(a) || self.is_full(b) {
            return self.full;
        }

        let key = OpKey::or(a, b);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply_or(a = {}, b = {}) -> {}", a, b, res);
            return res;
        }

        let res = match (self.entry(a), self.entry(b)) {
            (Entry::Leaf(p), Entry::Leaf(q)) => self.mk_leaf(&self.alg.mk_or(&p, &q)),
            _ => {
                let m = self.ordinal(a).max(self.ordinal(b));
                let (a1, a0) = self.top_cofactors(a, m);
                let (b1, b0) = self.top_cofactors(b, m);
                let t = self.apply_or(a1, b1);
                let f = self.apply_or(a0, b0);
                self.mk(m, t, f)
            }
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

    pub fn apply_and(&self, a: Ref, b: Ref) -> Ref {
        debug!("apply_and(a = {}, b = {})", a, b);

        if a == b || self.is_full(b) {
            return a;
        }
        if self.is_full(a) {
            return b;
        }
        if self.is_empty(a) || self.is_empty(b) {
            return self.empty;
        }

        let key = OpKey::and(a, b);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply_and(a = {}, b = {}) -> {}", a, b, res);
            return res;
        }

        let res = match (self.entry(a), self.entry(b)) {
            (Entry::Leaf(p), Entry::Leaf(q)) => self.mk_leaf(&self.alg.mk_and(&p, &q)),
            _ => {
                let m = self.ordinal(a).max(self.ordinal(b));
                let (a1, a0) = self.top_cofactors(a, m);
                let (b1, b0) = self.top_cofactors(b, m);
                let t = self.apply_and(a1, b1);
                let f = self.apply_and(a0, b0);
                self.mk(m, t, f)
            }
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

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

        let res = match self.entry(a) {
            Entry::Leaf(p) => self.mk_leaf(&self.alg.mk_not(&p)),
            Entry::Branch(node) => {
                let t = self.apply_not(node.high);
                let f = self.apply_not(node.low);
                self.mk(node.ordinal, t, f)
            }
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

    pub fn apply_diff(&self, a: Ref, b: Ref) -> Ref {
        self.apply_and(a, self.apply_not(b))
    }

    pub fn apply_xor(&self, a: Ref, b: Ref) -> Ref {
        let a_minus_b = self.apply_diff(a, b);
        let b_minus_a = self.apply_diff(b, a);
        self.apply_or(a_minus_b, b_minus_a)
    }

    pub fn apply_and_many(&self, rs: impl IntoIterator<Item = Ref>) -> Ref {
        rs.into_iter().fold(self.full, |acc, r| self.apply_and(acc, r))
    }

    pub fn apply_or_many(&self, rs: impl IntoIterator<Item = Ref>) -> Ref {
        rs.into_iter().fold(self.empty, |acc, r| self.apply_or(acc, r))
    }

    pub fn is_implied(&self, a: Ref, b: Ref) -> bool {
        self.is_empty(self.apply_diff(a, b))
    }

    pub fn is_satisfiable(&self, a: Ref) -> bool {
        !self.is_empty(a)
    }

    pub fn are_equivalent(&self, a: Ref, b: Ref) -> bool {
        a == b
    }

    /// The leaf predicate reached by following the bits of `value`. Bits above 63 read as 0.
    pub fn leaf_at(&self, r: Ref, value: u64) -> A::Predicate {
        let mut current = r;
        loop {
            match self.entry(current) {
                Entry::Leaf(p) => return p,
                Entry::Branch(node) => {
                    let bit = node.ordinal < 64 && value & (1u64 << node.ordinal) != 0;
                    current = if bit { node.high } else { node.low };
                }
            }
        }
    }

    /// Shift every bit one position to the right.
    ///
    /// A node on bit 0 is replaced by the union of its branches.
    pub fn shift_right(&self, r: Ref) -> Ref {
        debug!("shift_right(r = {})", r);

        let Some(node) = self.node(r) else {
            return r;
        };
        if node.ordinal == 0 {
            return self.apply_or(node.high, node.low);
        }

        let key = OpKey::ShiftRight(r);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            return res;
        }

        let one = self.shift_right(node.high);
        let zero = self.shift_right(node.low);
        let res = self.mk(node.ordinal - 1, one, zero);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Shift every bit `k` positions to the left.
    ///
    /// # Panics
    ///
    /// Panics if a shifted ordinal overflows.
    pub fn shift_left(&self, r: Ref, k: u32) -> Ref {
        debug!("shift_left(r = {}, k = {})", r, k);

        let Some(node) = self.node(r) else {
            return r;
        };
        if k == 0 {
            return r;
        }

        let key = OpKey::ShiftLeft(r, k);
        if let Some(&res) = self.cache.borrow_mut().get(&key) {
            return res;
        }

        let shift = ordinal_of(k);
        assert!(node.ordinal <= i32::MAX - shift, "Shifted ordinal overflows");

        let one = self.shift_left(node.high, k);
        let zero = self.shift_left(node.low, k);
        let res = self.mk(node.ordinal + shift, one, zero);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Existentially quantify away bit `bit`.
    pub fn project_bit(&self, r: Ref, bit: u32) -> Ref {
        debug!("project_bit(r = {}, bit = {})", r, bit);
        let mut cache = HashMap::new();
        self.project_bit_(r, ordinal_of(bit), &mut cache)
    }

    fn project_bit_(&self, r: Ref, b: i32, cache: &mut HashMap<Ref, Ref>) -> Ref {
        let Some(node) = self.node(r) else {
            return r;
        };
        if node.ordinal < b {
            return r;
        }
        if let Some(&res) = cache.get(&r) {
            return res;
        }

        let res = if node.ordinal == b {
            self.apply_or(node.high, node.low)
        } else {
            let high = self.project_bit_(node.high, b, cache);
            let low = self.project_bit_(node.low, b, cache);
            self.mk(node.ordinal, high, low)
        };
        cache.insert(r, res);
        res
    }

    pub fn to_bracket_string(&self, r: Ref) -> String {
        match self.entry(r) {
            Entry::Leaf(p) => format!("({:?})", p),
            Entry::Branch(node) => format!(
                "{}:(x{}, {}, {})",
                r,
                node.ordinal,
                self.to_bracket_string(node.high),
                self.to_bracket_string(node.low)
            ),
        }
    }
}

impl<A: BooleanAlgebra> IntervalBuilder for LeafBdd<A> {
    fn empty(&self) -> Ref {
        self.empty
    }
    fn full(&self) -> Ref {
        self.full
    }
    fn mk(&self, ordinal: i32, high: Ref, low: Ref) -> Ref {
        LeafBdd::mk(self, ordinal, high, low)
    }
    fn interval_cache(&self) -> &RefCell<Cache<(u32, u64, u64), Ref>> {
        &self.interval_cache
    }
}

impl<A: BooleanAlgebra> Debug for LeafBdd<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafBdd")
            .field("nodes", &self.num_nodes())
            .field("op_cache", &self.cache.borrow().len())
            .finish()
    }
}

impl<A: BooleanAlgebra> BooleanAlgebra for LeafBdd<A> {
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

    fn is_satisfiable(&self, a: &Ref) -> bool {
        LeafBdd::is_satisfiable(self, *a)
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
