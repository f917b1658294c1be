//! The Boolean-algebra contract.
//!
//! [`BooleanAlgebra`] is what a [`LeafBdd`][crate::leaf::LeafBdd] needs from
//! the algebra whose predicates it stores in its leaves. Both diagram
//! managers implement it as well, so a bit-vector algebra can itself serve as
//! a leaf algebra.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{AlgebraError, Result};

pub trait BooleanAlgebra {
    type Predicate: Clone + Eq + Hash + Debug;

    /// The predicate satisfied by everything.
    fn mk_true(&self) -> Self::Predicate;
    /// The predicate satisfied by nothing.
    fn mk_false(&self) -> Self::Predicate;

    fn mk_and(&self, a: &Self::Predicate, b: &Self::Predicate) -> Self::Predicate;
    fn mk_or(&self, a: &Self::Predicate, b: &Self::Predicate) -> Self::Predicate;
    fn mk_not(&self, a: &Self::Predicate) -> Self::Predicate;

    fn mk_and_many<'a>(&self, preds: impl IntoIterator<Item = &'a Self::Predicate>) -> Self::Predicate
    where
        Self::Predicate: 'a,
    {
        let mut res = self.mk_true();
        for p in preds {
            res = self.mk_and(&res, p);
        }
        res
    }

    fn mk_or_many<'a>(&self, preds: impl IntoIterator<Item = &'a Self::Predicate>) -> Self::Predicate
    where
        Self::Predicate: 'a,
    {
        let mut res = self.mk_false();
        for p in preds {
            res = self.mk_or(&res, p);
        }
        res
    }

    /// `(a - b) | (b - a)`.
    fn mk_symmetric_difference(&self, a: &Self::Predicate, b: &Self::Predicate) -> Self::Predicate {
        let a_minus_b = self.mk_and(a, &self.mk_not(b));
        let b_minus_a = self.mk_and(b, &self.mk_not(a));
        self.mk_or(&a_minus_b, &b_minus_a)
    }

    fn is_satisfiable(&self, a: &Self::Predicate) -> bool;

    /// Semantic equivalence, which may be coarser than `==`.
    fn are_equivalent(&self, a: &Self::Predicate, b: &Self::Predicate) -> bool {
        !self.is_satisfiable(&self.mk_symmetric_difference(a, b))
    }

    /// Whether every element satisfying `lhs` also satisfies `rhs`.
    fn check_implication(&self, lhs: &Self::Predicate, rhs: &Self::Predicate) -> bool {
        !self.is_satisfiable(&self.mk_and(lhs, &self.mk_not(rhs)))
    }

    fn simplify(&self, a: &Self::Predicate) -> Self::Predicate {
        a.clone()
    }

    /// Whether `==` on predicates already coincides with [`are_equivalent`][Self::are_equivalent].
    fn is_extensional(&self) -> bool;

    /// Whether every satisfiable predicate has an atom below it.
    fn is_atomic(&self) -> bool;

    /// Return an atom implying `a`, or `None` when `a` is unsatisfiable.
    ///
    /// Only atomic algebras support this; the default fails with
    /// [`AlgebraError::NotAtomic`].
    fn get_atom(&self, a: &Self::Predicate) -> Result<Option<Self::Predicate>> {
        let _ = a;
        Err(AlgebraError::NotAtomic)
    }
}

/// The two-element Boolean algebra over `bool`.
#[derive(Debug, Default, Copy, Clone)]
pub struct TrivialAlgebra;

impl BooleanAlgebra for TrivialAlgebra {
    type Predicate = bool;

    fn mk_true(&self) -> bool {
        true
    }
    fn mk_false(&self) -> bool {
        false
    }

    fn mk_and(&self, a: &bool, b: &bool) -> bool {
        *a && *b
    }
    fn mk_or(&self, a: &bool, b: &bool) -> bool {
        *a || *b
    }
    fn mk_not(&self, a: &bool) -> bool {
        !*a
    }

    fn mk_symmetric_difference(&self, a: &bool, b: &bool) -> bool {
        a != b
    }

    fn is_satisfiable(&self, a: &bool) -> bool {
        *a
    }
    fn are_equivalent(&self, a: &bool, b: &bool) -> bool {
        a == b
    }
    fn check_implication(&self, lhs: &bool, rhs: &bool) -> bool {
        !*lhs || *rhs
    }

    fn is_extensional(&self) -> bool {
        true
    }
    fn is_atomic(&self) -> bool {
        true
    }

    fn get_atom(&self, a: &bool) -> Result<Option<bool>> {
        Ok(a.then_some(true))
    }
}
