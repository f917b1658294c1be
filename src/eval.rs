//! Operator syntax for set expressions: `bdd.eval(a | b)`.
//!
//! Operators on [`Ref`] only record their operands; the manager passed to
//! [`Bdd::eval`] does the work.

use std::ops::{BitAnd, BitOr, BitXor, Not, Sub};

use crate::bdd::Bdd;
use crate::reference::Ref;

macro_rules! binary_op {
    ($name:ident, $trait:ident, $method:ident, $apply:ident) => {
        pub struct $name {
            f: Ref,
            g: Ref,
        }

        impl $trait for Ref {
            type Output = $name;

            fn $method(self, rhs: Self) -> Self::Output {
                $name { f: self, g: rhs }
            }
        }

        impl Eval for $name {
            fn eval(&self, bdd: &Bdd) -> Ref {
                bdd.$apply(self.f, self.g)
            }
        }
    };
}

binary_op!(UnionOp, BitOr, bitor, apply_or);
binary_op!(IntersectionOp, BitAnd, bitand, apply_and);
binary_op!(SymmetricDiffOp, BitXor, bitxor, apply_xor);
binary_op!(DiffOp, Sub, sub, apply_diff);

pub struct ComplementOp {
    f: Ref,
}

impl Not for Ref {
    type Output = ComplementOp;

    fn not(self) -> Self::Output {
        ComplementOp { f: self }
    }
}

impl Eval for ComplementOp {
    fn eval(&self, bdd: &Bdd) -> Ref {
        bdd.apply_not(self.f)
    }
}

/// Something a manager can turn into a set.
pub trait Eval {
    fn eval(&self, bdd: &Bdd) -> Ref;
}

impl Bdd {
    /// Evaluate an operator expression built from [`Ref`]s of this manager.
    pub fn eval(&self, value: impl Eval) -> Ref {
        value.eval(self)
    }
}

impl Eval for Ref {
    fn eval(&self, _bdd: &Bdd) -> Ref {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_eval_set() {
        let bdd = Bdd::default();
        let x = bdd.from_range(3, 9, 4).unwrap();
        assert_eq!(bdd.eval(x), x);
    }

    #[test]
    fn test_eval_complement() {
        let bdd = Bdd::default();
        let x = bdd.bit_true(1);
        assert_eq!(bdd.eval(!x), bdd.bit_false(1));
    }

    #[test]
    fn test_eval_union() {
        let bdd = Bdd::default();
        let x = bdd.from_range(0, 4, 4).unwrap();
        let y = bdd.from_range(3, 9, 4).unwrap();
        assert_eq!(bdd.eval(x | y), bdd.from_range(0, 9, 4).unwrap());
    }

    #[test]
    fn test_eval_intersection() {
        let bdd = Bdd::default();
        let x = bdd.from_range(0, 4, 4).unwrap();
        let y = bdd.from_range(3, 9, 4).unwrap();
        assert_eq!(bdd.eval(x & y), bdd.from_range(3, 4, 4).unwrap());
    }

    #[test]
    fn test_eval_diff() {
        let bdd = Bdd::default();
        let x = bdd.from_range(0, 4, 4).unwrap();
        let y = bdd.from_range(3, 9, 4).unwrap();
        assert_eq!(bdd.eval(x - y), bdd.from_range(0, 2, 4).unwrap());
    }

    #[test]
    fn test_eval_symmetric_diff() {
        let bdd = Bdd::default();
        let x = bdd.from_range(0, 4, 4).unwrap();
        let y = bdd.from_range(3, 9, 4).unwrap();
        let expected = bdd.from_elements([0, 1, 2, 5, 6, 7, 8, 9], 4).unwrap();
        assert_eq!(bdd.eval(x ^ y), expected);
    }
}
