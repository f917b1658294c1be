//! The generic leaf variant over a non-extensional algebra.

use bvset::algebra::BooleanAlgebra;
use bvset::bdd::Bdd;
use bvset::canon::{AtomTrieCanonicalizer, LinearScanCanonicalizer};
use bvset::error::{AlgebraError, Result};
use bvset::leaf::LeafBdd;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Subsets of `0..8` as unsorted lists, possibly with repeats.
///
/// Many lists denote the same subset, so `==` is finer than equivalence.
struct Subsets {
    atomic: bool,
}

const SIZE: u8 = 8;

impl BooleanAlgebra for Subsets {
    type Predicate = Vec<u8>;

    fn mk_true(&self) -> Vec<u8> {
        (0..SIZE).collect()
    }
    fn mk_false(&self) -> Vec<u8> {
        Vec::new()
    }
    fn mk_and(&self, a: &Vec<u8>, b: &Vec<u8>) -> Vec<u8> {
        a.iter().copied().filter(|x| b.contains(x)).collect()
    }
    fn mk_or(&self, a: &Vec<u8>, b: &Vec<u8>) -> Vec<u8> {
        b.iter().chain(a.iter()).copied().collect()
    }
    fn mk_not(&self, a: &Vec<u8>) -> Vec<u8> {
        (0..SIZE).rev().filter(|x| !a.contains(x)).collect()
    }
    fn is_satisfiable(&self, a: &Vec<u8>) -> bool {
        !a.is_empty()
    }
    fn is_extensional(&self) -> bool {
        false
    }
    fn is_atomic(&self) -> bool {
        self.atomic
    }
    fn get_atom(&self, a: &Vec<u8>) -> Result<Option<Vec<u8>>> {
        if !self.atomic {
            return Err(AlgebraError::NotAtomic);
        }
        Ok(a.iter().max().map(|&m| vec![m]))
    }
}

fn mask_of(p: &[u8]) -> u8 {
    p.iter().fold(0, |acc, &x| acc | (1 << x))
}

fn random_pred(rng: &mut impl Rng) -> Vec<u8> {
    let len = rng.random_range(0..12);
    (0..len).map(|_| rng.random_range(0..SIZE)).collect()
}

fn check_canonical(alg: Subsets) {
    let bdd = LeafBdd::new(alg).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    let mut leaves = Vec::new();
    for _ in 0..200 {
        let p = random_pred(&mut rng);
        let r = bdd.mk_leaf(&p);
        leaves.push((mask_of(&p), r));
    }

    for &(m1, r1) in &leaves {
        for &(m2, r2) in &leaves {
            assert_eq!(m1 == m2, r1 == r2);
        }
    }
}

#[test]
fn linear_scan_leaves_are_canonical() {
    check_canonical(Subsets { atomic: false });
}

#[test]
fn atom_trie_leaves_are_canonical() {
    check_canonical(Subsets { atomic: true });
}

#[test]
fn canonicalizers_agree() {
    let alg = Subsets { atomic: true };
    let mut scan = LinearScanCanonicalizer::new();
    let mut trie = AtomTrieCanonicalizer::new(&alg).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(18);

    let preds: Vec<Vec<u8>> = (0..300).map(|_| random_pred(&mut rng)).collect();
    for p in &preds {
        for q in &preds {
            let same = mask_of(p) == mask_of(q);
            assert_eq!(scan.get_id(&alg, p) == scan.get_id(&alg, q), same);
            assert_eq!(trie.get_id(&alg, p).unwrap() == trie.get_id(&alg, q).unwrap(), same);
        }
    }
    assert!(trie.num_atoms() <= SIZE as usize);
    assert!(scan.len() <= 256);
}

#[test]
fn leaf_operations_stay_canonical() {
    for atomic in [false, true] {
        let bdd = LeafBdd::new(Subsets { atomic }).unwrap();

        let a = bdd.mk_leaf(&vec![1, 2, 3]);
        let b = bdd.mk_leaf(&vec![3, 4]);
        assert_eq!(bdd.apply_and(a, b), bdd.mk_leaf(&vec![3]));
        assert_eq!(bdd.apply_or(a, b), bdd.mk_leaf(&vec![4, 3, 2, 1]));
        assert_eq!(bdd.apply_diff(a, b), bdd.mk_leaf(&vec![2, 1, 2]));
        assert_eq!(bdd.apply_not(bdd.apply_not(a)), a);
        assert_eq!(bdd.apply_or(a, bdd.apply_not(a)), bdd.full());
        assert_eq!(bdd.apply_and(a, bdd.apply_not(a)), bdd.empty());
        assert!(bdd.is_implied(bdd.mk_leaf(&vec![2]), a));
        assert!(!bdd.is_implied(a, b));
    }
}

#[test]
fn diagrams_over_leaves() {
    for atomic in [false, true] {
        let bdd = LeafBdd::new(Subsets { atomic }).unwrap();

        let a = bdd.mk_leaf(&vec![0, 1]);
        let b = bdd.mk_leaf(&vec![1, 2]);

        // bit 2 set -> a, else -> b; then the same function built differently.
        let f = bdd.apply_or(bdd.apply_and(bdd.bit_true(2), a), bdd.apply_and(bdd.bit_false(2), b));
        let g = bdd.apply_not(bdd.apply_or(
            bdd.apply_and(bdd.bit_true(2), bdd.apply_not(a)),
            bdd.apply_and(bdd.bit_false(2), bdd.apply_not(b)),
        ));
        assert_eq!(f, g);
        assert_eq!(bdd.ordinal(f), 2);
        assert_eq!(mask_of(&bdd.leaf_at(f, 0b100)), 0b011);
        assert_eq!(mask_of(&bdd.leaf_at(f, 0b011)), 0b110);

        // projecting bit 2 unions both leaves
        let projected = bdd.project_bit(f, 2);
        assert!(bdd.is_leaf(projected));
        assert_eq!(mask_of(&bdd.leaf(projected).unwrap()), 0b111);

        let interval = bdd.from_range(2, 5, 3).unwrap();
        let restricted = bdd.apply_and(interval, a);
        assert_eq!(mask_of(&bdd.leaf_at(restricted, 3)), 0b011);
        assert!(bdd.is_empty(bdd.apply_and(restricted, bdd.from_range(6, 15, 3).unwrap())));
    }
}

#[test]
fn bit_vector_sets_as_leaves() {
    let base = Bdd::default();
    let digits = base.from_range(0x30, 0x39, 7).unwrap();
    let letters = base.from_range(0x61, 0x7a, 7).unwrap();
    let bdd = LeafBdd::new(base).unwrap();

    let d = bdd.mk_leaf(&digits);
    let l = bdd.mk_leaf(&letters);
    let both = bdd.apply_or(d, l);
    let union = bdd.leaf_algebra().apply_or(digits, letters);
    assert_eq!(bdd.leaf(both), Some(union));
    assert_eq!(bdd.apply_and(d, l), bdd.empty());
}

/// Claims to be atomic but has no atoms at all.
struct Hollow;

impl BooleanAlgebra for Hollow {
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
    fn is_satisfiable(&self, a: &bool) -> bool {
        *a
    }
    fn is_extensional(&self) -> bool {
        false
    }
    fn is_atomic(&self) -> bool {
        true
    }
    fn get_atom(&self, _a: &bool) -> Result<Option<bool>> {
        Ok(None)
    }
}

#[test]
fn construction_errors() {
    assert!(matches!(
        AtomTrieCanonicalizer::new(&Subsets { atomic: false }),
        Err(AlgebraError::NotAtomic)
    ));
    assert!(matches!(LeafBdd::new(Hollow), Err(AlgebraError::NotAtomic)));
}
