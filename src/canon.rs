//! Canonical representatives of leaf predicates.
//!
//! A [`LeafBdd`][crate::leaf::LeafBdd] interns its leaves by predicate value,
//! which is only sound if equivalent predicates are the same value. A
//! canonicalizer maps every predicate to a representative such that two
//! predicates are equivalent exactly when their representatives are equal.
//!
//! Which canonicalizer is used depends on the algebra, see
//! [`LeafCanonicalizer::for_algebra`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

use crate::algebra::BooleanAlgebra;
use crate::error::{AlgebraError, Result};

/// Finds representatives by comparing against every representative seen so far.
///
/// Works for any algebra, at a cost linear in the number of distinct classes.
#[derive(Debug, Clone)]
pub struct LinearScanCanonicalizer<T> {
    ids: HashMap<T, T>,
    representatives: Vec<T>,
}

impl<T> Default for LinearScanCanonicalizer<T> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            representatives: Vec::new(),
        }
    }
}

impl<T> LinearScanCanonicalizer<T>
where
    T: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct equivalence classes seen.
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    pub fn get_id<A>(&mut self, alg: &A, pred: &T) -> T
    where
        A: BooleanAlgebra<Predicate = T>,
    {
        if let Some(id) = self.ids.get(pred) {
            return id.clone();
        }

        let found = self.representatives.iter().find(|r| alg.are_equivalent(r, pred)).cloned();
        let id = match found {
            Some(id) => id,
            None => {
                debug!("new representative #{}: {:?}", self.representatives.len(), pred);
                self.representatives.push(pred.clone());
                pred.clone()
            }
        };

        self.ids.insert(pred.clone(), id.clone());
        id
    }
}

#[derive(Debug, Clone)]
enum TrieNode<T> {
    Leaf(T),
    /// Children of a node at depth `k`: `t1` holds predicates implied by atom `k`, `t0` the rest.
    Branch { t0: Option<usize>, t1: Option<usize> },
}

/// Finds representatives in a binary trie keyed by implication of atoms.
///
/// The node at depth `k` splits predicates by whether the `k`-th atom implies
/// them. Atoms are obtained from the algebra on demand, whenever two
/// predicates reach the same leaf without being told apart, so equivalent
/// predicates always end up at the same leaf.
///
/// Requires an atomic algebra.
#[derive(Debug, Clone)]
pub struct AtomTrieCanonicalizer<T> {
    ids: HashMap<T, T>,
    atoms: Vec<T>,
    nodes: Vec<TrieNode<T>>,
}

impl<T> AtomTrieCanonicalizer<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// # Errors
    ///
    /// Fails with [`AlgebraError::NotAtomic`] if `alg` is not atomic, or claims
    /// to be but has no atom below its true predicate.
    pub fn new<A>(alg: &A) -> Result<Self>
    where
        A: BooleanAlgebra<Predicate = T>,
    {
        if !alg.is_atomic() {
            return Err(AlgebraError::NotAtomic);
        }

        let t = alg.mk_true();
        let f = alg.mk_false();
        // Any atom tells true and false apart.
        let atom = alg.get_atom(&t)?.ok_or(AlgebraError::NotAtomic)?;

        let mut ids = HashMap::new();
        ids.insert(t.clone(), t.clone());
        ids.insert(f.clone(), f.clone());

        let nodes = vec![
            TrieNode::Branch { t0: Some(1), t1: Some(2) },
            TrieNode::Leaf(f),
            TrieNode::Leaf(t),
        ];

        Ok(Self {
            ids,
            atoms: vec![atom],
            nodes,
        })
    }

    /// Number of atoms discovered so far.
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// # Errors
    ///
    /// Propagates failures of [`BooleanAlgebra::get_atom`].
    pub fn get_id<A>(&mut self, alg: &A, pred: &T) -> Result<T>
    where
        A: BooleanAlgebra<Predicate = T>,
    {
        if let Some(id) = self.ids.get(pred) {
            return Ok(id.clone());
        }

        let id = self.insert(alg, pred)?;
        self.ids.insert(pred.clone(), id.clone());
        Ok(id)
    }

    fn push_leaf(&mut self, pred: T) -> usize {
        self.nodes.push(TrieNode::Leaf(pred));
        self.nodes.len() - 1
    }

    fn insert<A>(&mut self, alg: &A, pred: &T) -> Result<T>
    where
        A: BooleanAlgebra<Predicate = T>,
    {
        let mut index = 0;
        let mut k = 0;
        loop {
            match self.nodes[index].clone() {
                TrieNode::Branch { t0, t1 } => {
                    let implied = alg.check_implication(&self.atoms[k], pred);
                    let child = if implied { t1 } else { t0 };
                    match child {
                        Some(child) => {
                            index = child;
                            k += 1;
                        }
                        None => {
                            let new = self.push_leaf(pred.clone());
                            if let TrieNode::Branch { t0, t1 } = &mut self.nodes[index] {
                                if implied {
                                    *t1 = Some(new);
                                } else {
                                    *t0 = Some(new);
                                }
                            }
                            return Ok(pred.clone());
                        }
                    }
                }

                TrieNode::Leaf(leaf) if k < self.atoms.len() => {
                    // Push the leaf one level down, below a branch on atom k.
                    let implied = alg.check_implication(&self.atoms[k], &leaf);
                    let moved = Some(self.push_leaf(leaf));
                    self.nodes[index] = if implied {
                        TrieNode::Branch { t0: None, t1: moved }
                    } else {
                        TrieNode::Branch { t0: moved, t1: None }
                    };
                }

                TrieNode::Leaf(leaf) => {
                    let symdiff = alg.mk_symmetric_difference(&leaf, pred);
                    let Some(atom) = alg.get_atom(&symdiff)? else {
                        return Ok(leaf);
                    };

                    debug!("new atom #{}: {:?}", self.atoms.len(), atom);
                    let atom_implies_leaf = alg.check_implication(&atom, &leaf);
                    self.atoms.push(atom);

                    let old = Some(self.push_leaf(leaf));
                    let new = Some(self.push_leaf(pred.clone()));
                    self.nodes[index] = if atom_implies_leaf {
                        TrieNode::Branch { t0: new, t1: old }
                    } else {
                        TrieNode::Branch { t0: old, t1: new }
                    };
                    return Ok(pred.clone());
                }
            }
        }
    }
}

/// The canonicalizer a leaf algebra runs with.
#[derive(Debug, Clone)]
pub enum LeafCanonicalizer<T> {
    /// Predicates are already canonical.
    Identity,
    LinearScan(LinearScanCanonicalizer<T>),
    AtomTrie(AtomTrieCanonicalizer<T>),
}

impl<T> LeafCanonicalizer<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Identity for extensional algebras, the atom trie for atomic ones, a linear scan otherwise.
    pub fn for_algebra<A>(alg: &A) -> Result<Self>
    where
        A: BooleanAlgebra<Predicate = T>,
    {
        if alg.is_extensional() {
            Ok(LeafCanonicalizer::Identity)
        } else if alg.is_atomic() {
            Ok(LeafCanonicalizer::AtomTrie(AtomTrieCanonicalizer::new(alg)?))
        } else {
            Ok(LeafCanonicalizer::LinearScan(LinearScanCanonicalizer::new()))
        }
    }

    pub fn get_id<A>(&mut self, alg: &A, pred: &T) -> Result<T>
    where
        A: BooleanAlgebra<Predicate = T>,
    {
        match self {
            LeafCanonicalizer::Identity => Ok(pred.clone()),
            LeafCanonicalizer::LinearScan(c) => Ok(c.get_id(alg, pred)),
            LeafCanonicalizer::AtomTrie(c) => c.get_id(alg, pred),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::algebra::TrivialAlgebra;

    /// Subsets of `0..size`, represented by unsorted lists that may repeat elements.
    struct Subsets {
        size: u8,
        atomic: bool,
    }

    impl BooleanAlgebra for Subsets {
        type Predicate = Vec<u8>;

        fn mk_true(&self) -> Vec<u8> {
            (0..self.size).collect()
        }
        fn mk_false(&self) -> Vec<u8> {
            Vec::new()
        }
        fn mk_and(&self, a: &Vec<u8>, b: &Vec<u8>) -> Vec<u8> {
            a.iter().copied().filter(|x| b.contains(x)).collect()
        }
        fn mk_or(&self, a: &Vec<u8>, b: &Vec<u8>) -> Vec<u8> {
            a.iter().chain(b.iter()).copied().collect()
        }
        fn mk_not(&self, a: &Vec<u8>) -> Vec<u8> {
            (0..self.size).filter(|x| !a.contains(x)).collect()
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
            Ok(a.iter().min().map(|&m| vec![m]))
        }
    }

    #[test]
    fn test_linear_scan() {
        let alg = Subsets { size: 4, atomic: false };
        let mut canon = LinearScanCanonicalizer::new();

        let a = canon.get_id(&alg, &vec![1, 2]);
        assert_eq!(a, vec![1, 2]);
        assert_eq!(canon.get_id(&alg, &vec![2, 1]), a);
        assert_eq!(canon.get_id(&alg, &vec![2, 2, 1]), a);

        let b = canon.get_id(&alg, &vec![3]);
        assert_eq!(b, vec![3]);
        assert_eq!(canon.len(), 2);
    }

    #[test]
    fn test_atom_trie() {
        let alg = Subsets { size: 6, atomic: true };
        let mut canon = AtomTrieCanonicalizer::new(&alg).unwrap();
        assert_eq!(canon.num_atoms(), 1);

        assert_eq!(canon.get_id(&alg, &vec![0, 1, 2, 3, 4, 5]), Ok(alg.mk_true()));
        assert_eq!(canon.get_id(&alg, &vec![5, 4, 3, 2, 1, 0]), Ok(alg.mk_true()));
        assert_eq!(canon.get_id(&alg, &vec![]), Ok(vec![]));

        let a = canon.get_id(&alg, &vec![1, 3]).unwrap();
        let b = canon.get_id(&alg, &vec![3, 1]).unwrap();
        let c = canon.get_id(&alg, &vec![1, 4]).unwrap();
        let d = canon.get_id(&alg, &vec![4, 1, 1]).unwrap();
        let e = canon.get_id(&alg, &vec![0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(c, d);
        assert_ne!(a, c);
        assert_ne!(a, e);
        assert_eq!(canon.get_id(&alg, &vec![0, 0]), Ok(e));
    }

    #[test]
    fn test_atom_trie_all_subsets() {
        let alg = Subsets { size: 4, atomic: true };
        let mut canon = AtomTrieCanonicalizer::new(&alg).unwrap();

        let mut ids = Vec::new();
        for mask in 0u8..16 {
            let pred: Vec<u8> = (0..4).filter(|i| mask & (1 << i) != 0).collect();
            ids.push(canon.get_id(&alg, &pred).unwrap());
        }
        // Reversed lists are equivalent and must hit the same representatives.
        for mask in 0u8..16 {
            let pred: Vec<u8> = (0..4).rev().filter(|i| mask & (1 << i) != 0).collect();
            assert_eq!(canon.get_id(&alg, &pred).unwrap(), ids[mask as usize]);
        }
        for i in 0..16 {
            for j in (i + 1)..16 {
                assert_ne!(ids[i], ids[j]);
            }
        }
    }

    #[test]
    fn test_atom_trie_requires_atomic() {
        let alg = Subsets { size: 4, atomic: false };
        assert!(matches!(AtomTrieCanonicalizer::new(&alg), Err(AlgebraError::NotAtomic)));
    }

    #[test]
    fn test_atom_trie_requires_an_atom() {
        // Claims atomicity, yet `true` has no atom.
        struct Atomless;

        impl BooleanAlgebra for Atomless {
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

        assert!(matches!(AtomTrieCanonicalizer::new(&Atomless), Err(AlgebraError::NotAtomic)));
        assert!(matches!(LeafCanonicalizer::for_algebra(&Atomless), Err(AlgebraError::NotAtomic)));
    }

    #[test]
    fn test_selection() {
        let c = LeafCanonicalizer::for_algebra(&TrivialAlgebra).unwrap();
        assert!(matches!(c, LeafCanonicalizer::Identity));

        let c = LeafCanonicalizer::for_algebra(&Subsets { size: 3, atomic: true }).unwrap();
        assert!(matches!(c, LeafCanonicalizer::AtomTrie(_)));

        let c = LeafCanonicalizer::for_algebra(&Subsets { size: 3, atomic: false }).unwrap();
        assert!(matches!(c, LeafCanonicalizer::LinearScan(_)));
    }
}
