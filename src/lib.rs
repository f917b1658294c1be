//! # bvset: Sets of bit-vectors as decision diagrams
//!
//! **`bvset`** represents large sets of fixed-width bit patterns, such as all
//! 16-, 32- or 64-bit character codes, as canonical **Binary Decision
//! Diagrams**. Sets are combined, counted, sampled and converted to ranges
//! without ever enumerating their elements.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through a [`Bdd`][crate::bdd::Bdd] manager, which hash-conses every node. Two sets of one manager are equal exactly when their [`Ref`][crate::reference::Ref] handles are equal.
//! - **Bit-level variables**: Variable `k` is bit `k` of the represented numbers. Bits a diagram never mentions are unconstrained, so one set answers for every width.
//! - **Quantitative queries**: exact cardinality, lexicographic min/max, uniform sampling and minimal range lists.
//! - **Generic leaves**: [`LeafBdd`][crate::leaf::LeafBdd] lifts any [`BooleanAlgebra`][crate::algebra::BooleanAlgebra] into decision-diagram form.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bvset::bdd::Bdd;
//! use num_bigint::BigUint;
//!
//! let bdd = Bdd::default();
//!
//! // Lowercase and uppercase ASCII letters over 8 bits.
//! let lower = bdd.from_range(0x61, 0x7a, 7).unwrap();
//! let upper = bdd.from_range(0x41, 0x5a, 7).unwrap();
//! let letters = bdd.apply_or(lower, upper);
//!
//! assert_eq!(bdd.to_ranges(letters, 7).unwrap(), vec![(0x41, 0x5a), (0x61, 0x7a)]);
//! assert_eq!(bdd.domain_size(letters, 7).unwrap(), BigUint::from(52u32));
//! assert_eq!(bdd.get_min(letters).unwrap(), 0x41);
//!
//! // Clearing bit 5 maps lowercase onto uppercase.
//! let folded = bdd.apply_and(bdd.project_bit(lower, 5), bdd.bit_false(5));
//! assert_eq!(folded, upper);
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The [`Bdd`][crate::bdd::Bdd] manager with the set algebra, shifts and projection.
//! - **[`interval`]**, **[`count`]**, **[`sample`]**, **[`ranges`]**: Building sets from intervals, counting, sampling and range conversion.
//! - **[`leaf`]** and **[`canon`]**: The generic leaf variant and its predicate canonicalizers.

pub mod algebra;
pub mod bdd;
pub mod cache;
pub mod canon;
pub mod count;
pub mod error;
pub mod eval;
pub mod interval;
pub mod leaf;
pub mod node;
pub mod ranges;
pub mod reference;
pub mod sample;
pub mod table;
