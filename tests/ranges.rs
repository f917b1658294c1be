//! Range conversion round-trips.

use bvset::bdd::Bdd;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Sorted, disjoint, non-adjacent intervals within `0..=max`.
fn random_ranges(rng: &mut impl Rng, max: u64, n: usize) -> Vec<(u64, u64)> {
    let mut points: Vec<u64> = (0..2 * n).map(|_| rng.random_range(0..=max)).collect();
    points.sort_unstable();
    points.dedup();

    let mut res: Vec<(u64, u64)> = Vec::new();
    for pair in points.chunks_exact(2) {
        let (lo, hi) = (pair[0], pair[1]);
        match res.last() {
            // keep a gap so that neighbours cannot merge
            Some(&(_, last_hi)) if lo <= last_hi + 1 => continue,
            _ => res.push((lo, hi)),
        }
    }
    res
}

fn build(bdd: &Bdd, ranges: &[(u64, u64)], max_bit: u32) -> bvset::reference::Ref {
    let sets: Vec<_> = ranges.iter().map(|&(lo, hi)| bdd.from_range(lo, hi, max_bit).unwrap()).collect();
    bdd.apply_or_many(sets)
}

#[test]
fn round_trip_16_bits() {
    let bdd = Bdd::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..50 {
        let ranges = random_ranges(&mut rng, 0xFFFF, 8);
        let set = build(&bdd, &ranges, 15);
        assert_eq!(bdd.to_ranges64(set, 15).unwrap(), ranges);
        assert_eq!(bdd.range_count(set, 15).unwrap(), ranges.len());
    }
}

#[test]
fn round_trip_32_bits() {
    let bdd = Bdd::default();
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    for _ in 0..20 {
        let ranges = random_ranges(&mut rng, u32::MAX as u64, 6);
        let set = build(&bdd, &ranges, 31);
        let expected: Vec<(u32, u32)> = ranges.iter().map(|&(lo, hi)| (lo as u32, hi as u32)).collect();
        assert_eq!(bdd.to_ranges(set, 31).unwrap(), expected);
    }
}

#[test]
fn round_trip_64_bits() {
    let bdd = Bdd::default();
    let mut rng = ChaCha8Rng::seed_from_u64(44);
    for _ in 0..20 {
        let ranges = random_ranges(&mut rng, u64::MAX - 1, 4);
        let set = build(&bdd, &ranges, 63);
        assert_eq!(bdd.to_ranges64(set, 63).unwrap(), ranges);
    }
}

#[test]
fn adjacent_ranges_merge() {
    let bdd = Bdd::default();
    let set = build(&bdd, &[(0x30, 0x39), (0x3A, 0x40), (0x61, 0x7A)], 7);
    assert_eq!(bdd.to_ranges(set, 7).unwrap(), vec![(0x30, 0x40), (0x61, 0x7A)]);
}

#[test]
fn wider_width_replicates() {
    let bdd = Bdd::default();
    let set = bdd.from_range(0xF0, 0x10F, 8).unwrap();
    assert_eq!(
        bdd.to_ranges(set, 9).unwrap(),
        vec![(0xF0, 0x10F), (0x2F0, 0x30F)]
    );
}

#[test]
fn wrap_around_merges_across_copies() {
    let bdd = Bdd::default();
    // Everything but 5..=10 over 4 bits touches both ends of the block.
    let set = bdd.apply_not(bdd.from_range(5, 10, 3).unwrap());
    assert_eq!(bdd.to_ranges(set, 3).unwrap(), vec![(0, 4), (11, 15)]);
    assert_eq!(
        bdd.to_ranges(set, 5).unwrap(),
        vec![(0, 4), (11, 20), (27, 36), (43, 52), (59, 63)]
    );
}

#[test]
fn ranges_agree_with_membership() {
    let bdd = Bdd::default();
    let mut rng = ChaCha8Rng::seed_from_u64(45);
    for _ in 0..20 {
        let mut set = bdd.empty();
        for _ in 0..5 {
            let v = rng.random_range(0..256u64);
            let part = if rng.random_bool(0.5) {
                bdd.from_value(v, 7).unwrap()
            } else {
                bdd.bit_true(rng.random_range(0..8))
            };
            set = bdd.apply_xor(set, part);
        }

        let ranges = bdd.to_ranges(set, 7).unwrap();
        for v in 0..256u32 {
            let inside = ranges.iter().any(|&(lo, hi)| lo <= v && v <= hi);
            assert_eq!(inside, bdd.contains(set, v as u64));
        }
        for pair in ranges.windows(2) {
            assert!(pair[0].1 + 1 < pair[1].0, "ranges must be sorted and separated");
        }
    }
}
