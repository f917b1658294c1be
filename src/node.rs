use crate::reference::Ref;

/// A decision node: the set of bit-vectors whose bit `ordinal` selects
/// between the `high` (bit is 1) and `low` (bit is 0) subsets.
///
/// Terminal nodes of [`Bdd`][crate::bdd::Bdd] reuse this layout with a
/// negative sentinel ordinal, so that comparing ordinals always places
/// terminals below every decision node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub ordinal: i32,
    pub high: Ref,
    pub low: Ref,
}

impl Node {
    /// Sentinel ordinal of the full set.
    pub const FULL_ORDINAL: i32 = -1;
    /// Sentinel ordinal of the empty set.
    pub const EMPTY_ORDINAL: i32 = -2;

    pub const fn new(ordinal: i32, high: Ref, low: Ref) -> Self {
        Self { ordinal, high, low }
    }

    pub const fn is_terminal(&self) -> bool {
        self.ordinal < 0
    }
}

/// Convert a public bit index into a node ordinal.
///
/// # Panics
///
/// Panics if `bit` does not fit into the ordinal range.
pub(crate) fn ordinal_of(bit: u32) -> i32 {
    assert!(bit <= i32::MAX as u32, "Bit index {} is too large", bit);
    bit as i32
}

/// Mask with the lowest `width` bits set; saturates at 64 bits.
pub(crate) const fn ones(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
