use thiserror::Error;

/// Failures reported by algebra operations whose preconditions do not hold.
///
/// Preconditions are checked before any table or cache is touched, so a
/// failed call leaves the algebra context unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    #[error("the set must be nonempty")]
    EmptySet,
    #[error("bit bound {max_bit} is below the ordinal {ordinal} of the set")]
    InvalidBound { max_bit: u32, ordinal: i32 },
    #[error("bit bound {max_bit} exceeds the largest supported bit {limit}")]
    WidthOverflow { max_bit: u32, limit: u32 },
    #[error("value {value:#x} does not fit into bits 0..={max_bit}")]
    ValueOutOfRange { value: u64, max_bit: u32 },
    #[error("the Boolean algebra is not atomic")]
    NotAtomic,
}

pub type Result<T> = std::result::Result<T, AlgebraError>;
