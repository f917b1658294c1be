use std::fmt::{Display, Formatter};

/// Handle to a node interned in one algebra context.
///
/// Handles are plain indices into the context's node table, so two handles
/// obtained from the same context are equal if and only if they denote the
/// same set. Handles from different contexts must never be mixed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

impl Ref {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Return the index of the referenced node in its table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}
