//! Enum/index conversions for table-driven lookups
//!
//! Roles, strategies and timings index into fixed-size tables; these
//! traits make the round trip fallible instead of panicking on a bad
//! index from a caller.

use anyhow::Result;

/// Fallible construction from a table index
pub trait FromIndex: Sized {
    fn from_index(idx: usize) -> Result<Self>;
}

/// Fallible conversion into a table index
pub trait ToIndex {
    fn to_index(&self) -> Result<usize>;
}
