//! Durable set of claimed item ids.
//!
//! The set is loaded once, mirrored in memory for cheap reads, and written
//! back on every effective insertion. Out-of-band edits of the durable copy
//! arrive through the storage's change channel and replace the mirror.

mod set;
mod storage;

pub use set::ClaimedSet;
pub use storage::{ClaimStorage, FileClaimStorage, MemoryClaimStorage, STORAGE_KEY};

#[cfg(test)]
#[path = "claimed_tests.rs"]
mod tests;
