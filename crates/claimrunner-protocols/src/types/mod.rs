//! Shared data types.

mod claim;
mod link;
mod page;
mod point;
mod tab;

pub use claim::*;
pub use link::*;
pub use page::*;
pub use point::*;
pub use tab::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
