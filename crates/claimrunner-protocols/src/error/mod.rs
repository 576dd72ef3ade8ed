//! Error types shared across the collaborator boundary.

mod browser;
mod storage;

pub use browser::*;
pub use storage::*;
