//! # claimrunner protocols
//!
//! Types and collaborator traits shared by the claimrunner crates.
//! Contains only interface definitions - no implementations.
//!
//! ## Collaborator Traits
//!
//! - [`TabHost`] - opens, activates, inspects and closes browser tabs
//! - [`ClickDriver`] - page-side command channel with pollable result slots
//! - [`PageProbe`] - read-only DOM scraping of links and claimed ids

pub mod browser;
pub mod error;
pub mod types;

pub use browser::{ClickDriver, PageProbe, TabHost};
pub use error::{BrowserError, StorageError};
pub use types::*;
