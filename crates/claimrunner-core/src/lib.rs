//! # claimrunner core
//!
//! The stateful part of claimrunner:
//!
//! - [`ClaimedSet`] - durable set of claimed item ids with change notifications
//! - [`TabSequencer`] - processes a URL list one tab at a time, capturing the
//!   calibration point once and reusing it
//! - [`AutoScanner`] - periodic re-scan of the active tab, filtered against the
//!   claimed set
//! - [`Controller`] - the owned state object behind the control surface
//!
//! Browser access goes exclusively through the collaborator traits of
//! `claimrunner-protocols`.

pub mod claimed;
pub mod control;
pub mod error;
pub mod page_channel;
pub mod scan;
pub mod sequencer;

pub use claimed::{ClaimStorage, ClaimedSet, FileClaimStorage, MemoryClaimStorage};
pub use control::{ControlRequest, ControlResponse, Controller, StateView};
pub use error::SequencerError;
pub use page_channel::PageChannel;
pub use scan::{AutoScanner, ScanOutcome, ScanReport};
pub use sequencer::{RunHandle, RunPhase, RunProgress, RunSummary, TabOutcome, TabSequencer};
