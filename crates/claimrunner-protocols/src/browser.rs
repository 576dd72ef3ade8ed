//! Browser collaborator traits.
//!
//! The core never talks to a browser directly. It drives tabs through
//! [`TabHost`], sends commands to the injected page agent through
//! [`ClickDriver`] and reads page facts through [`PageProbe`].

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::types::{
    ClaimCheck, ClaimId, DriverCommand, LinkCandidate, LoadState, Slot, SlotValue, TabHandle,
};

/// Tab lifecycle operations.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Open a new tab at `url`, in the foreground or background.
    async fn open_tab(&self, url: &str, foreground: bool) -> Result<TabHandle, BrowserError>;

    /// Current document load state of the tab.
    async fn load_state(&self, tab: &TabHandle) -> Result<LoadState, BrowserError>;

    /// Bring the tab to the foreground.
    async fn activate_tab(&self, tab: &TabHandle) -> Result<(), BrowserError>;

    /// Close the tab.
    async fn close_tab(&self, tab: &TabHandle) -> Result<(), BrowserError>;

    /// The tab the user is currently looking at, if any.
    async fn active_tab(&self) -> Result<Option<TabHandle>, BrowserError>;
}

/// Command channel to the page agent.
///
/// Commands do not wait for the page; callers read [`Slot`]s with their own
/// deadline.
#[async_trait]
pub trait ClickDriver: Send + Sync {
    /// Make sure the page agent is installed in the tab. Idempotent.
    async fn attach(&self, tab: &TabHandle) -> Result<(), BrowserError>;

    /// Send a command to the page agent.
    async fn dispatch(&self, tab: &TabHandle, command: DriverCommand) -> Result<(), BrowserError>;

    /// Read a result slot. `None` when the slot is empty.
    async fn read_slot(&self, tab: &TabHandle, slot: Slot) -> Result<Option<SlotValue>, BrowserError>;
}

/// Read-only page scraping.
///
/// Results are best effort; no guarantee beyond text matching.
#[async_trait]
pub trait PageProbe: Send + Sync {
    /// Candidate links with inferred item ids, deduplicated by href.
    async fn extract_links(&self, tab: &TabHandle) -> Result<Vec<LinkCandidate>, BrowserError>;

    /// Item ids the page itself shows as claimed, sorted.
    async fn claimed_on_page(&self, tab: &TabHandle) -> Result<Vec<ClaimId>, BrowserError>;

    /// Whether a claim control is present.
    async fn claim_control(&self, tab: &TabHandle) -> Result<ClaimCheck, BrowserError>;
}
