//! Chrome DevTools Protocol backend for claimrunner.
//!
//! [`CdpBrowser`] implements all three browser collaborators:
//!
//! - [`TabHost`](claimrunner_protocols::TabHost) over CDP targets
//! - [`ClickDriver`](claimrunner_protocols::ClickDriver) and
//!   [`PageProbe`](claimrunner_protocols::PageProbe) through an injected page agent
//!
//! Chrome is launched with a persistent profile when nothing listens on the
//! configured debugging port, so the game login survives restarts.

pub mod agent;
pub mod cdp;
pub mod manager;

pub use agent::agent_script;
pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::CdpBrowser;
