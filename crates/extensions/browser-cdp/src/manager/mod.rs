//! Chrome instance manager.
//!
//! Owns the CDP connection, launches Chrome with a persistent profile when
//! nothing listens on the debugging port, and caches one page session per
//! tab. Connection is lazy: nothing happens until the first tab operation.

mod manager_core;
mod manager_tabs;

use std::collections::HashMap;
use std::sync::Arc;

use claimrunner_config::BrowserConfig;
use tokio::process::Child;
use tokio::sync::{Mutex, RwLock};

use crate::cdp::{CdpClient, PageSession};

/// Chrome-backed [`TabHost`](claimrunner_protocols::TabHost),
/// [`ClickDriver`](claimrunner_protocols::ClickDriver) and
/// [`PageProbe`](claimrunner_protocols::PageProbe).
pub struct CdpBrowser {
    config: BrowserConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    sessions: parking_lot::Mutex<HashMap<String, Arc<PageSession>>>,
    /// Chrome process handle (if we launched it).
    chrome_process: Mutex<Option<Child>>,
}

impl CdpBrowser {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            sessions: parking_lot::Mutex::new(HashMap::new()),
            chrome_process: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
