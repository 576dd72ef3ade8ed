//! Periodic re-scan of the active tab.
//!
//! Each scan extracts candidate links from the active tab, drops the ones
//! already claimed (durably or on the page) and caches the rest.

mod filter;

pub use filter::{filter_unclaimed, host_matches};

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use claimrunner_config::ScanConfig;
use claimrunner_protocols::{ClaimId, LinkCandidate, PageProbe, TabHost};

use crate::claimed::ClaimedSet;

/// Result of one scan tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Nothing was probed and the cached results are untouched.
    Skipped { reason: String },
    Completed {
        found: usize,
        retained: usize,
        /// Page-claimed ids newly merged into the durable set.
        persisted: usize,
    },
    /// Link extraction failed; the cached results are untouched.
    Failed { error: String },
}

impl ScanOutcome {
    fn skipped(reason: &str) -> Self {
        ScanOutcome::Skipped {
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub at: DateTime<Utc>,
    pub outcome: ScanOutcome,
}

#[derive(Default)]
struct ScanState {
    /// Cancels the periodic task when dropped.
    task: Option<DropGuard>,
    results: Vec<LinkCandidate>,
    last: Option<ScanReport>,
}

struct Inner {
    tabs: Arc<dyn TabHost>,
    probe: Arc<dyn PageProbe>,
    claimed: Arc<ClaimedSet>,
    config: ScanConfig,
    state: Mutex<ScanState>,
}

#[derive(Clone)]
pub struct AutoScanner {
    inner: Arc<Inner>,
}

impl AutoScanner {
    pub fn new(
        tabs: Arc<dyn TabHost>,
        probe: Arc<dyn PageProbe>,
        claimed: Arc<ClaimedSet>,
        config: ScanConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                tabs,
                probe,
                claimed,
                config,
                state: Mutex::new(ScanState::default()),
            }),
        }
    }

    /// Start the periodic task. The first scan runs immediately.
    ///
    /// Returns `false` if scanning was already enabled.
    pub fn enable(&self) -> bool {
        let mut state = self.inner.state.lock();
        if state.task.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let period = self.inner.config.interval();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(inner) = weak.upgrade() else { break };
                        AutoScanner { inner }.scan_now().await;
                    }
                }
            }
            debug!("Auto-scan task stopped");
        });

        state.task = Some(cancel.drop_guard());
        info!("Auto-scan enabled (every {} min)", self.inner.config.interval_minutes);
        true
    }

    /// Stop the periodic task. Returns `false` if it was not running.
    pub fn disable(&self) -> bool {
        let task = self.inner.state.lock().task.take();
        match task {
            Some(guard) => {
                drop(guard);
                info!("Auto-scan disabled");
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.state.lock().task.is_some()
    }

    /// Candidates retained by the most recent completed scan.
    pub fn results(&self) -> Vec<LinkCandidate> {
        self.inner.state.lock().results.clone()
    }

    pub fn last_scan(&self) -> Option<ScanReport> {
        self.inner.state.lock().last.clone()
    }

    /// Drop cached candidates carrying `id`.
    pub fn forget(&self, id: ClaimId) {
        self.inner
            .state
            .lock()
            .results
            .retain(|c| c.id != Some(id));
    }

    /// Run one scan right away.
    pub async fn scan_now(&self) -> ScanOutcome {
        let outcome = self.scan_once().await;
        match &outcome {
            ScanOutcome::Completed { found, retained, .. } => {
                info!("Auto-scan: {} links, {} unclaimed", found, retained)
            }
            ScanOutcome::Skipped { reason } => debug!("Auto-scan skipped: {}", reason),
            ScanOutcome::Failed { error } => warn!("Auto-scan failed: {}", error),
        }
        self.inner.state.lock().last = Some(ScanReport {
            at: Utc::now(),
            outcome: outcome.clone(),
        });
        outcome
    }

    async fn scan_once(&self) -> ScanOutcome {
        let inner = &self.inner;

        let tab = match inner.tabs.active_tab().await {
            Ok(Some(tab)) => tab,
            Ok(None) => return ScanOutcome::skipped("no_active_tab"),
            Err(e) => {
                debug!("Active tab lookup failed: {}", e);
                return ScanOutcome::skipped("no_active_tab");
            }
        };

        match host_matches(&tab.url, &inner.config.target_host) {
            Some(true) => {}
            Some(false) => return ScanOutcome::skipped("host_mismatch"),
            None => return ScanOutcome::skipped("unparseable_url"),
        }

        let page_claimed = match inner.probe.claimed_on_page(&tab).await {
            Ok(ids) => ids,
            Err(e) => {
                debug!("Claimed-on-page probe failed, using stored set only: {}", e);
                Vec::new()
            }
        };

        let links = match inner.probe.extract_links(&tab).await {
            Ok(links) => links,
            Err(e) => {
                return ScanOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        let found = links.len();

        let mut retained = filter_unclaimed(links, &inner.claimed.set(), &page_claimed);
        let retained_count = {
            let mut state = inner.state.lock();
            // Ids recorded while the page was being read were already forgotten.
            retained.retain(|c| c.id.is_none_or(|id| !inner.claimed.contains(id)));
            let count = retained.len();
            state.results = retained;
            count
        };

        let persisted = if inner.config.persist_page_claims && !page_claimed.is_empty() {
            inner.claimed.merge(page_claimed).await
        } else {
            0
        };

        ScanOutcome::Completed {
            found,
            retained: retained_count,
            persisted,
        }
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
