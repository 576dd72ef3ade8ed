//! The owned state object behind the control surface.
//!
//! [`Controller`] ties the sequencer, the auto-scanner and the claimed set
//! together and answers [`ControlRequest`]s. The HTTP layer and the CLI both
//! go through it.

mod request;
mod response;

pub use request::ControlRequest;
pub use response::{
    Ack, ClaimedReply, ControlResponse, LinksReply, NotifyReply, StateView, SyncReply, INVALID_ID,
};

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use claimrunner_config::{ScanConfig, SequencerConfig};
use claimrunner_protocols::{
    dedup_by_href, normalize_id, BrowserError, ClaimId, ClickDriver, LinkCandidate, PageProbe,
    TabHandle, TabHost,
};

use crate::claimed::ClaimedSet;
use crate::scan::AutoScanner;
use crate::sequencer::TabSequencer;

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;

pub struct Controller {
    sequencer: TabSequencer,
    scanner: AutoScanner,
    claimed: Arc<ClaimedSet>,
    tabs: Arc<dyn TabHost>,
    probe: Arc<dyn PageProbe>,
}

impl Controller {
    pub fn new(
        tabs: Arc<dyn TabHost>,
        driver: Arc<dyn ClickDriver>,
        probe: Arc<dyn PageProbe>,
        claimed: Arc<ClaimedSet>,
        sequencer_config: SequencerConfig,
        scan_config: ScanConfig,
    ) -> Self {
        let sequencer =
            TabSequencer::new(tabs.clone(), driver, probe.clone(), sequencer_config);
        let scanner = AutoScanner::new(tabs.clone(), probe.clone(), claimed.clone(), scan_config);
        Self {
            sequencer,
            scanner,
            claimed,
            tabs,
            probe,
        }
    }

    pub fn sequencer(&self) -> &TabSequencer {
        &self.sequencer
    }

    pub fn scanner(&self) -> &AutoScanner {
        &self.scanner
    }

    pub fn claimed(&self) -> &Arc<ClaimedSet> {
        &self.claimed
    }

    /// Dispatch a tagged request.
    pub async fn handle(&self, request: ControlRequest) -> ControlResponse {
        debug!("Control request: {}", request.kind());
        match request {
            ControlRequest::Start {
                urls,
                open_in_foreground,
            } => ControlResponse::Ack(self.start(&urls, open_in_foreground)),
            ControlRequest::Stop => ControlResponse::Ack(self.stop()),
            ControlRequest::GetState => ControlResponse::State(Box::new(self.state())),
            ControlRequest::ExtractLinks => ControlResponse::Links(self.extract_links().await),
            ControlRequest::GetClaimedOnPage => {
                ControlResponse::Claimed(self.claimed_on_page().await)
            }
            ControlRequest::GetClaimedPersisted => {
                ControlResponse::Claimed(self.claimed_persisted())
            }
            ControlRequest::EnableScan => ControlResponse::Ack(self.enable_scan()),
            ControlRequest::DisableScan => ControlResponse::Ack(self.disable_scan()),
            ControlRequest::NotifyClaimed { id } => {
                ControlResponse::Notify(self.notify_claimed(&id).await)
            }
            ControlRequest::SyncClaimedFromPage => {
                ControlResponse::Sync(self.sync_claimed_from_page().await)
            }
        }
    }

    pub fn start(&self, urls: &[String], open_in_foreground: bool) -> Ack {
        match self.sequencer.start(urls, open_in_foreground) {
            Ok(_) => Ack::ok(),
            Err(e) => {
                info!("Start rejected: {}", e);
                Ack::rejected(e.reason())
            }
        }
    }

    /// Always acknowledged; stopping an idle sequencer is a no-op.
    pub fn stop(&self) -> Ack {
        self.sequencer.stop();
        Ack::ok()
    }

    pub fn state(&self) -> StateView {
        let phase = self.sequencer.phase();
        StateView {
            running: phase.is_active(),
            phase,
            reference_point: self.sequencer.reference_point(),
            scan_enabled: self.scanner.is_enabled(),
            last_scan_results: self.scanner.results(),
            last_scan: self.scanner.last_scan(),
            progress: self.sequencer.progress(),
            claimed_count: self.claimed.len(),
        }
    }

    async fn active_tab(&self) -> Result<TabHandle, BrowserError> {
        self.tabs.active_tab().await?.ok_or(BrowserError::NoActiveTab)
    }

    async fn links_on_active_tab(&self) -> Result<Vec<LinkCandidate>, BrowserError> {
        let tab = self.active_tab().await?;
        Ok(dedup_by_href(self.probe.extract_links(&tab).await?))
    }

    async fn ids_on_active_tab(&self) -> Result<Vec<ClaimId>, BrowserError> {
        let tab = self.active_tab().await?;
        let mut ids = self.probe.claimed_on_page(&tab).await?;
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    pub async fn extract_links(&self) -> LinksReply {
        match self.links_on_active_tab().await {
            Ok(links) => LinksReply::found(links),
            Err(e) => LinksReply::failed(&e),
        }
    }

    pub async fn claimed_on_page(&self) -> ClaimedReply {
        match self.ids_on_active_tab().await {
            Ok(ids) => ClaimedReply::found(ids),
            Err(e) => ClaimedReply::failed(&e),
        }
    }

    pub fn claimed_persisted(&self) -> ClaimedReply {
        ClaimedReply::found(self.claimed.snapshot())
    }

    pub fn enable_scan(&self) -> Ack {
        self.scanner.enable();
        Ack::ok()
    }

    pub fn disable_scan(&self) -> Ack {
        self.scanner.disable();
        Ack::ok()
    }

    /// Record one claimed id. Anything but a positive integer (or numeric
    /// string) is rejected without touching the set.
    pub async fn notify_claimed(&self, id: &Value) -> NotifyReply {
        let Some(id) = normalize_id(id) else {
            debug!("notifyClaimed with invalid id {}", id);
            return NotifyReply::invalid_id();
        };
        let added = self.claimed.add(id).await;
        self.scanner.forget(id);
        if added {
            info!("Claimed id {} added", id);
        }
        NotifyReply::recorded(id, added)
    }

    /// Merge the ids the active page shows as claimed into the durable set.
    pub async fn sync_claimed_from_page(&self) -> SyncReply {
        match self.ids_on_active_tab().await {
            Ok(ids) => {
                let added = self.claimed.merge(ids.iter().copied()).await;
                for id in &ids {
                    self.scanner.forget(*id);
                }
                SyncReply::merged(added, ids)
            }
            Err(e) => SyncReply::failed(&e),
        }
    }
}
