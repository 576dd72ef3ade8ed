//! The per-URL algorithm.

use chrono::Utc;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use claimrunner_protocols::{
    BrowserError, DriverCommand, DriverReport, LoadState, ReferencePoint, TabHandle, TargetUrl,
};

use super::state::{RunSummary, TabOutcome};
use super::Inner;

impl Inner {
    pub(super) async fn run(
        &self,
        targets: Vec<TargetUrl>,
        foreground: bool,
        cancel: CancellationToken,
    ) -> RunSummary {
        let total = targets.len();
        let mut capture_attempted = false;
        let mut outcomes = Vec::with_capacity(total);
        let mut cancelled = false;

        for (i, target) in targets.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            self.state.lock().progress.index = i;
            info!("Processing {}/{}: {}", i + 1, total, target.url);

            let outcome = self.process(target, foreground, &mut capture_attempted).await;
            self.state.lock().progress.outcomes.push(outcome.clone());
            outcomes.push(outcome);
        }

        {
            let mut state = self.state.lock();
            state.progress.index = outcomes.len();
            state.progress.cancelled = cancelled;
            state.progress.finished_at = Some(Utc::now());
        }

        if cancelled {
            info!("Run stopped after {}/{} URLs", outcomes.len(), total);
        } else {
            info!("Run finished ({} URLs)", total);
        }

        RunSummary {
            total,
            processed: outcomes.len(),
            cancelled,
            outcomes,
        }
    }

    async fn process(
        &self,
        target: &TargetUrl,
        foreground: bool,
        capture_attempted: &mut bool,
    ) -> TabOutcome {
        let mut outcome = TabOutcome::new(target);

        match self.tabs.open_tab(&target.url, foreground).await {
            Ok(tab) => {
                outcome.loaded = self.wait_for_load(&tab).await;
                sleep(self.config.after_load_delay()).await;

                if let Err(e) = self
                    .interact(&tab, foreground, capture_attempted, &mut outcome)
                    .await
                {
                    warn!("Error processing {}: {}", target.url, e);
                    outcome.error = Some(e.to_string());
                }

                if let Err(e) = self.tabs.close_tab(&tab).await {
                    debug!("Closing tab {} failed: {}", tab.id, e);
                }
            }
            Err(e) => {
                warn!("Failed to open {}: {}", target.url, e);
                outcome.error = Some(e.to_string());
            }
        }

        sleep(self.config.tab_settle()).await;
        outcome
    }

    /// Poll until the tab reports complete. Timeouts and errors just end the wait.
    async fn wait_for_load(&self, tab: &TabHandle) -> bool {
        let deadline = Instant::now() + self.config.load_timeout();
        loop {
            match self.tabs.load_state(tab).await {
                Ok(LoadState::Complete) => return true,
                Ok(LoadState::Loading) => {}
                Err(e) => {
                    debug!("Load state of tab {} unavailable: {}", tab.id, e);
                    return false;
                }
            }
            if Instant::now() >= deadline {
                debug!("Tab {} did not finish loading in time", tab.id);
                return false;
            }
            sleep(self.config.load_poll()).await;
        }
    }

    async fn interact(
        &self,
        tab: &TabHandle,
        foreground: bool,
        capture_attempted: &mut bool,
        outcome: &mut TabOutcome,
    ) -> Result<(), BrowserError> {
        self.channel.attach(tab).await?;

        if self.reference.read().is_none() && !*capture_attempted {
            *capture_attempted = true;
            outcome.captured = self.capture(tab).await?;
        }

        let Some(point) = *self.reference.read() else {
            warn!("No reference point, skipping click for {}", tab.url);
            return Ok(());
        };

        if foreground {
            self.tabs.activate_tab(tab).await?;
        }
        sleep(self.config.pre_click_delay()).await;
        self.channel.send(tab, DriverCommand::ClickAt(point)).await?;

        match self
            .channel
            .await_click_report(tab, self.config.result_timeout(), self.config.result_poll())
            .await
        {
            Some(DriverReport::ClickAt { click, .. }) => {
                debug!("Click report from tab {}: {:?}", tab.id, click);
                outcome.clicked = click.ok;
            }
            _ => {
                debug!("No click report from tab {}", tab.id);
                sleep(self.config.no_result_delay()).await;
            }
        }

        let claim = self.probe.claim_control(tab).await?;
        debug!("Claim check on tab {}: {:?}", tab.id, claim);
        outcome.claim_found = claim.found;
        outcome.claim_text = claim.text;
        Ok(())
    }

    /// Install the overlay and wait for the calibration click.
    async fn capture(&self, tab: &TabHandle) -> Result<bool, BrowserError> {
        self.channel.send(tab, DriverCommand::InstallCapture).await?;
        info!("Waiting for the reference click on tab {}", tab.id);

        let point = self
            .channel
            .await_point(tab, self.config.capture_timeout(), self.config.capture_poll())
            .await;

        match point {
            Some(point) => Ok(self.store_reference(point)),
            None => {
                warn!("Failed to capture a reference point on tab {}", tab.id);
                Ok(false)
            }
        }
    }

    fn store_reference(&self, point: ReferencePoint) -> bool {
        let mut reference = self.reference.write();
        if reference.is_some() {
            return false;
        }
        info!("Captured reference point ({}, {})", point.x, point.y);
        *reference = Some(point);
        true
    }
}
