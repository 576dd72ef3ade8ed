//! Bounded-wait request/response channel to the page agent.
//!
//! Commands are fire-and-forget; replies land in a slot on the page that is
//! polled until a deadline. Nothing here blocks on the page indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use claimrunner_protocols::{
    BrowserError, ClickDriver, DriverCommand, DriverReport, ReferencePoint, Slot, SlotValue,
    TabHandle,
};

#[derive(Clone)]
pub struct PageChannel {
    driver: Arc<dyn ClickDriver>,
}

impl PageChannel {
    pub fn new(driver: Arc<dyn ClickDriver>) -> Self {
        Self { driver }
    }

    pub async fn attach(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        self.driver.attach(tab).await
    }

    pub async fn send(&self, tab: &TabHandle, command: DriverCommand) -> Result<(), BrowserError> {
        debug!("Dispatching {} to tab {}", command.name(), tab.id);
        self.driver.dispatch(tab, command).await
    }

    /// Poll `slot` until a value satisfying `accept` shows up or `timeout`
    /// elapses. Read errors count as "nothing yet".
    pub async fn await_slot<F>(
        &self,
        tab: &TabHandle,
        slot: Slot,
        timeout: Duration,
        poll: Duration,
        accept: F,
    ) -> Option<SlotValue>
    where
        F: Fn(&SlotValue) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            match self.driver.read_slot(tab, slot).await {
                Ok(Some(value)) if accept(&value) => return Some(value),
                Ok(_) => {}
                Err(e) => trace!("Slot {:?} read failed on tab {}: {}", slot, tab.id, e),
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }

    /// Wait for the user to click on the capture overlay.
    pub async fn await_point(
        &self,
        tab: &TabHandle,
        timeout: Duration,
        poll: Duration,
    ) -> Option<ReferencePoint> {
        let value = self
            .await_slot(tab, Slot::Point, timeout, poll, |v| {
                matches!(v, SlotValue::Point(_))
            })
            .await?;
        match value {
            SlotValue::Point(point) => Some(point),
            SlotValue::Report(_) => None,
        }
    }

    /// Wait for the report of a replayed click.
    pub async fn await_click_report(
        &self,
        tab: &TabHandle,
        timeout: Duration,
        poll: Duration,
    ) -> Option<DriverReport> {
        let value = self
            .await_slot(tab, Slot::LastResult, timeout, poll, |v| {
                matches!(v, SlotValue::Report(DriverReport::ClickAt { .. }))
            })
            .await?;
        match value {
            SlotValue::Report(report) => Some(report),
            SlotValue::Point(_) => None,
        }
    }
}
