//! Injected page agent and the driver/probe built on it.
//!
//! The agent (`page_agent.js`) is installed lazily into each document and
//! exposes `dispatch`, `readSlot`, `extractLinks`, `claimedOnPage` and
//! `claimControl` on `window.__claimrunnerAgent`.

use async_trait::async_trait;
use claimrunner_protocols::{
    dedup_by_href, normalize_ids, BrowserError, ClaimCheck, ClaimId, ClickDriver, DriverCommand,
    DriverReport, LinkCandidate, PageProbe, ReferencePoint, Slot, SlotValue, TabHandle,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::manager::CdpBrowser;

/// Source of the page agent.
pub fn agent_script() -> &'static str {
    include_str!("page_agent.js")
}

/// Expression that installs the agent if missing, then evaluates `call` on it.
pub(crate) fn agent_call(call: &str) -> String {
    format!(
        "(() => {{ if (!window.__claimrunnerAgent) {{ {} }} return window.__claimrunnerAgent.{}; }})()",
        agent_script(),
        call
    )
}

pub(crate) fn command_payload(command: &DriverCommand) -> Value {
    match command {
        DriverCommand::ClickAt(point) => json!({ "type": command.name(), "point": point }),
        other => json!({ "type": other.name() }),
    }
}

fn slot_name(slot: Slot) -> &'static str {
    match slot {
        Slot::Point => "point",
        Slot::LastResult => "lastResult",
    }
}

/// Interpret a raw slot value. Unrecognised shapes read as empty.
pub(crate) fn parse_slot(slot: Slot, raw: Value) -> Option<SlotValue> {
    if raw.is_null() {
        return None;
    }
    let parsed = match slot {
        Slot::Point => serde_json::from_value::<ReferencePoint>(raw).map(SlotValue::Point),
        Slot::LastResult => serde_json::from_value::<DriverReport>(raw).map(SlotValue::Report),
    };
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring unrecognised {} slot value: {}", slot_name(slot), e);
            None
        }
    }
}

fn unexpected(what: &str, e: serde_json::Error) -> BrowserError {
    BrowserError::PageScript(format!("unexpected {} result: {}", what, e))
}

pub(crate) fn parse_links(raw: Value) -> Result<Vec<LinkCandidate>, BrowserError> {
    let links: Vec<LinkCandidate> =
        serde_json::from_value(raw).map_err(|e| unexpected("extractLinks", e))?;
    Ok(dedup_by_href(links))
}

pub(crate) fn parse_claimed(raw: Value) -> Result<Vec<ClaimId>, BrowserError> {
    let values: Vec<Value> =
        serde_json::from_value(raw).map_err(|e| unexpected("claimedOnPage", e))?;
    let mut ids = normalize_ids(&values);
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

#[async_trait]
impl ClickDriver for CdpBrowser {
    async fn attach(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        self.evaluate_in(&tab.id, &agent_call("readSlot('point')"))
            .await?;
        Ok(())
    }

    async fn dispatch(&self, tab: &TabHandle, command: DriverCommand) -> Result<(), BrowserError> {
        let payload = command_payload(&command);
        self.evaluate_in(&tab.id, &agent_call(&format!("dispatch({})", payload)))
            .await?;
        Ok(())
    }

    async fn read_slot(&self, tab: &TabHandle, slot: Slot) -> Result<Option<SlotValue>, BrowserError> {
        let call = format!("readSlot({})", json!(slot_name(slot)));
        let raw = self.evaluate_in(&tab.id, &agent_call(&call)).await?;
        Ok(parse_slot(slot, raw))
    }
}

#[async_trait]
impl PageProbe for CdpBrowser {
    async fn extract_links(&self, tab: &TabHandle) -> Result<Vec<LinkCandidate>, BrowserError> {
        let raw = self.evaluate_in(&tab.id, &agent_call("extractLinks()")).await?;
        parse_links(raw)
    }

    async fn claimed_on_page(&self, tab: &TabHandle) -> Result<Vec<ClaimId>, BrowserError> {
        let raw = self.evaluate_in(&tab.id, &agent_call("claimedOnPage()")).await?;
        parse_claimed(raw)
    }

    async fn claim_control(&self, tab: &TabHandle) -> Result<ClaimCheck, BrowserError> {
        let raw = self.evaluate_in(&tab.id, &agent_call("claimControl()")).await?;
        serde_json::from_value(raw).map_err(|e| unexpected("claimControl", e))
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
