//! Scriptable browser for core tests.
//!
//! Implements all three collaborator traits. Every call is appended to an
//! event log so tests can assert on ordering.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use claimrunner_protocols::{
    BrowserError, ClaimCheck, ClaimId, ClickDriver, ClickOutcome, DriverCommand, DriverReport,
    LinkCandidate, LoadState, PageProbe, ReferencePoint, Slot, SlotValue, TabHandle, TabHost,
};

#[derive(Default)]
struct TabSlots {
    point: Option<ReferencePoint>,
    last: Option<DriverReport>,
}

pub struct FakeBrowser {
    events: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    open_tabs: Mutex<HashSet<String>>,
    slots: Mutex<HashMap<String, TabSlots>>,

    /// Where the user clicks when the capture overlay is shown. `None` means
    /// nobody ever clicks.
    pub user_click: Mutex<Option<ReferencePoint>>,
    pub click_ok: Mutex<bool>,
    pub claim: Mutex<ClaimCheck>,
    pub never_loads: Mutex<bool>,
    /// URLs (substring match) whose tab cannot be opened.
    pub fail_open: Mutex<Vec<String>>,
    /// URLs (substring match) where attaching the page agent fails.
    pub fail_attach: Mutex<Vec<String>>,
    /// Time spent inside `open_tab`.
    pub open_delay: Mutex<Duration>,

    pub active: Mutex<Option<TabHandle>>,
    pub links: Mutex<Option<Vec<LinkCandidate>>>,
    pub page_claimed: Mutex<Option<Vec<ClaimId>>>,
}

impl FakeBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            open_tabs: Mutex::new(HashSet::new()),
            slots: Mutex::new(HashMap::new()),
            user_click: Mutex::new(Some(ReferencePoint::new(120.0, 340.0, 1280, 720))),
            click_ok: Mutex::new(true),
            claim: Mutex::new(ClaimCheck {
                found: true,
                method: Some("btn.btn-primary".to_string()),
                text: Some("Claim".to_string()),
                error: None,
            }),
            never_loads: Mutex::new(false),
            fail_open: Mutex::new(Vec::new()),
            fail_attach: Mutex::new(Vec::new()),
            open_delay: Mutex::new(Duration::ZERO),
            active: Mutex::new(None),
            links: Mutex::new(Some(Vec::new())),
            page_claimed: Mutex::new(Some(Vec::new())),
        })
    }

    /// Show a wplace page with the given links and page-claimed ids.
    pub fn show_page(&self, links: Vec<LinkCandidate>, claimed: Vec<ClaimId>) {
        *self.active.lock() = Some(TabHandle::new("active", "https://wplace.live/?lat=1&lng=2"));
        *self.links.lock() = Some(links);
        *self.page_claimed.lock() = Some(claimed);
    }

    fn record(&self, event: String) {
        self.events.lock().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events.lock().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn open_tab_count(&self) -> usize {
        self.open_tabs.lock().len()
    }

    fn matches(list: &Mutex<Vec<String>>, url: &str) -> bool {
        list.lock().iter().any(|p| url.contains(p.as_str()))
    }
}

#[async_trait]
impl TabHost for FakeBrowser {
    async fn open_tab(&self, url: &str, foreground: bool) -> Result<TabHandle, BrowserError> {
        self.record(format!("open:{}", url));
        let delay = *self.open_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if Self::matches(&self.fail_open, url) {
            return Err(BrowserError::NavigationFailed(url.to_string()));
        }
        let id = format!("tab-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.open_tabs.lock().insert(id.clone());
        self.slots.lock().insert(id.clone(), TabSlots::default());
        let tab = TabHandle::new(id, url);
        if foreground {
            *self.active.lock() = Some(tab.clone());
        }
        Ok(tab)
    }

    async fn load_state(&self, _tab: &TabHandle) -> Result<LoadState, BrowserError> {
        if *self.never_loads.lock() {
            Ok(LoadState::Loading)
        } else {
            Ok(LoadState::Complete)
        }
    }

    async fn activate_tab(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        self.record(format!("activate:{}", tab.url));
        Ok(())
    }

    async fn close_tab(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        self.record(format!("close:{}", tab.url));
        self.open_tabs.lock().remove(&tab.id);
        self.slots.lock().remove(&tab.id);
        Ok(())
    }

    async fn active_tab(&self) -> Result<Option<TabHandle>, BrowserError> {
        Ok(self.active.lock().clone())
    }
}

#[async_trait]
impl ClickDriver for FakeBrowser {
    async fn attach(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        if Self::matches(&self.fail_attach, &tab.url) {
            return Err(BrowserError::PageScript("attach refused".to_string()));
        }
        Ok(())
    }

    async fn dispatch(&self, tab: &TabHandle, command: DriverCommand) -> Result<(), BrowserError> {
        self.record(format!("dispatch:{}:{}", command.name(), tab.url));
        let mut slots = self.slots.lock();
        let slot = slots
            .get_mut(&tab.id)
            .ok_or_else(|| BrowserError::TabNotFound(tab.id.clone()))?;
        match command {
            DriverCommand::InstallCapture => {
                slot.last = Some(DriverReport::CaptureInstalled);
                if let Some(point) = *self.user_click.lock() {
                    slot.point = Some(point);
                }
            }
            DriverCommand::ClickAt(_) => {
                slot.last = Some(DriverReport::ClickAt {
                    click: ClickOutcome {
                        ok: *self.click_ok.lock(),
                        attempts: Some(1),
                        error: None,
                    },
                    claim: Some(self.claim.lock().clone()),
                });
            }
            DriverCommand::FindAndClickClaim => {
                slot.last = Some(DriverReport::ClaimAttempt {
                    claim: self.claim.lock().clone(),
                });
            }
        }
        Ok(())
    }

    async fn read_slot(&self, tab: &TabHandle, slot: Slot) -> Result<Option<SlotValue>, BrowserError> {
        let slots = self.slots.lock();
        let Some(tab_slots) = slots.get(&tab.id) else {
            return Err(BrowserError::TabNotFound(tab.id.clone()));
        };
        Ok(match slot {
            Slot::Point => tab_slots.point.map(SlotValue::Point),
            Slot::LastResult => tab_slots.last.clone().map(SlotValue::Report),
        })
    }
}

#[async_trait]
impl PageProbe for FakeBrowser {
    async fn extract_links(&self, _tab: &TabHandle) -> Result<Vec<LinkCandidate>, BrowserError> {
        self.record("extract_links".to_string());
        self.links
            .lock()
            .clone()
            .ok_or_else(|| BrowserError::PageScript("extract failed".to_string()))
    }

    async fn claimed_on_page(&self, _tab: &TabHandle) -> Result<Vec<ClaimId>, BrowserError> {
        self.page_claimed
            .lock()
            .clone()
            .ok_or_else(|| BrowserError::PageScript("no claimed tips".to_string()))
    }

    async fn claim_control(&self, tab: &TabHandle) -> Result<ClaimCheck, BrowserError> {
        self.record(format!("claim_control:{}", tab.url));
        Ok(self.claim.lock().clone())
    }
}
