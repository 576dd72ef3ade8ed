//! Tab lifecycle over CDP targets.

use async_trait::async_trait;
use claimrunner_protocols::{BrowserError, LoadState, TabHandle, TabHost};
use tracing::debug;

use super::CdpBrowser;
use crate::cdp::{CdpError, DocumentState, PageInfo, PageVisibility, ReadyState};

const DOCUMENT_STATE: &str = "({ readyState: document.readyState, href: location.href })";
const PAGE_VISIBILITY: &str =
    "({ visible: document.visibilityState === 'visible', focused: document.hasFocus() })";

/// A fresh target reports `about:blank` as complete before navigation starts.
pub(crate) fn load_state_of(doc: &DocumentState, requested_url: &str) -> LoadState {
    let blank = doc.href == "about:blank" && requested_url != "about:blank";
    if doc.ready_state == ReadyState::Complete && !blank {
        LoadState::Complete
    } else {
        LoadState::Loading
    }
}

#[async_trait]
impl TabHost for CdpBrowser {
    async fn open_tab(&self, url: &str, foreground: bool) -> Result<TabHandle, BrowserError> {
        let client = self.client().await?;
        let target_id = client.create_target(url, !foreground).await?;
        if foreground {
            client.activate_target(&target_id).await?;
        }
        Ok(TabHandle::new(target_id, url))
    }

    async fn load_state(&self, tab: &TabHandle) -> Result<LoadState, BrowserError> {
        let value = self.evaluate_in(&tab.id, DOCUMENT_STATE).await?;
        let doc: DocumentState = serde_json::from_value(value)
            .map_err(|e| BrowserError::PageScript(format!("document state: {}", e)))?;
        Ok(load_state_of(&doc, &tab.url))
    }

    async fn activate_tab(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        let client = self.client().await?;
        client.activate_target(&tab.id).await?;
        Ok(())
    }

    async fn close_tab(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        self.forget_session(&tab.id);
        let client = self.client().await?;
        client.close_target(&tab.id).await.map_err(|e| match e {
            CdpError::Protocol { .. } => BrowserError::TabNotFound(tab.id.clone()),
            other => other.into(),
        })?;
        debug!("Closed tab {}", tab.id);
        Ok(())
    }

    /// The visible page of the browser, preferring the one holding focus.
    ///
    /// Tabs opened in the background are never visible, so they are not
    /// mistaken for the user's tab.
    async fn active_tab(&self) -> Result<Option<TabHandle>, BrowserError> {
        let client = self.client().await?;
        let pages = client.list_pages().await?;

        let mut candidates = Vec::new();
        for page in pages.into_iter().filter(PageInfo::is_user_page) {
            let visibility = match self.evaluate_in(&page.id, PAGE_VISIBILITY).await {
                Ok(value) => serde_json::from_value(value).unwrap_or_default(),
                Err(e) => {
                    debug!("Skipping page {} while looking for the active tab: {}", page.id, e);
                    continue;
                }
            };
            candidates.push((page, visibility));
        }

        Ok(pick_foreground(candidates).map(|p| TabHandle::new(p.id, p.url)))
    }
}

/// First focused visible page, else the first visible one.
pub(crate) fn pick_foreground(candidates: Vec<(PageInfo, PageVisibility)>) -> Option<PageInfo> {
    let focused = candidates
        .iter()
        .position(|(_, v)| v.visible && v.focused);
    let index = focused.or_else(|| candidates.iter().position(|(_, v)| v.visible))?;
    candidates.into_iter().nth(index).map(|(page, _)| page)
}
