//! Control messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One control-surface request, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlRequest {
    Start {
        #[serde(default)]
        urls: Vec<String>,
        #[serde(default, rename = "openInForeground", alias = "openForeground")]
        open_in_foreground: bool,
    },
    Stop,
    GetState,
    ExtractLinks,
    GetClaimedOnPage,
    GetClaimedPersisted,
    EnableScan,
    DisableScan,
    /// `id` is kept raw so malformed values can be rejected as `invalid_id`.
    NotifyClaimed {
        #[serde(default)]
        id: Value,
    },
    SyncClaimedFromPage,
}

impl ControlRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ControlRequest::Start { .. } => "start",
            ControlRequest::Stop => "stop",
            ControlRequest::GetState => "getState",
            ControlRequest::ExtractLinks => "extractLinks",
            ControlRequest::GetClaimedOnPage => "getClaimedOnPage",
            ControlRequest::GetClaimedPersisted => "getClaimedPersisted",
            ControlRequest::EnableScan => "enableScan",
            ControlRequest::DisableScan => "disableScan",
            ControlRequest::NotifyClaimed { .. } => "notifyClaimed",
            ControlRequest::SyncClaimedFromPage => "syncClaimedFromPage",
        }
    }
}
