//! Control replies. Every reply carries `ok`; failures add `error`.

use serde::{Deserialize, Serialize};

use claimrunner_protocols::{BrowserError, ClaimId, LinkCandidate, ReferencePoint};

use crate::scan::ScanReport;
use crate::sequencer::{RunPhase, RunProgress};

/// Error code for a `notifyClaimed` id that is not a positive integer.
pub const INVALID_ID: &str = "invalid_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub running: bool,
    pub phase: RunPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_point: Option<ReferencePoint>,
    pub scan_enabled: bool,
    pub last_scan_results: Vec<LinkCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan: Option<ScanReport>,
    pub progress: RunProgress,
    pub claimed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkCandidate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<Vec<ClaimId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ClaimId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<Vec<ClaimId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LinksReply {
    pub fn found(links: Vec<LinkCandidate>) -> Self {
        Self {
            ok: true,
            links: Some(links),
            error: None,
            message: None,
        }
    }

    pub fn failed(e: &BrowserError) -> Self {
        Self {
            ok: false,
            links: None,
            error: Some(e.code().to_string()),
            message: Some(e.to_string()),
        }
    }
}

impl ClaimedReply {
    pub fn found(claimed: Vec<ClaimId>) -> Self {
        Self {
            ok: true,
            claimed: Some(claimed),
            error: None,
            message: None,
        }
    }

    pub fn failed(e: &BrowserError) -> Self {
        Self {
            ok: false,
            claimed: None,
            error: Some(e.code().to_string()),
            message: Some(e.to_string()),
        }
    }
}

impl NotifyReply {
    pub fn recorded(id: ClaimId, added: bool) -> Self {
        Self {
            ok: true,
            added: Some(added),
            id: Some(id),
            error: None,
        }
    }

    pub fn invalid_id() -> Self {
        Self {
            ok: false,
            added: None,
            id: None,
            error: Some(INVALID_ID.to_string()),
        }
    }
}

impl SyncReply {
    pub fn merged(added: usize, claimed: Vec<ClaimId>) -> Self {
        Self {
            ok: true,
            added: Some(added),
            claimed: Some(claimed),
            error: None,
            message: None,
        }
    }

    pub fn failed(e: &BrowserError) -> Self {
        Self {
            ok: false,
            added: None,
            claimed: None,
            error: Some(e.code().to_string()),
            message: Some(e.to_string()),
        }
    }
}

/// Any reply, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ControlResponse {
    Ack(Ack),
    State(Box<StateView>),
    Links(LinksReply),
    Claimed(ClaimedReply),
    Notify(NotifyReply),
    Sync(SyncReply),
}

impl ControlResponse {
    pub fn is_ok(&self) -> bool {
        match self {
            ControlResponse::Ack(r) => r.ok,
            ControlResponse::State(_) => true,
            ControlResponse::Links(r) => r.ok,
            ControlResponse::Claimed(r) => r.ok,
            ControlResponse::Notify(r) => r.ok,
            ControlResponse::Sync(r) => r.ok,
        }
    }
}
