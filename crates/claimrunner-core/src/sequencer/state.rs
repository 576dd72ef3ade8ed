//! Run phase and progress records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use claimrunner_protocols::{ClaimId, TargetUrl};

/// Lifecycle of the sequencer. Only `Idle` accepts a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Stopping,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Running => "running",
            RunPhase::Stopping => "stopping",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, RunPhase::Idle)
    }
}

/// What happened to one URL of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabOutcome {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ClaimId>,
    /// Page reported complete before the load timeout.
    pub loaded: bool,
    /// The reference point was captured on this tab.
    pub captured: bool,
    /// The page agent reported a successful replayed click.
    pub clicked: bool,
    pub claim_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TabOutcome {
    pub fn new(target: &TargetUrl) -> Self {
        Self {
            url: target.url.clone(),
            id: target.id,
            ..Default::default()
        }
    }
}

/// Progress of the current run, or of the last one once idle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProgress {
    pub total: usize,
    /// Zero-based index of the URL being processed; equals `total` when done.
    pub index: usize,
    pub foreground: bool,
    pub outcomes: Vec<TabOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub cancelled: bool,
}

impl RunProgress {
    pub(crate) fn begin(total: usize, foreground: bool) -> Self {
        Self {
            total,
            foreground,
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub processed: usize,
    pub cancelled: bool,
    pub outcomes: Vec<TabOutcome>,
}

impl RunSummary {
    pub fn claims_found(&self) -> usize {
        self.outcomes.iter().filter(|o| o.claim_found).count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}
