//! Messages exchanged with the page-side agent.

use serde::{Deserialize, Serialize};

use super::ReferencePoint;

/// Command sent to the page agent. Fire-and-forget; results land in a [`Slot`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCommand {
    /// Show the one-shot calibration overlay.
    InstallCapture,
    /// Replay a pointer click at the point, then attempt the claim.
    ClickAt(ReferencePoint),
    /// Only attempt the claim control.
    FindAndClickClaim,
}

impl DriverCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DriverCommand::InstallCapture => "installCapture",
            DriverCommand::ClickAt(_) => "clickAt",
            DriverCommand::FindAndClickClaim => "findAndClickClaim",
        }
    }
}

/// Pollable result slot on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The captured calibration point.
    Point,
    /// The report of the most recent command.
    LastResult,
}

/// Value read from a [`Slot`].
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Point(ReferencePoint),
    Report(DriverReport),
}

/// Report written by the page agent after a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DriverReport {
    CaptureInstalled,
    PointCaptured {
        point: ReferencePoint,
    },
    ClickAt {
        click: ClickOutcome,
        #[serde(default)]
        claim: Option<ClaimCheck>,
    },
    ClaimAttempt {
        #[serde(flatten)]
        claim: ClaimCheck,
    },
}

/// Outcome of a synthetic click.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClickOutcome {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of looking for (and pressing) the claim control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClaimCheck {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
