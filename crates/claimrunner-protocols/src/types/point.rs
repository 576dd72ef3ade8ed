//! Calibrated click position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where on screen to click for every tab of a run.
///
/// Coordinates are viewport (client) coordinates at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl ReferencePoint {
    pub fn new(x: f64, y: f64, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            x,
            y,
            viewport_width,
            viewport_height,
            timestamp: Utc::now(),
        }
    }
}
