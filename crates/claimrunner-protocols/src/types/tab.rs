//! Browser tab handles.

use serde::{Deserialize, Serialize};

/// Opaque handle to a browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabHandle {
    /// Backend-specific tab identifier.
    pub id: String,
    /// URL the tab was opened with or last reported.
    pub url: String,
}

impl TabHandle {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Document load state of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Complete,
}
