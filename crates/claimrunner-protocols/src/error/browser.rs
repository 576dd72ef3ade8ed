//! Browser collaborator errors.

use thiserror::Error;

/// Errors reported by a [`TabHost`](crate::TabHost), [`ClickDriver`](crate::ClickDriver)
/// or [`PageProbe`](crate::PageProbe).
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Page script error: {0}")]
    PageScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),
}

impl BrowserError {
    /// Short machine-readable code used in control-surface responses.
    pub fn code(&self) -> &'static str {
        match self {
            BrowserError::ConnectionFailed(_)
            | BrowserError::NotConnected
            | BrowserError::ChromeNotFound
            | BrowserError::LaunchFailed(_) => "browser_unavailable",
            BrowserError::TabNotFound(_) => "tab_not_found",
            BrowserError::NoActiveTab => "no_active_tab",
            BrowserError::NavigationFailed(_) => "navigation_failed",
            BrowserError::PageScript(_) => "page_eval_error",
            BrowserError::Timeout(_) => "timeout",
            BrowserError::ActionFailed(_) => "action_failed",
        }
    }
}
