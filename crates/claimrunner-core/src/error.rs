//! Core error types.

use thiserror::Error;

/// Synchronous rejections of a run request. No state changes when returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequencerError {
    #[error("A run is already in progress")]
    AlreadyRunning,

    #[error("URL list is empty")]
    EmptyUrlList,
}

impl SequencerError {
    /// Reason code reported by the control surface.
    pub fn reason(&self) -> &'static str {
        match self {
            SequencerError::AlreadyRunning => "already_running",
            SequencerError::EmptyUrlList => "empty_url_list",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_error_reasons() {
        assert_eq!(SequencerError::AlreadyRunning.reason(), "already_running");
        assert_eq!(SequencerError::EmptyUrlList.reason(), "empty_url_list");
    }

    #[test]
    fn test_sequencer_error_display() {
        assert!(SequencerError::AlreadyRunning.to_string().contains("already"));
    }
}
