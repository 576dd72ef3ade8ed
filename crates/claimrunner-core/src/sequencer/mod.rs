//! Sequential tab processing.
//!
//! A run walks an ordered URL list one tab at a time. The first tab of the
//! first run asks the user for a calibration click; the captured point is then
//! replayed on every later tab, in this run and in later ones.

mod run;
mod state;

pub use state::{RunPhase, RunProgress, RunSummary, TabOutcome};

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use claimrunner_config::SequencerConfig;
use claimrunner_protocols::{ClickDriver, PageProbe, ReferencePoint, TabHost, TargetUrl};

use crate::error::SequencerError;
use crate::page_channel::PageChannel;

#[cfg(test)]
#[path = "sequencer_tests.rs"]
mod tests;

struct RunState {
    phase: RunPhase,
    cancel: Option<CancellationToken>,
    progress: RunProgress,
}

struct Inner {
    tabs: Arc<dyn TabHost>,
    probe: Arc<dyn PageProbe>,
    channel: PageChannel,
    config: SequencerConfig,
    state: Mutex<RunState>,
    reference: RwLock<Option<ReferencePoint>>,
}

/// Owns the run state machine `Idle -> Running -> (Idle | Stopping -> Idle)`.
#[derive(Clone)]
pub struct TabSequencer {
    inner: Arc<Inner>,
}

/// Handle on a spawned run.
pub struct RunHandle {
    handle: JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Wait for the run to finish.
    pub async fn wait(self) -> Result<RunSummary, JoinError> {
        self.handle.await
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Puts the sequencer back to `Idle` when the run task ends, however it ends.
struct PhaseReset(Arc<Inner>);

impl Drop for PhaseReset {
    fn drop(&mut self) {
        let mut state = self.0.state.lock();
        state.phase = RunPhase::Idle;
        state.cancel = None;
        if state.progress.finished_at.is_none() {
            state.progress.finished_at = Some(chrono::Utc::now());
        }
    }
}

impl TabSequencer {
    pub fn new(
        tabs: Arc<dyn TabHost>,
        driver: Arc<dyn ClickDriver>,
        probe: Arc<dyn PageProbe>,
        config: SequencerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                tabs,
                probe,
                channel: PageChannel::new(driver),
                config,
                state: Mutex::new(RunState {
                    phase: RunPhase::Idle,
                    cancel: None,
                    progress: RunProgress::default(),
                }),
                reference: RwLock::new(None),
            }),
        }
    }

    /// Start processing `urls`. Each entry may hold several lines; blank lines
    /// are dropped and `#id=` annotations are stripped.
    pub fn start<S: AsRef<str>>(
        &self,
        urls: &[S],
        open_in_foreground: bool,
    ) -> Result<RunHandle, SequencerError> {
        let targets = TargetUrl::parse_list(urls);
        let cancel = CancellationToken::new();

        {
            let mut state = self.inner.state.lock();
            if state.phase != RunPhase::Idle {
                return Err(SequencerError::AlreadyRunning);
            }
            if targets.is_empty() {
                return Err(SequencerError::EmptyUrlList);
            }
            state.phase = RunPhase::Running;
            state.cancel = Some(cancel.clone());
            state.progress = RunProgress::begin(targets.len(), open_in_foreground);
        }

        info!(
            "Run started with {} URLs (foreground: {})",
            targets.len(),
            open_in_foreground
        );

        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let _reset = PhaseReset(inner.clone());
            inner.run(targets, open_in_foreground, cancel).await
        });

        Ok(RunHandle { handle })
    }

    /// Ask the current run to stop after the URL in progress.
    ///
    /// Returns `false` when there was no running run.
    pub fn stop(&self) -> bool {
        let mut state = self.inner.state.lock();
        if state.phase != RunPhase::Running {
            debug!("Stop requested while {}", state.phase.as_str());
            return false;
        }
        state.phase = RunPhase::Stopping;
        if let Some(cancel) = &state.cancel {
            cancel.cancel();
        }
        info!("Run stop requested");
        true
    }

    pub fn phase(&self) -> RunPhase {
        self.inner.state.lock().phase
    }

    pub fn is_running(&self) -> bool {
        self.phase().is_active()
    }

    pub fn reference_point(&self) -> Option<ReferencePoint> {
        *self.inner.reference.read()
    }

    pub fn progress(&self) -> RunProgress {
        self.inner.state.lock().progress.clone()
    }
}
