//! Tab sequencer and auto-scan configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Timing of the sequential tab run. All values in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Upper bound for waiting on page load; the run proceeds afterwards.
    #[serde(default = "default_load_timeout")]
    pub load_timeout_ms: u64,

    #[serde(default = "default_load_poll")]
    pub load_poll_ms: u64,

    /// Pause after load before attaching the page agent.
    #[serde(default = "default_after_load_delay")]
    pub after_load_delay_ms: u64,

    /// Ceiling for the calibration click.
    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_ms: u64,

    #[serde(default = "default_capture_poll")]
    pub capture_poll_ms: u64,

    #[serde(default = "default_pre_click_delay")]
    pub pre_click_delay_ms: u64,

    /// Deadline for the page agent's click report.
    #[serde(default = "default_result_timeout")]
    pub result_timeout_ms: u64,

    #[serde(default = "default_result_poll")]
    pub result_poll_ms: u64,

    /// Extra pause when no click report arrived in time.
    #[serde(default = "default_no_result_delay")]
    pub no_result_delay_ms: u64,

    /// Pause after closing a tab.
    #[serde(default = "default_tab_settle")]
    pub tab_settle_ms: u64,
}

fn default_load_timeout() -> u64 {
    30_000
}

fn default_load_poll() -> u64 {
    250
}

fn default_after_load_delay() -> u64 {
    300
}

fn default_capture_timeout() -> u64 {
    600_000
}

fn default_capture_poll() -> u64 {
    300
}

fn default_pre_click_delay() -> u64 {
    200
}

fn default_result_timeout() -> u64 {
    5_000
}

fn default_result_poll() -> u64 {
    200
}

fn default_no_result_delay() -> u64 {
    1_000
}

fn default_tab_settle() -> u64 {
    400
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: default_load_timeout(),
            load_poll_ms: default_load_poll(),
            after_load_delay_ms: default_after_load_delay(),
            capture_timeout_ms: default_capture_timeout(),
            capture_poll_ms: default_capture_poll(),
            pre_click_delay_ms: default_pre_click_delay(),
            result_timeout_ms: default_result_timeout(),
            result_poll_ms: default_result_poll(),
            no_result_delay_ms: default_no_result_delay(),
            tab_settle_ms: default_tab_settle(),
        }
    }
}

impl SequencerConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn load_poll(&self) -> Duration {
        Duration::from_millis(self.load_poll_ms)
    }

    pub fn after_load_delay(&self) -> Duration {
        Duration::from_millis(self.after_load_delay_ms)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn capture_poll(&self) -> Duration {
        Duration::from_millis(self.capture_poll_ms)
    }

    pub fn pre_click_delay(&self) -> Duration {
        Duration::from_millis(self.pre_click_delay_ms)
    }

    pub fn result_timeout(&self) -> Duration {
        Duration::from_millis(self.result_timeout_ms)
    }

    pub fn result_poll(&self) -> Duration {
        Duration::from_millis(self.result_poll_ms)
    }

    pub fn no_result_delay(&self) -> Duration {
        Duration::from_millis(self.no_result_delay_ms)
    }

    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }
}

/// Periodic re-scan of the active tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Host the active tab must be on (subdomains included).
    #[serde(default = "default_target_host")]
    pub target_host: String,

    #[serde(default)]
    pub enable_on_start: bool,

    /// Merge ids the page shows as claimed into the durable set.
    #[serde(default = "default_true")]
    pub persist_page_claims: bool,
}

fn default_interval_minutes() -> u64 {
    30
}

fn default_target_host() -> String {
    "wplace.live".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            target_host: default_target_host(),
            enable_on_start: false,
            persist_page_claims: default_true(),
        }
    }
}

impl ScanConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}
