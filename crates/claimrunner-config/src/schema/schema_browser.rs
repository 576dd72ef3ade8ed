//! Browser and storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{data_dir, default_true};

/// Chrome connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Launch Chrome when nothing listens on the debugging port.
    #[serde(default = "default_true")]
    pub launch: bool,

    #[serde(default)]
    pub headless: bool,

    /// Profile directory for the launched browser (keeps the game login).
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// Explicit browser executable; searched in well-known locations otherwise.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
}

fn default_debug_port() -> u16 {
    9222
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            launch: default_true(),
            headless: false,
            profile_dir: None,
            chrome_path: None,
        }
    }
}

impl BrowserConfig {
    /// CDP HTTP endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }

    pub fn resolved_profile_dir(&self) -> PathBuf {
        self.profile_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("browser-profile"))
    }
}

/// Durable claimed-id storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the claimed ids.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Reload the set when the file is changed by another process.
    #[serde(default = "default_true")]
    pub watch: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            watch: default_true(),
        }
    }
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir().join("claimed.json"))
    }
}
