//! Chrome discovery, launch and connection.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use claimrunner_protocols::BrowserError;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::CdpBrowser;
use crate::cdp::{CdpClient, CdpError, PageSession};

const STARTUP_POLL: Duration = Duration::from_millis(200);
const STARTUP_ATTEMPTS: u32 = 30;

impl CdpBrowser {
    /// Find a Chrome executable in well-known install locations.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    fn chrome_path(&self) -> Option<PathBuf> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Some(path.clone()),
            Some(path) => {
                warn!("Configured chrome_path {} does not exist", path.display());
                Self::find_chrome()
            }
            None => Self::find_chrome(),
        }
    }

    /// Whether something answers CDP discovery on the debugging port.
    pub async fn is_chrome_running(&self) -> bool {
        reqwest::get(format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    /// Launch Chrome with remote debugging enabled.
    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = self.chrome_path().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.config.resolved_profile_dir();

        if let Err(e) = tokio::fs::create_dir_all(&profile_dir).await {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    /// Connect to the browser, launching it first if allowed and needed.
    pub async fn connect(&self) -> Result<Arc<CdpClient>, BrowserError> {
        let mut slot = self.client.write().await;
        if let Some(client) = slot.as_ref().filter(|c| c.is_alive()) {
            return Ok(client.clone());
        }

        if self.is_chrome_running().await {
            info!("Chrome already running on port {}", self.config.debug_port);
        } else if self.config.launch {
            info!(
                "Chrome not running on port {}, launching...",
                self.config.debug_port
            );
            let child = self.launch_chrome().await?;
            *self.chrome_process.lock().await = Some(child);

            let mut ready = false;
            for _ in 0..STARTUP_ATTEMPTS {
                tokio::time::sleep(STARTUP_POLL).await;
                if self.is_chrome_running().await {
                    ready = true;
                    break;
                }
            }
            if !ready {
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }
        } else {
            return Err(BrowserError::ConnectionFailed(format!(
                "nothing listening on {} and launching is disabled",
                self.config.endpoint()
            )));
        }

        let client = Arc::new(CdpClient::connect(&self.config.endpoint()).await?);
        self.sessions.lock().clear();
        *slot = Some(client.clone());

        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(client)
    }

    /// The live client, reconnecting if the socket dropped.
    pub(crate) async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        if let Some(client) = self.client.read().await.as_ref().filter(|c| c.is_alive()) {
            return Ok(client.clone());
        }
        self.connect().await
    }

    /// Page session for a target, attaching on first use.
    pub(crate) async fn session(&self, target_id: &str) -> Result<Arc<PageSession>, BrowserError> {
        if let Some(session) = self.sessions.lock().get(target_id) {
            return Ok(session.clone());
        }

        let client = self.client().await?;
        let session = Arc::new(client.attach_page(target_id).await?);
        debug!("Attached session {} to {}", session.session_id(), target_id);

        Ok(self
            .sessions
            .lock()
            .entry(target_id.to_string())
            .or_insert(session)
            .clone())
    }

    /// Evaluate an expression in a tab.
    ///
    /// Transport failures drop the cached session so the next call re-attaches.
    pub(crate) async fn evaluate_in(
        &self,
        target_id: &str,
        expression: &str,
    ) -> Result<serde_json::Value, BrowserError> {
        let session = self.session(target_id).await?;
        match session.evaluate(expression).await {
            Ok(value) => Ok(value),
            Err(e) => {
                if !matches!(e, CdpError::JavaScript(_)) {
                    self.sessions.lock().remove(target_id);
                }
                Err(e.into())
            }
        }
    }

    pub(crate) fn forget_session(&self, target_id: &str) {
        self.sessions.lock().remove(target_id);
    }

    /// Drop the connection. Chrome itself keeps running.
    pub async fn close(&self) {
        self.sessions.lock().clear();
        let _ = self.client.write().await.take();
        info!("Browser connection closed");
    }

    /// Disconnect and kill Chrome if this process launched it.
    pub async fn shutdown_chrome(&self) {
        self.close().await;

        if let Some(mut child) = self.chrome_process.lock().await.take() {
            info!("Shutting down Chrome...");
            let _ = child.kill().await;
        }
    }
}
