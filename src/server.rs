//! Tracing setup, component wiring and the control server.

use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimrunner_api::{ApiConfig, ApiServer};
use claimrunner_browser_cdp::CdpBrowser;
use claimrunner_config::{data_dir, Config, ConfigLoader};
use claimrunner_core::{ClaimStorage, ClaimedSet, Controller, FileClaimStorage};

/// Initialize tracing with console and file output.
///
/// Log files are written to `~/.claimrunner/logs/` with daily rotation.
pub(crate) fn init_tracing() -> Result<(), Box<dyn Error>> {
    let log_dir = data_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("claimrunner")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The worker guard must outlive every log call.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console on stderr so command output on stdout stays clean
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Open the persisted claimed set and start following external changes.
pub(crate) async fn open_claimed(config: &Config) -> Result<Arc<ClaimedSet>, Box<dyn Error>> {
    let path = ConfigLoader::expand_path(&config.storage.resolved_path());
    let storage = Arc::new(FileClaimStorage::new(path).await?);

    if config.storage.watch {
        if let Err(e) = storage.watch() {
            warn!("Claimed file will not be watched: {}", e);
        }
    }

    info!("Claimed ids stored at {}", storage.path().display());

    let storage: Arc<dyn ClaimStorage> = storage;
    let claimed = ClaimedSet::load(storage).await;
    claimed.spawn_sync();
    Ok(claimed)
}

/// Everything the commands need, wired together.
pub(crate) struct Services {
    pub browser: Arc<CdpBrowser>,
    pub controller: Arc<Controller>,
}

impl Services {
    pub(crate) async fn build(config: &Config) -> Result<Self, Box<dyn Error>> {
        let claimed = open_claimed(config).await?;

        let mut browser_config = config.browser.clone();
        browser_config.profile_dir = browser_config
            .profile_dir
            .as_deref()
            .map(ConfigLoader::expand_path);
        browser_config.chrome_path = browser_config
            .chrome_path
            .as_deref()
            .map(ConfigLoader::expand_path);
        let browser = Arc::new(CdpBrowser::new(browser_config));

        let controller = Arc::new(Controller::new(
            browser.clone(),
            browser.clone(),
            browser.clone(),
            claimed,
            config.sequencer.clone(),
            config.scan.clone(),
        ));

        Ok(Self {
            browser,
            controller,
        })
    }
}

/// Run the control server in foreground until Ctrl-C.
pub(crate) async fn run_server(
    config: Config,
    host: String,
    port: u16,
) -> Result<(), Box<dyn Error>> {
    info!("Starting claimrunner v{}", env!("CARGO_PKG_VERSION"));

    let services = Services::build(&config).await?;
    let controller = services.controller.clone();

    if config.scan.enable_on_start {
        controller.enable_scan();
        info!(
            "Auto scan enabled every {} minute(s)",
            config.scan.interval_minutes
        );
    }

    let server = ApiServer::new(ApiConfig::new(host, port), controller.clone());
    info!("Control server listening on http://{}", server.addr());

    server
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    controller.stop();
    controller.disable_scan();
    services.browser.close().await;

    info!("claimrunner stopped");
    Ok(())
}
