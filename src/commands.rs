//! One-shot CLI commands.

use std::error::Error;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use claimrunner_config::Config;
use claimrunner_protocols::{normalize_id, LinkCandidate};

use crate::cli::ClaimedAction;
use crate::server::{open_claimed, Services};

/// Process every URL in `file` once, then print the run summary as JSON.
///
/// Ctrl-C stops the run after the current tab.
pub(crate) async fn run_file(
    config: Config,
    file: &Path,
    background: bool,
) -> Result<(), Box<dyn Error>> {
    let list = tokio::fs::read_to_string(file).await?;
    let services = Services::build(&config).await?;
    let sequencer = services.controller.sequencer().clone();

    let handle = sequencer.start(&[list], !background)?;
    info!("Run started from {}", file.display());

    let wait = handle.wait();
    tokio::pin!(wait);

    let summary = tokio::select! {
        summary = &mut wait => summary?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Stopping after the current tab");
            sequencer.stop();
            wait.await?
        }
    };

    info!(
        "Run finished: {}/{} processed, {} claim(s) found, {} failure(s)",
        summary.processed,
        summary.total,
        summary.claims_found(),
        summary.failures()
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    services.browser.close().await;
    Ok(())
}

pub(crate) async fn claimed(config: Config, action: ClaimedAction) -> Result<(), Box<dyn Error>> {
    let claimed = open_claimed(&config).await?;

    match action {
        ClaimedAction::List => {
            for id in claimed.snapshot() {
                println!("{}", id);
            }
        }
        ClaimedAction::Add { id } => {
            let id = normalize_id(&Value::String(id.clone()))
                .ok_or_else(|| format!("invalid id: {}", id))?;
            if claimed.add(id).await {
                println!("added {}", id);
            } else {
                println!("{} already claimed", id);
            }
        }
    }

    Ok(())
}

/// Print the active tab's recent links whose id is not claimed yet.
pub(crate) async fn links(config: Config) -> Result<(), Box<dyn Error>> {
    let services = Services::build(&config).await?;
    let controller = &services.controller;

    let reply = controller.extract_links().await;
    let links = match (reply.ok, reply.links) {
        (true, Some(links)) => links,
        _ => {
            let code = reply.error.unwrap_or_else(|| "unknown_error".to_string());
            let message = reply.message.unwrap_or_default();
            return Err(format!("{}: {}", code, message).into());
        }
    };

    let unclaimed: Vec<LinkCandidate> = links
        .into_iter()
        .filter(|l| l.id.is_none_or(|id| !controller.claimed().contains(id)))
        .collect();

    for link in &unclaimed {
        println!("{}", link.to_line());
    }
    info!("{} unclaimed link(s)", unclaimed.len());

    services.browser.close().await;
    Ok(())
}
