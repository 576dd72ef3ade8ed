//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use claimrunner_core::Controller;

use crate::http::handlers;

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// Create the router over a shared [`Controller`].
///
/// ```text
/// /run
///   POST /run/start          - Start a run { urls, openInForeground }
///   POST /run/stop           - Stop after the current URL
///
/// /page
///   GET  /page/links         - Candidate links on the active tab
///   GET  /page/claimed       - Ids the active tab shows as claimed
///   POST /page/claimed/sync  - Merge those ids into the claimed set
///
/// /claimed
///   GET  /claimed            - Persisted claimed ids (sorted)
///   POST /claimed            - Record one claimed id { id }
///
/// /scan
///   POST /scan/enable        - Start periodic scanning
///   POST /scan/disable       - Stop periodic scanning
///
/// /state   - Run, scan and calibration state
/// /message - Tagged control request { "type": ... }
/// /livez   - Liveness probe
/// ```
pub fn create_router(controller: Arc<Controller>) -> Router {
    let run_routes = Router::new()
        .route("/start", post(handlers::start_run))
        .route("/stop", post(handlers::stop_run));

    let page_routes = Router::new()
        .route("/links", get(handlers::page_links))
        .route("/claimed", get(handlers::page_claimed))
        .route("/claimed/sync", post(handlers::sync_page_claimed));

    let scan_routes = Router::new()
        .route("/enable", post(handlers::enable_scan))
        .route("/disable", post(handlers::disable_scan));

    let api = Router::new()
        .nest("/run", run_routes)
        .nest("/page", page_routes)
        .nest("/scan", scan_routes)
        .route("/state", get(handlers::get_state))
        .route(
            "/claimed",
            get(handlers::list_claimed).post(handlers::notify_claimed),
        )
        .route("/message", post(handlers::message))
        .with_state(controller);

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(handlers::liveness_probe));

    Router::new()
        .merge(api)
        .merge(liveness_route)
        .layer(TraceLayer::new_for_http())
}
