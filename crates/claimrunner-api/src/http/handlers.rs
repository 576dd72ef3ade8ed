//! Control-surface handlers.
//!
//! Each handler is a thin shell over a [`Controller`] method. Failed replies
//! keep their JSON body and get a non-2xx status.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use claimrunner_core::control::{Ack, ClaimedReply, LinksReply, NotifyReply, SyncReply};
use claimrunner_core::{ControlRequest, ControlResponse, Controller};

use crate::error::ApiError;

/// Body of `POST /run/start`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRunRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default, alias = "openForeground")]
    pub open_in_foreground: bool,
}

/// Body of `POST /claimed`.
#[derive(Debug, Deserialize)]
pub struct NotifyClaimedRequest {
    #[serde(default)]
    pub id: Value,
}

fn ack_status(ack: &Ack) -> StatusCode {
    match (ack.ok, ack.reason.as_deref()) {
        (true, _) => StatusCode::OK,
        (false, Some("already_running")) => StatusCode::CONFLICT,
        (false, _) => StatusCode::BAD_REQUEST,
    }
}

fn page_status(ok: bool, error: Option<&str>) -> StatusCode {
    match (ok, error) {
        (true, _) => StatusCode::OK,
        (false, Some("no_active_tab")) => StatusCode::CONFLICT,
        (false, Some("browser_unavailable")) => StatusCode::SERVICE_UNAVAILABLE,
        (false, _) => StatusCode::BAD_GATEWAY,
    }
}

fn notify_status(reply: &NotifyReply) -> StatusCode {
    if reply.ok {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

fn response_status(response: &ControlResponse) -> StatusCode {
    match response {
        ControlResponse::Ack(r) => ack_status(r),
        ControlResponse::State(_) => StatusCode::OK,
        ControlResponse::Links(r) => page_status(r.ok, r.error.as_deref()),
        ControlResponse::Claimed(r) => page_status(r.ok, r.error.as_deref()),
        ControlResponse::Notify(r) => notify_status(r),
        ControlResponse::Sync(r) => page_status(r.ok, r.error.as_deref()),
    }
}

/// Start a run.
///
/// POST /run/start
pub async fn start_run(
    State(controller): State<Arc<Controller>>,
    Json(req): Json<StartRunRequest>,
) -> impl IntoResponse {
    info!("Run start request: {} entries", req.urls.len());
    let ack = controller.start(&req.urls, req.open_in_foreground);
    (ack_status(&ack), Json(ack))
}

/// POST /run/stop
pub async fn stop_run(State(controller): State<Arc<Controller>>) -> Json<Ack> {
    Json(controller.stop())
}

/// GET /state
pub async fn get_state(State(controller): State<Arc<Controller>>) -> impl IntoResponse {
    Json(controller.state())
}

/// GET /page/links
pub async fn page_links(State(controller): State<Arc<Controller>>) -> impl IntoResponse {
    let reply: LinksReply = controller.extract_links().await;
    (page_status(reply.ok, reply.error.as_deref()), Json(reply))
}

/// GET /page/claimed
pub async fn page_claimed(State(controller): State<Arc<Controller>>) -> impl IntoResponse {
    let reply: ClaimedReply = controller.claimed_on_page().await;
    (page_status(reply.ok, reply.error.as_deref()), Json(reply))
}

/// POST /page/claimed/sync
pub async fn sync_page_claimed(State(controller): State<Arc<Controller>>) -> impl IntoResponse {
    let reply: SyncReply = controller.sync_claimed_from_page().await;
    (page_status(reply.ok, reply.error.as_deref()), Json(reply))
}

/// GET /claimed
pub async fn list_claimed(State(controller): State<Arc<Controller>>) -> Json<ClaimedReply> {
    Json(controller.claimed_persisted())
}

/// POST /claimed
pub async fn notify_claimed(
    State(controller): State<Arc<Controller>>,
    Json(req): Json<NotifyClaimedRequest>,
) -> impl IntoResponse {
    let reply = controller.notify_claimed(&req.id).await;
    (notify_status(&reply), Json(reply))
}

/// POST /scan/enable
pub async fn enable_scan(State(controller): State<Arc<Controller>>) -> Json<Ack> {
    Json(controller.enable_scan())
}

/// POST /scan/disable
pub async fn disable_scan(State(controller): State<Arc<Controller>>) -> Json<Ack> {
    Json(controller.disable_scan())
}

/// Tagged control request, same contract as the individual routes.
///
/// POST /message
pub async fn message(
    State(controller): State<Arc<Controller>>,
    body: Result<Json<ControlRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    debug!("Message request: {}", request.kind());
    let response = controller.handle(request).await;
    Ok((response_status(&response), Json(response)))
}

/// GET /livez
pub async fn liveness_probe() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
