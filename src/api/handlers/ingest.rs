//! Metrics ingestion endpoint for the external scraping workflow.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{IngestRequest, IngestResponse};
use crate::app_state::AppState;
use crate::domain::Platform;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::IngestItem;

/// `POST /metrics/ingest` — Accept a batch of counter snapshots.
///
/// Each video is upserted into the tracked-post store and its earnings are
/// recomputed inline under whatever rate currently applies. Malformed
/// items are skipped without aborting the batch; `processed` counts only
/// the items that were persisted.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidPlatform`] when the batch-level platform
/// is unrecognized.
#[utoipa::path(
    post,
    path = "/metrics/ingest",
    tag = "Ingestion",
    summary = "Ingest engagement counters",
    description = "Accepts a batch of (video_id, url, views, likes, shares) snapshots from the external scraper. Counters are last-write-wins; earnings are recomputed inline.",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Batch accepted", body = IngestResponse),
        (status = 400, description = "Unrecognized platform", body = ErrorResponse),
    )
)]
pub async fn ingest_metrics(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let platform: Platform = req.platform.parse()?;

    let items: Vec<IngestItem> = req
        .videos
        .into_iter()
        .map(|v| IngestItem {
            platform: v.platform,
            video_id: v.video_id,
            url: v.url,
            views: v.views,
            likes: v.likes,
            shares: v.shares,
        })
        .collect();

    let report = state
        .service
        .ingest_batch(platform, &req.owner_id, items)
        .await;

    Ok(Json(IngestResponse {
        status: "ok".to_string(),
        processed: report.processed,
    }))
}

/// Ingestion routes mounted at the root level (external contract).
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics/ingest", post(ingest_metrics))
}
