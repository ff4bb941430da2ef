//! Payout-rate administration handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::{RateResponse, UpsertRateRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `PUT /api/v1/rates` — Create or overwrite a rate definition.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for an unresolvable shape or
/// [`GatewayError::InvalidRate`] when validation rejects the definition.
#[utoipa::path(
    put,
    path = "/api/v1/rates",
    tag = "Rates",
    summary = "Upsert a payout rate",
    description = "Idempotent create-or-replace. The key is case-folded and trimmed, so differently-cased tags resolve to the same definition. A zero per_views block size is rejected here, never at calculation time.",
    request_body = UpsertRateRequest,
    responses(
        (status = 200, description = "Rate stored", body = RateResponse),
        (status = 400, description = "Invalid shape or parameters", body = ErrorResponse),
    )
)]
pub async fn upsert_rate(
    State(state): State<AppState>,
    Json(req): Json<UpsertRateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let shape = req.shape()?;
    let def = state.service.upsert_rate(&req.key, shape).await?;
    Ok(Json(RateResponse::from(def)))
}

/// `GET /api/v1/rates` — List all rate definitions.
#[utoipa::path(
    get,
    path = "/api/v1/rates",
    tag = "Rates",
    summary = "List payout rates",
    responses(
        (status = 200, description = "All rate definitions", body = Vec<RateResponse>),
    )
)]
pub async fn list_rates(State(state): State<AppState>) -> impl IntoResponse {
    let rates: Vec<RateResponse> = state
        .service
        .list_rates()
        .await
        .into_iter()
        .map(RateResponse::from)
        .collect();
    Json(rates)
}

/// `GET /api/v1/rates/{key}` — Get one rate definition.
///
/// # Errors
///
/// Returns [`GatewayError::RateNotFound`] when the key has no definition.
#[utoipa::path(
    get,
    path = "/api/v1/rates/{key}",
    tag = "Rates",
    summary = "Get a payout rate",
    params(
        ("key" = String, Path, description = "Rate key (bounty tag or `standard`)"),
    ),
    responses(
        (status = 200, description = "Rate definition", body = RateResponse),
        (status = 404, description = "No such rate", body = ErrorResponse),
    )
)]
pub async fn get_rate(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let def = state.service.get_rate(&key).await?;
    Ok(Json(RateResponse::from(def)))
}

/// `DELETE /api/v1/rates/{key}` — Delete a rate definition.
///
/// Posts still tagged with the key simply stop accruing; the sweep treats
/// the dangling tag as a miss.
///
/// # Errors
///
/// Returns [`GatewayError::RateNotFound`] when the key has no definition.
#[utoipa::path(
    delete,
    path = "/api/v1/rates/{key}",
    tag = "Rates",
    summary = "Delete a payout rate",
    params(
        ("key" = String, Path, description = "Rate key"),
    ),
    responses(
        (status = 204, description = "Rate deleted"),
        (status = 404, description = "No such rate", body = ErrorResponse),
    )
)]
pub async fn delete_rate(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let _ = state.service.remove_rate(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rate administration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rates", put(upsert_rate).get(list_rates))
        .route("/rates/{key}", get(get_rate).delete(delete_rate))
}
