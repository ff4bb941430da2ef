//! Social-account handlers: registration, verification push, scraper
//! enumeration.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ActiveAccountsParams, ActiveAccountsResponse, ConfirmVerificationRequest,
    RegisterAccountRequest, RegisterAccountResponse,
};
use crate::app_state::AppState;
use crate::domain::Platform;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /users/active` — Verified accounts for the scraper to enumerate.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidPlatform`] for an unrecognized platform.
#[utoipa::path(
    get,
    path = "/users/active",
    tag = "Accounts",
    summary = "List verified accounts on a platform",
    description = "Returns the verified (owner_id, username) pairs the external scraper should crawl.",
    params(
        ("platform" = String, Query, description = "Platform to enumerate"),
    ),
    responses(
        (status = 200, description = "Verified accounts", body = ActiveAccountsResponse),
        (status = 400, description = "Unrecognized platform", body = ErrorResponse),
    )
)]
pub async fn active_accounts(
    State(state): State<AppState>,
    Query(params): Query<ActiveAccountsParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let platform: Platform = params.platform.parse()?;
    let accounts = state.service.active_accounts(platform).await;

    Ok(Json(ActiveAccountsResponse {
        platform: platform.to_string(),
        accounts: accounts.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /users/confirm-verification` — Verification result pushed by the
/// external workflow.
///
/// # Errors
///
/// Returns [`GatewayError::AccountNotFound`] when no matching registration
/// exists.
#[utoipa::path(
    post,
    path = "/users/confirm-verification",
    tag = "Accounts",
    summary = "Confirm an account verification",
    description = "Marks a registered account verified once the external workflow found the verification code in its bio.",
    request_body = ConfirmVerificationRequest,
    responses(
        (status = 204, description = "Account marked verified"),
        (status = 404, description = "No matching registration", body = ErrorResponse),
    )
)]
pub async fn confirm_verification(
    State(state): State<AppState>,
    Json(req): Json<ConfirmVerificationRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let platform: Platform = req.platform.parse()?;
    state
        .service
        .confirm_verification(&req.owner_id, platform, &req.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/accounts` — Register a social account.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidPlatform`] for an unrecognized platform.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "Accounts",
    summary = "Register a social account",
    description = "Registers (or refreshes) an account and returns the verification code the creator must place in their bio.",
    request_body = RegisterAccountRequest,
    responses(
        (status = 201, description = "Account registered", body = RegisterAccountResponse),
        (status = 400, description = "Unrecognized platform", body = ErrorResponse),
    )
)]
pub async fn register_account(
    State(state): State<AppState>,
    Json(req): Json<RegisterAccountRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let platform: Platform = req.platform.parse()?;
    let account = state
        .service
        .register_account(&req.owner_id, platform, &req.username)
        .await;

    let response = RegisterAccountResponse {
        owner_id: account.owner_id,
        platform: account.platform.to_string(),
        username: account.username,
        verification_code: account.verification_code,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Scraper-facing account routes mounted at the root level.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/active", get(active_accounts))
        .route("/users/confirm-verification", post(confirm_verification))
}

/// Administrative account routes mounted under `/api/v1`.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/accounts", post(register_account))
}
