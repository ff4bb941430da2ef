//! Tracked-post handlers: dashboards, bounty assignment, removal, and
//! settlement.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AssignBountyRequest, AssignBountyResponse, ListPostsParams, PaginationMeta, PaginationParams,
    PostListResponse, PostSummaryDto, RemovePostParams, SettleResponse,
};
use crate::app_state::AppState;
use crate::domain::{Platform, PostKey, RateKey};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /api/v1/posts` — List an owner's posts with pagination.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "Posts",
    summary = "List tracked posts",
    description = "Returns a paginated list of one creator's tracked posts across all platforms, most recently tracked first.",
    params(
        ("owner_id" = String, Query, description = "Creator identifier"),
        ("page" = Option<u32>, Query, description = "Page number (1-indexed)"),
        ("per_page" = Option<u32>, Query, description = "Items per page (max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated post list", body = PostListResponse),
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let pagination = pagination.clamped();
    let posts = state.service.list_posts(&params.owner_id).await;

    let total = posts.len() as u32;
    let per_page = pagination.per_page;
    let page = pagination.page;
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    let start = ((page - 1) * per_page) as usize;
    let data: Vec<PostSummaryDto> = posts
        .iter()
        .skip(start)
        .take(per_page as usize)
        .map(PostSummaryDto::from)
        .collect();

    Ok(Json(PostListResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// `POST /api/v1/posts/bounty` — (Re)assign a post to a bounty campaign.
///
/// # Errors
///
/// Returns [`GatewayError::PostNotFound`] when the post is not tracked.
#[utoipa::path(
    post,
    path = "/api/v1/posts/bounty",
    tag = "Posts",
    summary = "Assign a bounty campaign to a post",
    description = "Flags the post as a bounty post, snapshots its current view count as the new earnings baseline, and resets the computed payout to zero.",
    request_body = AssignBountyRequest,
    responses(
        (status = 200, description = "Bounty assigned", body = AssignBountyResponse),
        (status = 400, description = "Invalid platform or tag", body = ErrorResponse),
        (status = 404, description = "Post not tracked", body = ErrorResponse),
    )
)]
pub async fn assign_bounty(
    State(state): State<AppState>,
    Json(req): Json<AssignBountyRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let platform: Platform = req.platform.parse()?;
    let key = PostKey::new(platform, &req.url);
    let starting_views = state.service.assign_bounty(&key, &req.bounty_tag).await?;

    Ok(Json(AssignBountyResponse {
        bounty_tag: RateKey::new(&req.bounty_tag).to_string(),
        starting_views,
    }))
}

/// `DELETE /api/v1/posts` — Remove a single post from tracking.
///
/// # Errors
///
/// Returns [`GatewayError::PostNotFound`] when the post is not tracked or
/// belongs to a different owner.
#[utoipa::path(
    delete,
    path = "/api/v1/posts",
    tag = "Posts",
    summary = "Remove a tracked post",
    params(
        ("platform" = String, Query, description = "Platform name"),
        ("url" = String, Query, description = "Post URL"),
        ("owner_id" = Option<String>, Query, description = "Scope the removal to this owner"),
    ),
    responses(
        (status = 204, description = "Post removed"),
        (status = 404, description = "Post not tracked", body = ErrorResponse),
    )
)]
pub async fn remove_post(
    State(state): State<AppState>,
    Query(params): Query<RemovePostParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let platform: Platform = params.platform.parse()?;
    let key = PostKey::new(platform, &params.url);
    let _ = state
        .service
        .remove_post(&key, params.owner_id.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/owners/{owner_id}/settle` — Mark an owner as paid.
///
/// Writes the payout ledger first, then deletes the owner's tracked
/// posts. A ledger failure aborts the settlement with the posts intact.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] when the ledger write fails.
#[utoipa::path(
    post,
    path = "/api/v1/owners/{owner_id}/settle",
    tag = "Posts",
    summary = "Settle an owner's posts",
    params(
        ("owner_id" = String, Path, description = "Creator identifier"),
    ),
    responses(
        (status = 200, description = "Settlement summary", body = SettleResponse),
        (status = 500, description = "Ledger write failed", body = ErrorResponse),
    )
)]
pub async fn settle_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let summary = state.service.settle_owner(&owner_id).await?;

    Ok(Json(SettleResponse {
        batch_id: summary.batch_id,
        owner_id: summary.owner_id,
        posts_settled: summary.posts_settled,
        total_usd: summary.total_usd.round_dp(2).to_string(),
    }))
}

/// `GET /api/v1/owners/{owner_id}/payouts` — Read an owner's payout ledger.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the ledger is disabled.
#[utoipa::path(
    get,
    path = "/api/v1/owners/{owner_id}/payouts",
    tag = "Posts",
    summary = "List an owner's payout records",
    params(
        ("owner_id" = String, Path, description = "Creator identifier"),
    ),
    responses(
        (status = 200, description = "Payout records, newest first", body = serde_json::Value),
        (status = 400, description = "Ledger disabled", body = ErrorResponse),
    )
)]
pub async fn list_payouts(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let records = state.service.payouts_for_owner(&owner_id).await?;
    Ok(Json(records))
}

/// Post management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).delete(remove_post))
        .route("/posts/bounty", post(assign_bounty))
        .route("/owners/{owner_id}/settle", post(settle_owner))
        .route("/owners/{owner_id}/payouts", get(list_payouts))
}
