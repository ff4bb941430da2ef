//! Tracked-post DTOs: dashboards, bounty assignment, removal, settlement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TrackedPost;

/// Pagination query parameters for `GET /api/v1/posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps the page to at least 1 and `per_page` to 1..=100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

/// One tracked post in a dashboard listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostSummaryDto {
    /// Platform name.
    pub platform: String,
    /// Post URL.
    pub url: String,
    /// External content identifier.
    pub video_id: String,
    /// Last known view count.
    pub views: u64,
    /// Last known like count.
    pub likes: u64,
    /// Last known share count.
    pub shares: u64,
    /// Whether the post is on a bounty campaign.
    pub is_bounty: bool,
    /// Campaign tag, when assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounty_tag: Option<String>,
    /// Computed payout, displayed at 2 decimal places.
    pub earned_usd: String,
    /// When the post was first tracked.
    pub uploaded_at: DateTime<Utc>,
}

impl From<&TrackedPost> for PostSummaryDto {
    fn from(post: &TrackedPost) -> Self {
        Self {
            platform: post.platform.to_string(),
            url: post.url.clone(),
            video_id: post.video_id.clone(),
            views: post.views,
            likes: post.likes,
            shares: post.shares,
            is_bounty: post.is_bounty,
            bounty_tag: post.bounty_tag.as_ref().map(ToString::to_string),
            earned_usd: post.final_earned_usd.round_dp(2).to_string(),
            uploaded_at: post.uploaded_at,
        }
    }
}

/// Response body for `GET /api/v1/posts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    /// Posts on the requested page, most recently tracked first.
    pub data: Vec<PostSummaryDto>,
    /// Pagination metadata.
    #[schema(value_type = Object)]
    pub pagination: PaginationMeta,
}

/// Query parameters for `GET /api/v1/posts`.
#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    /// Creator to list posts for.
    pub owner_id: String,
}

/// Request body for `POST /api/v1/posts/bounty`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignBountyRequest {
    /// Platform name.
    pub platform: String,
    /// Post URL.
    pub url: String,
    /// Campaign tag (normalized server-side).
    pub bounty_tag: String,
}

/// Response body for `POST /api/v1/posts/bounty`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignBountyResponse {
    /// Normalized campaign tag.
    pub bounty_tag: String,
    /// View baseline snapshotted at assignment.
    pub starting_views: u64,
}

/// Query parameters for `DELETE /api/v1/posts`.
#[derive(Debug, Deserialize)]
pub struct RemovePostParams {
    /// Platform name.
    pub platform: String,
    /// Post URL.
    pub url: String,
    /// When present, the removal is scoped to this owner.
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Response body for `POST /api/v1/owners/{owner_id}/settle`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettleResponse {
    /// Payout-ledger batch identifier.
    pub batch_id: uuid::Uuid,
    /// Creator who was settled.
    pub owner_id: String,
    /// Number of posts removed.
    pub posts_settled: usize,
    /// Total payout across removed posts, at 2 decimal places.
    pub total_usd: String,
}
