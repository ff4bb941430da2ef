//! Metrics ingestion DTOs.
//!
//! The request shape is the contract with the external scraping workflow
//! and must stay bit-exact: `{owner_id, platform, videos: [...]}` in,
//! `{"status": "ok", "processed": n}` out.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /metrics/ingest`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
    /// Creator the batch belongs to.
    pub owner_id: String,
    /// Platform for every video in the batch (`youtube`, `tiktok`,
    /// `instagram`).
    pub platform: String,
    /// Counter snapshots, one per video.
    pub videos: Vec<IngestVideoDto>,
}

/// One counter snapshot inside an ingestion batch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestVideoDto {
    /// External content identifier.
    pub video_id: String,
    /// Post URL (the upsert conflict target).
    pub url: String,
    /// View count.
    #[serde(default)]
    pub views: u64,
    /// Like count.
    #[serde(default)]
    pub likes: u64,
    /// Share count.
    #[serde(default)]
    pub shares: u64,
    /// Optional per-video platform override. Malformed values skip only
    /// this video.
    #[serde(default)]
    pub platform: Option<String>,
}

/// Response body for `POST /metrics/ingest`.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Always `"ok"` when the batch was accepted.
    pub status: String,
    /// Number of items persisted successfully.
    pub processed: usize,
}
