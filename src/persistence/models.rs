//! Database models for the payout ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the `payout_records` table: a single post's payout at the
/// moment its owner was settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRecord {
    /// Auto-increment row ID.
    pub id: i64,
    /// Settlement batch this record belongs to.
    pub batch_id: Uuid,
    /// Creator who was paid.
    pub owner_id: String,
    /// Platform the post lived on.
    pub platform: String,
    /// Post URL at settlement time.
    pub post_url: String,
    /// External content identifier.
    pub video_id: String,
    /// View count at settlement time.
    pub views: i64,
    /// Payout amount in USD.
    pub amount_usd: Decimal,
    /// Server-side settlement timestamp.
    pub settled_at: DateTime<Utc>,
}
