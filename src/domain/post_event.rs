//! Domain events reflecting tracked-post and rate mutations.
//!
//! Every state change emits a [`PostEvent`] through the [`super::EventBus`].
//! Events exist for operator tooling and tests; nothing user-facing is
//! pushed in real time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Platform, PostKey};

/// Domain event emitted after every state mutation.
///
/// Monetary amounts are stored as `String` (already rounded) so serialized
/// events never re-expose raw decimal internals.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PostEvent {
    /// Emitted when a post is first enrolled for tracking.
    PostTracked {
        /// Post identity.
        key: PostKey,
        /// Creator the post belongs to.
        owner_id: String,
        /// Tracking timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a counter snapshot overwrites the stored counters.
    CountersUpdated {
        /// Post identity.
        key: PostKey,
        /// New view count.
        views: u64,
        /// New like count.
        likes: u64,
        /// New share count.
        shares: u64,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a recomputation persisted a changed payout.
    EarningsUpdated {
        /// Post identity.
        key: PostKey,
        /// Previous stored payout (USD).
        old_earned_usd: String,
        /// Newly stored payout (USD).
        new_earned_usd: String,
        /// Recomputation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a post is (re)assigned to a bounty campaign.
    BountyAssigned {
        /// Post identity.
        key: PostKey,
        /// Normalized campaign tag.
        bounty_tag: String,
        /// View baseline snapshotted at assignment.
        starting_views: u64,
        /// Assignment timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a rate definition is created or overwritten.
    RateUpserted {
        /// Normalized rate key.
        key: String,
        /// Upsert timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a single post is removed from tracking.
    PostRemoved {
        /// Post identity.
        key: PostKey,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a settlement deleted all of an owner's posts.
    OwnerSettled {
        /// Creator whose posts were settled.
        owner_id: String,
        /// Number of posts removed.
        posts_settled: usize,
        /// Total payout across removed posts (USD).
        total_usd: String,
        /// Settlement timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted once per accepted ingestion batch.
    MetricsIngested {
        /// Platform the batch targeted.
        platform: Platform,
        /// Creator the batch belongs to.
        owner_id: String,
        /// Items persisted successfully.
        processed: usize,
        /// Items skipped as malformed.
        skipped: usize,
        /// Ingestion timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl PostEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PostTracked { .. } => "post_tracked",
            Self::CountersUpdated { .. } => "counters_updated",
            Self::EarningsUpdated { .. } => "earnings_updated",
            Self::BountyAssigned { .. } => "bounty_assigned",
            Self::RateUpserted { .. } => "rate_upserted",
            Self::PostRemoved { .. } => "post_removed",
            Self::OwnerSettled { .. } => "owner_settled",
            Self::MetricsIngested { .. } => "metrics_ingested",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn earnings_updated_event_type() {
        let event = PostEvent::EarningsUpdated {
            key: PostKey::new(Platform::Youtube, "https://youtube.com/watch?v=abc"),
            old_earned_usd: "0.0000".to_string(),
            new_earned_usd: "50.0000".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "earnings_updated");
    }

    #[test]
    fn bounty_assigned_serializes_with_discriminant() {
        let event = PostEvent::BountyAssigned {
            key: PostKey::new(Platform::Tiktok, "https://tiktok.com/@u/video/1"),
            bounty_tag: "spring".to_string(),
            starting_views: 5000,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("bounty_assigned"));
        assert!(json.contains("5000"));
    }
}
