//! Tracked post entity and engagement counters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{Platform, RateKey};

/// Raw engagement counter snapshot for a post.
///
/// Counters are last-write-wins: the external producer may deliver stale
/// samples out of order, so a stored value can momentarily decrease. The
/// earnings path, not the counter path, is responsible for making sure a
/// stale sample never lowers the computed payout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngagementCounters {
    /// View count.
    pub views: u64,
    /// Like count.
    pub likes: u64,
    /// Share count.
    pub shares: u64,
}

/// A single social-media URL enrolled for metrics collection and payout
/// computation.
#[derive(Debug, Clone)]
pub struct TrackedPost {
    /// Platform partition.
    pub platform: Platform,
    /// Opaque stable creator identifier.
    pub owner_id: String,
    /// Post URL, unique within the platform partition.
    pub url: String,
    /// External content identifier (informational).
    pub video_id: String,
    /// Last known view count.
    pub views: u64,
    /// Last known like count.
    pub likes: u64,
    /// Last known share count.
    pub shares: u64,
    /// Whether the post is assigned to a bounty campaign.
    pub is_bounty: bool,
    /// Bounty campaign tag when `is_bounty` is set.
    pub bounty_tag: Option<RateKey>,
    /// View baseline captured at bounty enrollment; gained views are
    /// measured against this. Organically-ingested posts start at zero so
    /// early earnings reflect total views.
    pub starting_views: u64,
    /// Last computed payout in USD, 4 decimal places.
    pub final_earned_usd: Decimal,
    /// When the post was first tracked.
    pub uploaded_at: DateTime<Utc>,
    /// When counters were last overwritten.
    pub last_refreshed_at: DateTime<Utc>,
}

impl TrackedPost {
    /// Creates a freshly tracked post from an ingestion upsert.
    ///
    /// The baseline defaults to zero on this path; only bounty enrollment
    /// snapshots the current count.
    #[must_use]
    pub fn new(
        platform: Platform,
        owner_id: &str,
        url: &str,
        video_id: &str,
        counters: EngagementCounters,
    ) -> Self {
        let now = Utc::now();
        Self {
            platform,
            owner_id: owner_id.to_string(),
            url: url.trim().to_string(),
            video_id: video_id.to_string(),
            views: counters.views,
            likes: counters.likes,
            shares: counters.shares,
            is_bounty: false,
            bounty_tag: None,
            starting_views: 0,
            final_earned_usd: Decimal::ZERO,
            uploaded_at: now,
            last_refreshed_at: now,
        }
    }

    /// The rate key currently governing this post's payout.
    ///
    /// A bounty post resolves to its tag; everything else resolves to the
    /// standard rate. Returns `None` for a bounty post with no tag, which
    /// accrues nothing until reassigned.
    #[must_use]
    pub fn rate_key(&self) -> Option<RateKey> {
        if self.is_bounty {
            self.bounty_tag.clone()
        } else {
            Some(RateKey::standard())
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_post() -> TrackedPost {
        TrackedPost::new(
            Platform::Youtube,
            "creator-1",
            "https://youtube.com/watch?v=abc",
            "abc",
            EngagementCounters {
                views: 1200,
                likes: 40,
                shares: 3,
            },
        )
    }

    #[test]
    fn new_post_has_zero_baseline() {
        let post = make_post();
        assert_eq!(post.starting_views, 0);
        assert_eq!(post.final_earned_usd, Decimal::ZERO);
        assert!(!post.is_bounty);
    }

    #[test]
    fn standard_post_resolves_to_standard_rate() {
        let post = make_post();
        assert_eq!(post.rate_key(), Some(RateKey::standard()));
    }

    #[test]
    fn bounty_post_resolves_to_its_tag() {
        let mut post = make_post();
        post.is_bounty = true;
        post.bounty_tag = Some(RateKey::new("spring"));
        assert_eq!(post.rate_key(), Some(RateKey::new("spring")));
    }

    #[test]
    fn bounty_post_without_tag_resolves_to_none() {
        let mut post = make_post();
        post.is_bounty = true;
        post.bounty_tag = None;
        assert_eq!(post.rate_key(), None);
    }

    #[test]
    fn new_post_keeps_ingested_counters() {
        let post = make_post();
        assert_eq!(post.views, 1200);
        assert_eq!(post.likes, 40);
        assert_eq!(post.shares, 3);
        assert_eq!(post.final_earned_usd, dec!(0));
    }
}
