//! Tracking service: orchestrates post, rate, and account operations.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    AccountDirectory, ActiveAccount, EngagementCounters, EventBus, Platform, PostEvent, PostKey,
    PostStore, RateDefinition, RateKey, RateRegistry, RateShape, SocialAccount, TrackedPost,
};
use crate::earnings::compute_earnings;
use crate::error::GatewayError;
use crate::persistence::models::PayoutRecord;
use crate::persistence::postgres::PostgresPersistence;

/// One item of an ingestion batch, already deserialized but not yet
/// validated.
///
/// `platform` optionally overrides the batch-level platform; a malformed
/// override fails only this item, preserving per-item isolation.
#[derive(Debug, Clone)]
pub struct IngestItem {
    /// Optional per-item platform override (raw string, parsed per item).
    pub platform: Option<String>,
    /// External content identifier.
    pub video_id: String,
    /// Post URL.
    pub url: String,
    /// View count.
    pub views: u64,
    /// Like count.
    pub likes: u64,
    /// Share count.
    pub shares: u64,
}

/// Outcome of an ingestion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Items persisted successfully.
    pub processed: usize,
    /// Items skipped as malformed.
    pub skipped: usize,
}

/// Outcome of recomputing one post's earnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// A changed payout was persisted.
    Updated {
        /// The newly stored payout.
        amount: Decimal,
    },
    /// The stored payout already matched; no write was issued.
    Unchanged,
    /// No rate definition applies to the post; nothing was touched.
    NoRate,
}

/// Result of settling ("marking as paid") an owner's posts.
#[derive(Debug, Clone)]
pub struct SettlementSummary {
    /// Identifier of the payout-ledger batch written for this settlement.
    pub batch_id: Uuid,
    /// Creator whose posts were settled.
    pub owner_id: String,
    /// Number of posts removed.
    pub posts_settled: usize,
    /// Total payout across removed posts.
    pub total_usd: Decimal,
}

/// Orchestration layer for all tracking operations.
///
/// Stateless coordinator: owns references to the [`PostStore`],
/// [`RateRegistry`], and [`AccountDirectory`] for state, the [`EventBus`]
/// for event emission, and optionally the payout ledger. Both the inline
/// ingestion path and the reconciliation sweep recompute earnings through
/// [`TrackingService::recompute_post`], so the two paths cannot diverge.
#[derive(Debug, Clone)]
pub struct TrackingService {
    store: Arc<PostStore>,
    rates: Arc<RateRegistry>,
    accounts: Arc<AccountDirectory>,
    event_bus: EventBus,
    ledger: Option<PostgresPersistence>,
}

impl TrackingService {
    /// Creates a new `TrackingService`.
    #[must_use]
    pub fn new(
        store: Arc<PostStore>,
        rates: Arc<RateRegistry>,
        accounts: Arc<AccountDirectory>,
        event_bus: EventBus,
        ledger: Option<PostgresPersistence>,
    ) -> Self {
        Self {
            store,
            rates,
            accounts,
            event_bus,
            ledger,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`PostStore`].
    #[must_use]
    pub fn store(&self) -> &Arc<PostStore> {
        &self.store
    }

    /// Returns a reference to the inner [`RateRegistry`].
    #[must_use]
    pub fn rates(&self) -> &Arc<RateRegistry> {
        &self.rates
    }

    // ── Ingestion ───────────────────────────────────────────────────────

    /// Ingests a batch of counter snapshots for one creator.
    ///
    /// Each item is upserted and its earnings recomputed inline, giving
    /// faster visibility than waiting for the next sweep. A malformed item
    /// is skipped with a warning and does not abort the rest of the batch.
    pub async fn ingest_batch(
        &self,
        platform: Platform,
        owner_id: &str,
        items: Vec<IngestItem>,
    ) -> IngestReport {
        let mut processed = 0;
        let mut skipped = 0;
        for item in &items {
            match self.ingest_item(platform, owner_id, item).await {
                Ok(()) => processed += 1,
                Err(err) => {
                    skipped += 1;
                    tracing::warn!(%err, url = %item.url, "skipping malformed ingestion item");
                }
            }
        }

        let _ = self.event_bus.publish(PostEvent::MetricsIngested {
            platform,
            owner_id: owner_id.to_string(),
            processed,
            skipped,
            timestamp: Utc::now(),
        });
        tracing::info!(%platform, owner_id, processed, skipped, "ingested metrics batch");

        IngestReport { processed, skipped }
    }

    async fn ingest_item(
        &self,
        default_platform: Platform,
        owner_id: &str,
        item: &IngestItem,
    ) -> Result<(), GatewayError> {
        let platform = match item.platform.as_deref() {
            Some(raw) => raw.parse()?,
            None => default_platform,
        };
        if item.url.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("url is empty".to_string()));
        }

        let key = PostKey::new(platform, &item.url);
        let counters = EngagementCounters {
            views: item.views,
            likes: item.likes,
            shares: item.shares,
        };
        let created = self
            .store
            .upsert_metrics(&key, owner_id, &item.video_id, counters)
            .await;

        if created {
            let _ = self.event_bus.publish(PostEvent::PostTracked {
                key: key.clone(),
                owner_id: owner_id.to_string(),
                timestamp: Utc::now(),
            });
        } else {
            let _ = self.event_bus.publish(PostEvent::CountersUpdated {
                key: key.clone(),
                views: counters.views,
                likes: counters.likes,
                shares: counters.shares,
                timestamp: Utc::now(),
            });
        }

        // The counters are already persisted; a recompute failure (e.g. a
        // concurrent removal) must not fail the item.
        if let Err(err) = self.recompute_post(&key).await {
            tracing::warn!(%err, post = %key, "inline earnings recompute failed");
        }
        Ok(())
    }

    // ── Earnings ────────────────────────────────────────────────────────

    /// Recomputes one post's earnings under its currently applicable rate
    /// and persists the result only when it changed.
    ///
    /// A post with no applicable rate (bounty tag without a definition) is
    /// a deliberate no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PostNotFound`] if the post is not tracked.
    pub async fn recompute_post(&self, key: &PostKey) -> Result<RecomputeOutcome, GatewayError> {
        let post = self.store.snapshot(key).await?;
        let Some(rate_key) = post.rate_key() else {
            return Ok(RecomputeOutcome::NoRate);
        };
        let Some(def) = self.rates.get(&rate_key).await else {
            return Ok(RecomputeOutcome::NoRate);
        };

        let outcome = compute_earnings(
            &def.shape,
            post.starting_views,
            post.views,
            post.final_earned_usd,
        );
        if !outcome.changed {
            return Ok(RecomputeOutcome::Unchanged);
        }

        match self.store.update_earnings(key, outcome.amount).await? {
            Some(old) => {
                let _ = self.event_bus.publish(PostEvent::EarningsUpdated {
                    key: key.clone(),
                    old_earned_usd: old.to_string(),
                    new_earned_usd: outcome.amount.to_string(),
                    timestamp: Utc::now(),
                });
                Ok(RecomputeOutcome::Updated {
                    amount: outcome.amount,
                })
            }
            // A concurrent recompute stored the same value first.
            None => Ok(RecomputeOutcome::Unchanged),
        }
    }

    // ── Bounties and rates ──────────────────────────────────────────────

    /// (Re)assigns a post to a bounty campaign, resetting its baseline and
    /// computed payout. Returns the snapshotted baseline.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty tag or
    /// [`GatewayError::PostNotFound`] if the post is not tracked.
    pub async fn assign_bounty(&self, key: &PostKey, raw_tag: &str) -> Result<u64, GatewayError> {
        let tag = RateKey::new(raw_tag);
        if tag.as_str().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "bounty tag is empty".to_string(),
            ));
        }
        if self.rates.get(&tag).await.is_none() {
            // Fail-open: the post accrues nothing until the rate exists.
            tracing::warn!(tag = %tag, post = %key, "bounty assigned with no rate definition");
        }

        let starting_views = self.store.assign_bounty(key, tag.clone()).await?;
        let _ = self.event_bus.publish(PostEvent::BountyAssigned {
            key: key.clone(),
            bounty_tag: tag.to_string(),
            starting_views,
            timestamp: Utc::now(),
        });
        tracing::info!(post = %key, tag = %tag, starting_views, "bounty assigned");
        Ok(starting_views)
    }

    /// Creates or overwrites a rate definition.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRate`] when the shape fails
    /// creation-time validation.
    pub async fn upsert_rate(
        &self,
        raw_key: &str,
        shape: RateShape,
    ) -> Result<RateDefinition, GatewayError> {
        let def = RateDefinition::new(raw_key, shape)?;
        self.rates.upsert(def.clone()).await;
        let _ = self.event_bus.publish(PostEvent::RateUpserted {
            key: def.key.to_string(),
            timestamp: Utc::now(),
        });
        tracing::info!(key = %def.key, "rate upserted");
        Ok(def)
    }

    /// Looks up a rate definition for the admin surface.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RateNotFound`] when the key has no
    /// definition.
    pub async fn get_rate(&self, raw_key: &str) -> Result<RateDefinition, GatewayError> {
        let key = RateKey::new(raw_key);
        self.rates
            .get(&key)
            .await
            .ok_or_else(|| GatewayError::RateNotFound(key.to_string()))
    }

    /// Returns all rate definitions, unordered.
    pub async fn list_rates(&self) -> Vec<RateDefinition> {
        self.rates.list().await
    }

    /// Deletes a rate definition.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RateNotFound`] when the key has no
    /// definition.
    pub async fn remove_rate(&self, raw_key: &str) -> Result<RateDefinition, GatewayError> {
        let key = RateKey::new(raw_key);
        self.rates
            .remove(&key)
            .await
            .ok_or_else(|| GatewayError::RateNotFound(key.to_string()))
    }

    // ── Post management ─────────────────────────────────────────────────

    /// Removes one post, optionally scoped to an owner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PostNotFound`] if the post is not tracked
    /// or belongs to a different owner.
    pub async fn remove_post(
        &self,
        key: &PostKey,
        owner_id: Option<&str>,
    ) -> Result<TrackedPost, GatewayError> {
        let post = self.store.remove(key, owner_id).await?;
        let _ = self.event_bus.publish(PostEvent::PostRemoved {
            key: key.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(post = %key, "post removed");
        Ok(post)
    }

    /// Returns an owner's posts, most recently tracked first.
    pub async fn list_posts(&self, owner_id: &str) -> Vec<TrackedPost> {
        let mut posts = self.store.list_by_owner(owner_id).await;
        posts.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        posts
    }

    /// Settles ("marks as paid") all of an owner's posts.
    ///
    /// The payout ledger is written *before* any deletion: if the ledger
    /// write fails the posts are retained and the settlement aborts. Posts
    /// ingested concurrently with the settlement are neither recorded nor
    /// deleted and survive to the next settlement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the ledger write
    /// fails.
    pub async fn settle_owner(&self, owner_id: &str) -> Result<SettlementSummary, GatewayError> {
        let posts = self.store.list_by_owner(owner_id).await;
        let batch_id = Uuid::new_v4();
        let total_usd: Decimal = posts.iter().map(|p| p.final_earned_usd).sum();

        if !posts.is_empty()
            && let Some(ledger) = &self.ledger
        {
            let written = ledger.save_payout_batch(batch_id, owner_id, &posts).await?;
            tracing::info!(owner_id, %batch_id, written, "payout ledger batch written");
        }

        for post in &posts {
            let key = PostKey::new(post.platform, &post.url);
            // A concurrent single-post removal is fine; skip it.
            if let Err(err) = self.store.remove(&key, None).await {
                tracing::debug!(%err, post = %key, "post vanished during settlement");
            }
        }

        let summary = SettlementSummary {
            batch_id,
            owner_id: owner_id.to_string(),
            posts_settled: posts.len(),
            total_usd,
        };
        let _ = self.event_bus.publish(PostEvent::OwnerSettled {
            owner_id: owner_id.to_string(),
            posts_settled: summary.posts_settled,
            total_usd: summary.total_usd.to_string(),
            timestamp: Utc::now(),
        });
        tracing::info!(owner_id, posts = summary.posts_settled, total = %summary.total_usd, "owner settled");
        Ok(summary)
    }

    /// Reads an owner's payout-ledger records.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the ledger is
    /// disabled, or [`GatewayError::PersistenceError`] on database failure.
    pub async fn payouts_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<PayoutRecord>, GatewayError> {
        let Some(ledger) = &self.ledger else {
            return Err(GatewayError::InvalidRequest(
                "payout ledger is disabled".to_string(),
            ));
        };
        ledger.load_payouts_for_owner(owner_id).await
    }

    // ── Accounts ────────────────────────────────────────────────────────

    /// Registers a social account and returns its verification code.
    pub async fn register_account(
        &self,
        owner_id: &str,
        platform: Platform,
        username: &str,
    ) -> SocialAccount {
        self.accounts.register(owner_id, platform, username).await
    }

    /// Marks an account verified (pushed by the external workflow).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AccountNotFound`] when no matching
    /// registration exists.
    pub async fn confirm_verification(
        &self,
        owner_id: &str,
        platform: Platform,
        username: &str,
    ) -> Result<(), GatewayError> {
        self.accounts
            .confirm_verification(owner_id, platform, username)
            .await
    }

    /// Returns all verified accounts on a platform.
    pub async fn active_accounts(&self, platform: Platform) -> Vec<ActiveAccount> {
        self.accounts.list_active(platform).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_service() -> TrackingService {
        TrackingService::new(
            Arc::new(PostStore::new()),
            Arc::new(RateRegistry::new()),
            Arc::new(AccountDirectory::new()),
            EventBus::new(1000),
            None,
        )
    }

    fn item(url: &str, views: u64) -> IngestItem {
        IngestItem {
            platform: None,
            video_id: "vid".to_string(),
            url: url.to_string(),
            views,
            likes: views / 10,
            shares: 0,
        }
    }

    async fn seed_standard_rate(service: &TrackingService) {
        let result = service
            .upsert_rate(
                RateKey::STANDARD,
                RateShape::Proportional {
                    amount_per_1000: dec!(0.60),
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn ingest_computes_standard_earnings_from_view_zero() {
        let service = make_service();
        seed_standard_rate(&service).await;

        let report = service
            .ingest_batch(
                Platform::Youtube,
                "creator-1",
                vec![item("https://youtube.com/watch?v=a", 25_500)],
            )
            .await;
        assert_eq!(report.processed, 1);

        let key = PostKey::new(Platform::Youtube, "https://youtube.com/watch?v=a");
        let Ok(post) = service.store().snapshot(&key).await else {
            panic!("post missing");
        };
        assert_eq!(post.final_earned_usd, dec!(15.3000));
    }

    #[tokio::test]
    async fn malformed_item_does_not_abort_batch() {
        let service = make_service();
        seed_standard_rate(&service).await;

        let mut bad = item("https://example.com/v/2", 100);
        bad.platform = Some("myspace".to_string());

        let report = service
            .ingest_batch(
                Platform::Youtube,
                "creator-1",
                vec![
                    item("https://youtube.com/watch?v=1", 100),
                    bad,
                    item("https://youtube.com/watch?v=3", 300),
                ],
            )
            .await;

        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(service.store().len().await, 2);
    }

    #[tokio::test]
    async fn bounty_reassignment_resets_baseline_and_earns_zero() {
        let service = make_service();
        seed_standard_rate(&service).await;
        let result = service
            .upsert_rate(
                "spring",
                RateShape::Flat {
                    amount_usd: dec!(5.00),
                    per_views: 1000,
                },
            )
            .await;
        assert!(result.is_ok());

        let key = PostKey::new(Platform::Youtube, "https://youtube.com/watch?v=a");
        let _ = service
            .ingest_batch(
                Platform::Youtube,
                "creator-1",
                vec![item("https://youtube.com/watch?v=a", 5000)],
            )
            .await;

        let Ok(baseline) = service.assign_bounty(&key, "Spring").await else {
            panic!("assign failed");
        };
        assert_eq!(baseline, 5000);

        // No new views yet: recompute must leave the payout at zero.
        let Ok(outcome) = service.recompute_post(&key).await else {
            panic!("recompute failed");
        };
        assert_eq!(outcome, RecomputeOutcome::Unchanged);
        let Ok(post) = service.store().snapshot(&key).await else {
            panic!("post missing");
        };
        assert_eq!(post.final_earned_usd, Decimal::ZERO);

        // Views grow: flat rate pays on the gain only.
        let Ok(()) = service
            .store()
            .update_counters(
                &key,
                EngagementCounters {
                    views: 15_000,
                    likes: 0,
                    shares: 0,
                },
            )
            .await
        else {
            panic!("counter update failed");
        };
        let Ok(outcome) = service.recompute_post(&key).await else {
            panic!("recompute failed");
        };
        assert_eq!(
            outcome,
            RecomputeOutcome::Updated {
                amount: dec!(50.0000)
            }
        );
    }

    #[tokio::test]
    async fn unrecognized_bounty_tag_is_a_no_op_across_recomputes() {
        let service = make_service();
        let key = PostKey::new(Platform::Tiktok, "https://tiktok.com/@u/video/1");
        let _ = service
            .ingest_batch(
                Platform::Tiktok,
                "creator-1",
                vec![item("https://tiktok.com/@u/video/1", 9000)],
            )
            .await;
        let Ok(_) = service.assign_bounty(&key, "UNKNOWN").await else {
            panic!("assign failed");
        };

        for _ in 0..3 {
            let Ok(outcome) = service.recompute_post(&key).await else {
                panic!("recompute failed");
            };
            assert_eq!(outcome, RecomputeOutcome::NoRate);
        }
        let Ok(post) = service.store().snapshot(&key).await else {
            panic!("post missing");
        };
        assert_eq!(post.final_earned_usd, Decimal::ZERO);
        assert_eq!(service.store().earnings_write_count(), 0);
    }

    #[tokio::test]
    async fn repeated_recompute_avoids_writes() {
        let service = make_service();
        seed_standard_rate(&service).await;
        let key = PostKey::new(Platform::Youtube, "https://youtube.com/watch?v=a");
        let _ = service
            .ingest_batch(
                Platform::Youtube,
                "creator-1",
                vec![item("https://youtube.com/watch?v=a", 25_500)],
            )
            .await;
        let writes_after_ingest = service.store().earnings_write_count();

        // Counters and rate unchanged: no further writes may be issued.
        for _ in 0..5 {
            let Ok(outcome) = service.recompute_post(&key).await else {
                panic!("recompute failed");
            };
            assert_eq!(outcome, RecomputeOutcome::Unchanged);
        }
        assert_eq!(service.store().earnings_write_count(), writes_after_ingest);
    }

    #[tokio::test]
    async fn settlement_without_ledger_deletes_posts() {
        let service = make_service();
        seed_standard_rate(&service).await;
        let _ = service
            .ingest_batch(
                Platform::Youtube,
                "creator-1",
                vec![
                    item("https://youtube.com/watch?v=1", 10_000),
                    item("https://youtube.com/watch?v=2", 5000),
                ],
            )
            .await;

        let Ok(summary) = service.settle_owner("creator-1").await else {
            panic!("settlement failed");
        };
        assert_eq!(summary.posts_settled, 2);
        assert_eq!(summary.total_usd, dec!(9.0000));
        assert!(service.store().is_empty().await);
    }

    #[tokio::test]
    async fn settling_an_unknown_owner_is_empty_not_an_error() {
        let service = make_service();
        let Ok(summary) = service.settle_owner("nobody").await else {
            panic!("settlement failed");
        };
        assert_eq!(summary.posts_settled, 0);
        assert_eq!(summary.total_usd, Decimal::ZERO);
    }

    #[tokio::test]
    async fn rate_validation_happens_at_the_boundary() {
        let service = make_service();
        let result = service
            .upsert_rate(
                "broken",
                RateShape::Flat {
                    amount_usd: dec!(5.00),
                    per_views: 0,
                },
            )
            .await;
        assert!(result.is_err());
        assert!(service.rates().is_empty().await);
    }
}
