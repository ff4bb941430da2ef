//! Concurrent tracked-post storage with per-post fine-grained locking.
//!
//! [`PostStore`] keeps all tracked posts in a `HashMap` keyed by
//! [`PostKey`], each entry individually protected by a
//! [`tokio::sync::RwLock`]. Every mutation is atomic at post granularity;
//! there is deliberately no transaction spanning several posts. The
//! reconciliation sweep and the ingestion path both rely on
//! [`PostStore::update_earnings`] comparing against the value stored at
//! write time, so racing recomputations converge instead of double-writing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::post_key::PostKey;
use super::rate::RateKey;
use super::tracked_post::{EngagementCounters, TrackedPost};
use crate::error::GatewayError;

/// Central store for all tracked posts across every platform partition.
///
/// # Concurrency
///
/// - Multiple tasks may read the same post concurrently.
/// - Writes to different posts are concurrent.
/// - Writes to the same post are serialized.
#[derive(Debug)]
pub struct PostStore {
    posts: RwLock<HashMap<PostKey, Arc<RwLock<TrackedPost>>>>,
    earnings_writes: AtomicU64,
}

impl PostStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            earnings_writes: AtomicU64::new(0),
        }
    }

    /// Insert-or-update keyed by `(platform, url)`.
    ///
    /// On insert the view baseline defaults to zero, so organically-ingested
    /// posts earn from view zero. On update the counters are overwritten
    /// unconditionally (last-write-wins; no timestamp ordering is tracked).
    ///
    /// Returns `true` when a new post was created.
    pub async fn upsert_metrics(
        &self,
        key: &PostKey,
        owner_id: &str,
        video_id: &str,
        counters: EngagementCounters,
    ) -> bool {
        {
            let map = self.posts.read().await;
            if let Some(entry_lock) = map.get(key) {
                let mut entry = entry_lock.write().await;
                overwrite_counters(&mut entry, counters);
                return false;
            }
        }

        let mut map = self.posts.write().await;
        // A concurrent upsert may have inserted between the two locks.
        if let Some(entry_lock) = map.get(key) {
            let mut entry = entry_lock.write().await;
            overwrite_counters(&mut entry, counters);
            return false;
        }
        let post = TrackedPost::new(key.platform, owner_id, &key.url, video_id, counters);
        map.insert(key.clone(), Arc::new(RwLock::new(post)));
        true
    }

    /// Overwrites the counters of an existing post.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PostNotFound`] if the post is not tracked.
    pub async fn update_counters(
        &self,
        key: &PostKey,
        counters: EngagementCounters,
    ) -> Result<(), GatewayError> {
        let entry_lock = self.get(key).await?;
        let mut entry = entry_lock.write().await;
        overwrite_counters(&mut entry, counters);
        Ok(())
    }

    /// Assigns the post to a bounty campaign.
    ///
    /// Snapshots the current view count as the new baseline and resets the
    /// computed payout to zero: a post moved between bounties restarts its
    /// gained-views counter.
    ///
    /// Returns the snapshotted baseline.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PostNotFound`] if the post is not tracked.
    pub async fn assign_bounty(&self, key: &PostKey, tag: RateKey) -> Result<u64, GatewayError> {
        let entry_lock = self.get(key).await?;
        let mut entry = entry_lock.write().await;
        entry.is_bounty = true;
        entry.bounty_tag = Some(tag);
        entry.starting_views = entry.views;
        entry.final_earned_usd = Decimal::ZERO;
        Ok(entry.starting_views)
    }

    /// Conditionally persists a recomputed payout.
    ///
    /// The new value is compared against the value stored *at write time*,
    /// not against whatever snapshot the caller computed from; an equal
    /// value issues no write at all. Returns the previous value when a
    /// write occurred, `None` when the stored value was already equal.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PostNotFound`] if the post is not tracked.
    pub async fn update_earnings(
        &self,
        key: &PostKey,
        new_earned_usd: Decimal,
    ) -> Result<Option<Decimal>, GatewayError> {
        let entry_lock = self.get(key).await?;
        let mut entry = entry_lock.write().await;
        if entry.final_earned_usd == new_earned_usd {
            return Ok(None);
        }
        let old = entry.final_earned_usd;
        entry.final_earned_usd = new_earned_usd;
        self.earnings_writes.fetch_add(1, Ordering::Relaxed);
        Ok(Some(old))
    }

    /// Returns a point-in-time copy of a tracked post.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PostNotFound`] if the post is not tracked.
    pub async fn snapshot(&self, key: &PostKey) -> Result<TrackedPost, GatewayError> {
        let entry_lock = self.get(key).await?;
        let entry = entry_lock.read().await;
        Ok(entry.clone())
    }

    /// Removes one post, optionally scoped to an owner for authorization.
    ///
    /// Returns the removed post.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PostNotFound`] if the post is not tracked or
    /// belongs to a different owner.
    pub async fn remove(
        &self,
        key: &PostKey,
        owner_id: Option<&str>,
    ) -> Result<TrackedPost, GatewayError> {
        let mut map = self.posts.write().await;
        let entry_lock = map
            .get(key)
            .ok_or_else(|| GatewayError::PostNotFound(key.to_string()))?;
        let post = entry_lock.read().await.clone();
        if let Some(owner) = owner_id
            && post.owner_id != owner
        {
            return Err(GatewayError::PostNotFound(key.to_string()));
        }
        map.remove(key);
        Ok(post)
    }

    /// Bulk-deletes every post belonging to an owner across all platform
    /// partitions, returning the removed posts.
    pub async fn remove_all_for_owner(&self, owner_id: &str) -> Vec<TrackedPost> {
        let mut map = self.posts.write().await;
        let keys: Vec<PostKey> = {
            let mut matched = Vec::new();
            for (key, entry_lock) in map.iter() {
                let entry = entry_lock.read().await;
                if entry.owner_id == owner_id {
                    matched.push(key.clone());
                }
            }
            matched
        };
        let mut removed = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(entry_lock) = map.remove(&key) {
                removed.push(entry_lock.read().await.clone());
            }
        }
        removed
    }

    /// Returns copies of all bounty-flagged posts, every platform included.
    ///
    /// This is the reconciliation sweep's candidate set.
    pub async fn list_bounty_posts(&self) -> Vec<TrackedPost> {
        let map = self.posts.read().await;
        let mut posts = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if entry.is_bounty {
                posts.push(entry.clone());
            }
        }
        posts
    }

    /// Returns copies of all posts belonging to an owner, unordered.
    pub async fn list_by_owner(&self, owner_id: &str) -> Vec<TrackedPost> {
        let map = self.posts.read().await;
        let mut posts = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if entry.owner_id == owner_id {
                posts.push(entry.clone());
            }
        }
        posts
    }

    /// Returns the number of tracked posts.
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    /// Returns `true` if no posts are tracked.
    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    /// Number of earnings writes actually issued since construction.
    ///
    /// Only incremented when [`PostStore::update_earnings`] persists a
    /// changed value, so tests can assert write-avoidance.
    #[must_use]
    pub fn earnings_write_count(&self) -> u64 {
        self.earnings_writes.load(Ordering::Relaxed)
    }

    async fn get(&self, key: &PostKey) -> Result<Arc<RwLock<TrackedPost>>, GatewayError> {
        let map = self.posts.read().await;
        map.get(key)
            .cloned()
            .ok_or_else(|| GatewayError::PostNotFound(key.to_string()))
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

fn overwrite_counters(post: &mut TrackedPost, counters: EngagementCounters) {
    post.views = counters.views;
    post.likes = counters.likes;
    post.shares = counters.shares;
    post.last_refreshed_at = chrono::Utc::now();
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Platform;
    use rust_decimal_macros::dec;

    fn key(url: &str) -> PostKey {
        PostKey::new(Platform::Youtube, url)
    }

    fn counters(views: u64) -> EngagementCounters {
        EngagementCounters {
            views,
            likes: views / 10,
            shares: 0,
        }
    }

    #[tokio::test]
    async fn upsert_inserts_with_zero_baseline() {
        let store = PostStore::new();
        let k = key("https://youtube.com/watch?v=a");

        let created = store.upsert_metrics(&k, "creator-1", "a", counters(500)).await;
        assert!(created);

        let Ok(post) = store.snapshot(&k).await else {
            panic!("post missing after upsert");
        };
        assert_eq!(post.starting_views, 0);
        assert_eq!(post.views, 500);
    }

    #[tokio::test]
    async fn upsert_overwrites_counters_on_existing_post() {
        let store = PostStore::new();
        let k = key("https://youtube.com/watch?v=a");
        let _ = store.upsert_metrics(&k, "creator-1", "a", counters(500)).await;

        let created = store.upsert_metrics(&k, "creator-1", "a", counters(300)).await;
        assert!(!created);

        let Ok(post) = store.snapshot(&k).await else {
            panic!("post missing");
        };
        // Last-write-wins: a stale lower sample still overwrites.
        assert_eq!(post.views, 300);
    }

    #[tokio::test]
    async fn assign_bounty_snapshots_baseline_and_resets_earnings() {
        let store = PostStore::new();
        let k = key("https://youtube.com/watch?v=a");
        let _ = store.upsert_metrics(&k, "creator-1", "a", counters(5000)).await;
        let _ = store.update_earnings(&k, dec!(3.0000)).await;

        let Ok(baseline) = store.assign_bounty(&k, RateKey::new("Spring")).await else {
            panic!("assign failed");
        };
        assert_eq!(baseline, 5000);

        let Ok(post) = store.snapshot(&k).await else {
            panic!("post missing");
        };
        assert!(post.is_bounty);
        assert_eq!(post.bounty_tag, Some(RateKey::new("spring")));
        assert_eq!(post.starting_views, 5000);
        assert_eq!(post.final_earned_usd, Decimal::ZERO);
    }

    #[tokio::test]
    async fn assign_bounty_on_unknown_post_fails() {
        let store = PostStore::new();
        let result = store
            .assign_bounty(&key("https://youtube.com/watch?v=x"), RateKey::new("t"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_earnings_skips_write_when_unchanged() {
        let store = PostStore::new();
        let k = key("https://youtube.com/watch?v=a");
        let _ = store.upsert_metrics(&k, "creator-1", "a", counters(500)).await;

        let Ok(first) = store.update_earnings(&k, dec!(1.5000)).await else {
            panic!("update failed");
        };
        assert_eq!(first, Some(Decimal::ZERO));
        assert_eq!(store.earnings_write_count(), 1);

        let Ok(second) = store.update_earnings(&k, dec!(1.5000)).await else {
            panic!("update failed");
        };
        assert_eq!(second, None);
        assert_eq!(store.earnings_write_count(), 1);
    }

    #[tokio::test]
    async fn remove_scoped_to_wrong_owner_fails() {
        let store = PostStore::new();
        let k = key("https://youtube.com/watch?v=a");
        let _ = store.upsert_metrics(&k, "creator-1", "a", counters(500)).await;

        let result = store.remove(&k, Some("someone-else")).await;
        assert!(result.is_err());
        assert_eq!(store.len().await, 1);

        let result = store.remove(&k, Some("creator-1")).await;
        assert!(result.is_ok());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn remove_all_for_owner_spans_platforms() {
        let store = PostStore::new();
        let yt = PostKey::new(Platform::Youtube, "https://youtube.com/watch?v=a");
        let tt = PostKey::new(Platform::Tiktok, "https://tiktok.com/@u/video/1");
        let other = PostKey::new(Platform::Youtube, "https://youtube.com/watch?v=b");
        let _ = store.upsert_metrics(&yt, "creator-1", "a", counters(10)).await;
        let _ = store.upsert_metrics(&tt, "creator-1", "1", counters(20)).await;
        let _ = store.upsert_metrics(&other, "creator-2", "b", counters(30)).await;

        let removed = store.remove_all_for_owner("creator-1").await;
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn list_bounty_posts_filters_flag() {
        let store = PostStore::new();
        let a = key("https://youtube.com/watch?v=a");
        let b = key("https://youtube.com/watch?v=b");
        let _ = store.upsert_metrics(&a, "creator-1", "a", counters(10)).await;
        let _ = store.upsert_metrics(&b, "creator-1", "b", counters(20)).await;
        let _ = store.assign_bounty(&a, RateKey::new("spring")).await;

        let bounty = store.list_bounty_posts().await;
        assert_eq!(bounty.len(), 1);
        let Some(post) = bounty.first() else {
            panic!("expected one bounty post");
        };
        assert_eq!(post.url, "https://youtube.com/watch?v=a");
    }
}
