//! Background metrics-reconciliation loop.
//!
//! [`SweepWorker`] periodically revisits every bounty-flagged post, resolves
//! the rate that currently applies, and persists a recomputed payout only
//! when it changed. Each post is processed independently: a missing rate or
//! a store error on one post never aborts the rest of the sweep.
//!
//! The sweep is deliberately not transactional across posts. A bounty
//! reassignment or rate edit racing a sweep can produce one stale write;
//! the next sweep corrects it. Shutdown may abandon an in-flight sweep —
//! every write is independently atomic, so that is safe.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::service::{RecomputeOutcome, TrackingService};

/// Counters for one full reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Bounty posts visited.
    pub scanned: usize,
    /// Posts whose payout changed and was persisted.
    pub updated: usize,
    /// Posts skipped because no rate definition applied.
    pub no_rate: usize,
    /// Posts whose recompute failed (logged and skipped).
    pub failed: usize,
}

/// Periodic worker that reconciles earnings for all bounty-flagged posts.
///
/// Recomputation goes through [`TrackingService::recompute_post`], the same
/// code path the inline ingestion recompute uses, so the two paths converge
/// on identical stored values for identical inputs.
#[derive(Debug)]
pub struct SweepWorker {
    service: Arc<TrackingService>,
    period: Duration,
    shutdown: watch::Receiver<bool>,
}

impl SweepWorker {
    /// Creates a worker sweeping every `period`.
    #[must_use]
    pub fn new(
        service: Arc<TrackingService>,
        period: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            service,
            period,
            shutdown,
        }
    }

    /// Runs the reconciliation loop until shutdown is signalled.
    ///
    /// The first tick fires immediately, so earnings are reconciled once at
    /// startup rather than a full period later.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_secs = self.period.as_secs(), "reconciliation loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let stats = self.sweep().await;
                    tracing::info!(
                        scanned = stats.scanned,
                        updated = stats.updated,
                        no_rate = stats.no_rate,
                        failed = stats.failed,
                        "reconciliation sweep finished"
                    );
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("reconciliation loop stopped");
    }

    /// Performs one full pass over all bounty-flagged posts.
    pub async fn sweep(&self) -> SweepStats {
        let posts = self.service.store().list_bounty_posts().await;
        let mut stats = SweepStats {
            scanned: posts.len(),
            ..SweepStats::default()
        };

        for post in posts {
            let key = crate::domain::PostKey::new(post.platform, &post.url);
            match self.service.recompute_post(&key).await {
                Ok(RecomputeOutcome::Updated { amount }) => {
                    stats.updated += 1;
                    tracing::debug!(post = %key, %amount, "earnings reconciled");
                }
                Ok(RecomputeOutcome::Unchanged) => {}
                Ok(RecomputeOutcome::NoRate) => {
                    stats.no_rate += 1;
                    tracing::debug!(post = %key, "no rate applies, skipping");
                }
                Err(err) => {
                    stats.failed += 1;
                    tracing::warn!(%err, post = %key, "recompute failed, continuing sweep");
                }
            }
        }
        stats
    }
}
