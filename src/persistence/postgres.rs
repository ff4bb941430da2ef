//! PostgreSQL implementation of the payout ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::PayoutRecord;
use crate::domain::TrackedPost;
use crate::error::GatewayError;

/// PostgreSQL-backed payout ledger using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new ledger with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one payout record per post, atomically per batch.
    ///
    /// Runs inside a transaction: a settlement either records every post
    /// or none, so a partial ledger can never be mistaken for a complete
    /// payout.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_payout_batch(
        &self,
        batch_id: Uuid,
        owner_id: &str,
        posts: &[TrackedPost],
    ) -> Result<usize, GatewayError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        for post in posts {
            sqlx::query(
                "INSERT INTO payout_records \
                 (batch_id, owner_id, platform, post_url, video_id, views, amount_usd) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(batch_id)
            .bind(owner_id)
            .bind(post.platform.as_str())
            .bind(&post.url)
            .bind(&post.video_id)
            .bind(i64::try_from(post.views).unwrap_or(i64::MAX))
            .bind(post.final_earned_usd)
            .execute(&mut *tx)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(posts.len())
    }

    /// Loads all payout records for an owner, newest settlement first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_payouts_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<PayoutRecord>, GatewayError> {
        let rows = sqlx::query_as::<
            _,
            (
                i64,
                Uuid,
                String,
                String,
                String,
                String,
                i64,
                Decimal,
                DateTime<Utc>,
            ),
        >(
            "SELECT id, batch_id, owner_id, platform, post_url, video_id, views, amount_usd, settled_at \
             FROM payout_records WHERE owner_id = $1 ORDER BY settled_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, batch_id, owner_id, platform, post_url, video_id, views, amount_usd, settled_at)| {
                    PayoutRecord {
                        id,
                        batch_id,
                        owner_id,
                        platform,
                        post_url,
                        video_id,
                        views,
                        amount_usd,
                        settled_at,
                    }
                },
            )
            .collect())
    }
}
