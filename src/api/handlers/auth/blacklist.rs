//! Revoked-token store.
//!
//! Logout puts the SHA-256 of the access token here; resolution checks this
//! table before trusting any token. Rows are kept until the token's natural
//! expiry would have rejected it anyway, then pruned by a background task.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::time::Duration;
use tokio::{task::JoinHandle, time::sleep};
use tracing::{error, info, info_span, Instrument};

/// Persistent set of revoked tokens, keyed by token hash.
#[allow(async_fn_in_trait)]
pub trait TokenStore: Send + Sync {
    /// Record a revocation. Revoking an already-revoked token is a no-op.
    async fn revoke(&self, token_hash: &[u8], expires_at_unix: i64) -> Result<()>;

    /// Has this token been revoked?
    async fn is_revoked(&self, token_hash: &[u8]) -> Result<bool>;
}

pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TokenStore for PgTokenStore {
    async fn revoke(&self, token_hash: &[u8], expires_at_unix: i64) -> Result<()> {
        let query = "INSERT INTO token_blacklist (token_hash, expires_at) \
                     VALUES ($1, to_timestamp($2)) \
                     ON CONFLICT (token_hash) DO NOTHING";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(token_hash)
            .bind(expires_at_unix)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to record token revocation")?;
        Ok(())
    }

    async fn is_revoked(&self, token_hash: &[u8]) -> Result<bool> {
        let query = "SELECT 1 FROM token_blacklist WHERE token_hash = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to check token revocation")?;
        Ok(row.is_some())
    }
}

/// Delete revocation rows for tokens already past their natural expiry.
///
/// # Errors
/// Returns an error if the delete fails.
pub async fn prune_expired(pool: &PgPool) -> Result<u64> {
    let query = "DELETE FROM token_blacklist WHERE expires_at <= NOW()";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to prune token blacklist")?;
    Ok(result.rows_affected())
}

/// Spawn the advisory pruning task. Failures are logged and retried on the
/// next tick; the blacklist stays correct without pruning since expired
/// tokens are rejected by the codec first.
pub fn spawn_blacklist_pruner(pool: PgPool, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match prune_expired(&pool).await {
                Ok(0) => {}
                Ok(pruned) => info!(pruned, "pruned expired token revocations"),
                Err(err) => error!("token blacklist prune failed: {err:#}"),
            }
            sleep(interval).await;
        }
    })
}
