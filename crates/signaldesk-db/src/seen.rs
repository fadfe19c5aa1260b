//! Deduplication ledger.
//!
//! A source URL is reduced to its SHA-256 hex digest before any lookup or
//! insert; raw URLs are never compared. Matching is exact — two URLs that
//! differ by one character are distinct entries. Once written, a
//! `(user_id, url_hash)` pair suppresses that URL for that user forever.

use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::DbError;

/// Lowercase hex SHA-256 of a source URL. Stable across runs.
#[must_use]
pub fn hash_url(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

/// Whether this user has already been shown this URL.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn has_seen(pool: &PgPool, user_id: &str, url: &str) -> Result<bool, DbError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM seen_signals WHERE user_id = $1 AND url_hash = $2)",
    )
    .bind(user_id)
    .bind(hash_url(url))
    .fetch_one(pool)
    .await?)
}

/// Records a URL as seen for this user. Idempotent: marking an already-seen
/// pair succeeds silently and leaves the original row untouched, so retried
/// or concurrent scans never abort on a duplicate-key conflict.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn mark_seen(
    pool: &PgPool,
    user_id: &str,
    url: &str,
    entity: &str,
    title: &str,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO seen_signals (user_id, url_hash, entity, title) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (user_id, url_hash) DO NOTHING",
    )
    .bind(user_id)
    .bind(hash_url(url))
    .bind(entity)
    .bind(title)
    .execute(pool)
    .await?;
    Ok(())
}
