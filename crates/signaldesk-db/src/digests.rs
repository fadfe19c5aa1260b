//! Digest feed: one immutable row per surviving signal.
//!
//! The store assigns id, public id, and creation timestamp; everything else
//! arrives in the draft. No dedup happens here — the scan guarantees only
//! post-dedup signals reach `append_digest`.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DigestRow {
    pub id: i64,
    pub public_id: Uuid,
    pub date: NaiveDate,
    pub entity: String,
    pub signal_type: String,
    pub summary: String,
    pub score: f64,
    pub url: String,
    pub outreach_snippet: String,
    pub content_hook: String,
    pub created_at: DateTime<Utc>,
}

/// Draft for one digest row; the store assigns id/public_id/created_at.
#[derive(Debug)]
pub struct NewDigestEntry<'a> {
    pub user_id: &'a str,
    pub date: NaiveDate,
    pub entity: &'a str,
    pub signal_type: &'a str,
    pub summary: &'a str,
    pub score: f64,
    pub url: &'a str,
    pub outreach_snippet: &'a str,
    pub content_hook: &'a str,
}

/// Appends one digest row and returns its id. Multiple rows for the same
/// entity and date within one scan are expected — one per surviving signal.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn append_digest(pool: &PgPool, entry: &NewDigestEntry<'_>) -> Result<i64, DbError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "INSERT INTO digests \
           (user_id, date, entity, signal_type, summary, score, url, outreach_snippet, content_hook) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id",
    )
    .bind(entry.user_id)
    .bind(entry.date)
    .bind(entry.entity)
    .bind(entry.signal_type)
    .bind(entry.summary)
    .bind(entry.score)
    .bind(entry.url)
    .bind(entry.outreach_snippet)
    .bind(entry.content_hook)
    .fetch_one(pool)
    .await?)
}

/// Lists digest rows for a user. With a date, returns that day's rows ordered
/// by score descending; without one, returns the newest rows by creation
/// time, capped at `limit`.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_digests(
    pool: &PgPool,
    user_id: &str,
    date: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<DigestRow>, DbError> {
    let rows = match date {
        Some(date) => {
            sqlx::query_as::<_, DigestRow>(
                "SELECT id, public_id, date, entity, signal_type, summary, score, url, \
                        outreach_snippet, content_hook, created_at \
                 FROM digests WHERE user_id = $1 AND date = $2 \
                 ORDER BY score DESC, id ASC",
            )
            .bind(user_id)
            .bind(date)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, DigestRow>(
                "SELECT id, public_id, date, entity, signal_type, summary, score, url, \
                        outreach_snippet, content_hook, created_at \
                 FROM digests WHERE user_id = $1 \
                 ORDER BY created_at DESC, id DESC LIMIT $2",
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

/// The most recent scan date with digest rows for this user, if any.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn latest_digest_date(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<NaiveDate>, DbError> {
    Ok(sqlx::query_scalar::<_, NaiveDate>(
        "SELECT date FROM digests WHERE user_id = $1 ORDER BY date DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}
