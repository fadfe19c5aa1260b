//! Roster storage: the clients a user tracks and the trend keywords they
//! watch. The scan reads these; only the REST layer mutates them.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KeywordRow {
    pub id: i64,
    pub keyword: String,
    pub created_at: DateTime<Utc>,
}

/// Lists a user's tracked clients, newest first. This listing order is also
/// the roster order the scan walks.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_clients(pool: &PgPool, user_id: &str) -> Result<Vec<ClientRow>, DbError> {
    Ok(sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, domain, created_at FROM clients \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Lists a user's trend keywords, newest first.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_keywords(pool: &PgPool, user_id: &str) -> Result<Vec<KeywordRow>, DbError> {
    Ok(sqlx::query_as::<_, KeywordRow>(
        "SELECT id, keyword, created_at FROM trend_keywords \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Inserts a client for a user.
///
/// # Errors
///
/// Returns [`DbError::Conflict`] if the user already tracks a client with
/// this name, or `DbError` on any other database failure.
pub async fn create_client(
    pool: &PgPool,
    user_id: &str,
    name: &str,
    domain: Option<&str>,
) -> Result<ClientRow, DbError> {
    sqlx::query_as::<_, ClientRow>(
        "INSERT INTO clients (user_id, name, domain) VALUES ($1, $2, $3) \
         RETURNING id, name, domain, created_at",
    )
    .bind(user_id)
    .bind(name)
    .bind(domain)
    .fetch_one(pool)
    .await
    .map_err(DbError::from_insert)
}

/// Deletes a client by id, scoped to the owning user. Returns whether a row
/// was removed.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn delete_client(pool: &PgPool, user_id: &str, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Inserts a trend keyword for a user.
///
/// # Errors
///
/// Returns [`DbError::Conflict`] if the user already watches this keyword,
/// or `DbError` on any other database failure.
pub async fn create_keyword(
    pool: &PgPool,
    user_id: &str,
    keyword: &str,
) -> Result<KeywordRow, DbError> {
    sqlx::query_as::<_, KeywordRow>(
        "INSERT INTO trend_keywords (user_id, keyword) VALUES ($1, $2) \
         RETURNING id, keyword, created_at",
    )
    .bind(user_id)
    .bind(keyword)
    .fetch_one(pool)
    .await
    .map_err(DbError::from_insert)
}

/// Deletes a keyword by id, scoped to the owning user. Returns whether a row
/// was removed.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn delete_keyword(pool: &PgPool, user_id: &str, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM trend_keywords WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Every user with at least one tracked client. The scheduler walks this to
/// drive the periodic scan.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_scan_users(pool: &PgPool) -> Result<Vec<String>, DbError> {
    Ok(sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT user_id FROM clients ORDER BY user_id",
    )
    .fetch_all(pool)
    .await?)
}
