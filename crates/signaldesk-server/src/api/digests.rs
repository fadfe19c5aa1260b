use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::{RequestId, UserId};

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct DigestItem {
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

#[derive(Debug, Deserialize)]
pub(super) struct DigestsQuery {
    pub date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl From<signaldesk_db::DigestRow> for DigestItem {
    fn from(row: signaldesk_db::DigestRow) -> Self {
        Self {
            id: row.id,
            public_id: row.public_id,
            date: row.date,
            entity: row.entity,
            signal_type: row.signal_type,
            summary: row.summary,
            score: row.score,
            url: row.url,
            outreach_snippet: row.outreach_snippet,
            content_hook: row.content_hook,
            created_at: row.created_at,
        }
    }
}

/// With `?date=`, that day's rows ordered by score descending; without,
/// the newest rows by creation time.
pub(super) async fn list_digests(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Query(query): Query<DigestsQuery>,
) -> Result<Json<ApiResponse<Vec<DigestItem>>>, ApiError> {
    let rows = signaldesk_db::list_digests(
        &state.pool,
        &user.0,
        query.date,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(DigestItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Rows for the user's most recent scan date; empty when no scan has
/// produced anything yet.
pub(super) async fn latest_digests(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
) -> Result<Json<ApiResponse<Vec<DigestItem>>>, ApiError> {
    let latest = signaldesk_db::latest_digest_date(&state.pool, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let rows = match latest {
        Some(date) => signaldesk_db::list_digests(&state.pool, &user.0, Some(date), 200)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?,
        None => Vec::new(),
    };

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(DigestItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
