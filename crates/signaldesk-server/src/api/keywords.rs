use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{RequestId, UserId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct KeywordItem {
    pub id: i64,
    pub keyword: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateKeywordBody {
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    pub deleted: bool,
}

impl From<signaldesk_db::KeywordRow> for KeywordItem {
    fn from(row: signaldesk_db::KeywordRow) -> Self {
        Self {
            id: row.id,
            keyword: row.keyword,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_keywords(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
) -> Result<Json<ApiResponse<Vec<KeywordItem>>>, ApiError> {
    let rows = signaldesk_db::list_keywords(&state.pool, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(KeywordItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_keyword(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Json(body): Json<CreateKeywordBody>,
) -> Result<Json<ApiResponse<KeywordItem>>, ApiError> {
    let Some(keyword) = body
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    else {
        return Err(ApiError::new(req_id.0, "validation_error", "keyword required"));
    };

    let row = signaldesk_db::create_keyword(&state.pool, &user.0, keyword)
        .await
        .map_err(|e| match e {
            signaldesk_db::DbError::Conflict => {
                ApiError::new(req_id.0.clone(), "conflict", "Keyword already exists")
            }
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: KeywordItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_keyword(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = signaldesk_db::delete_keyword(&state.pool, &user.0, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: DeletedData { deleted },
        meta: ResponseMeta::new(req_id.0),
    }))
}
