use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{RequestId, UserId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ClientItem {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateClientBody {
    pub name: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    pub deleted: bool,
}

impl From<signaldesk_db::ClientRow> for ClientItem {
    fn from(row: signaldesk_db::ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            domain: row.domain,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_clients(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
) -> Result<Json<ApiResponse<Vec<ClientItem>>>, ApiError> {
    let rows = signaldesk_db::list_clients(&state.pool, &user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ClientItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_client(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Json(body): Json<CreateClientBody>,
) -> Result<Json<ApiResponse<ClientItem>>, ApiError> {
    let Some(name) = body.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return Err(ApiError::new(req_id.0, "validation_error", "name required"));
    };

    let row = signaldesk_db::create_client(&state.pool, &user.0, name, body.domain.as_deref())
        .await
        .map_err(|e| match e {
            signaldesk_db::DbError::Conflict => {
                ApiError::new(req_id.0.clone(), "conflict", "Client already exists")
            }
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: ClientItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_client(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = signaldesk_db::delete_client(&state.pool, &user.0, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: DeletedData { deleted },
        meta: ResponseMeta::new(req_id.0),
    }))
}
