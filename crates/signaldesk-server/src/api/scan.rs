use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use signaldesk_scan::{ScanError, ScanResult};

use crate::middleware::{RequestId, UserId};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ScanStatusData {
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

/// Kicks off a scan for the requesting user. Answers 409 while any scan is
/// executing in this process — the request is rejected, never queued.
pub(super) async fn trigger_scan(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<UserId>,
) -> Result<Json<ApiResponse<ScanResult>>, ApiError> {
    match state.scanner.run_scan(&user.0).await {
        Ok(result) => Ok(Json(ApiResponse {
            data: result,
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(ScanError::AlreadyRunning) => Err(ApiError::new(
            req_id.0,
            "conflict",
            "Scan already running",
        )),
        Err(e) => {
            tracing::error!(user = %user.0, error = %e, "scan failed");
            Err(ApiError::new(req_id.0, "internal_error", "Scan failed"))
        }
    }
}

pub(super) async fn scan_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ScanStatusData>> {
    let lease = state.scanner.current_lease();
    Json(ApiResponse {
        data: ScanStatusData {
            running: lease.is_some(),
            user_id: lease.as_ref().map(|l| l.user_id.clone()),
            started_at: lease.map(|l| l.started_at),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
