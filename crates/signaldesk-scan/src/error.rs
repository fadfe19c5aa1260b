use thiserror::Error;

use signaldesk_ai::AiError;
use signaldesk_core::SchemaValidationError;
use signaldesk_db::DbError;

/// Failures that abort a scan invocation outright.
///
/// Per-company model and validation failures are NOT here: those are caught
/// at the company boundary and reported as strings in the scan result.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Another scan is already executing in this process.
    #[error("scan already running")]
    AlreadyRunning,

    /// Storage failed. The ledger and digest store are idempotent/append-only
    /// by construction, so an error here is an infrastructure problem and
    /// fatal to the whole invocation.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Failures scoped to one company's analysis.
#[derive(Debug, Error)]
pub(crate) enum CompanyError {
    #[error(transparent)]
    Model(AiError),

    #[error(transparent)]
    Schema(SchemaValidationError),

    /// Re-raised as [`ScanError::Db`] by the batch loop.
    #[error(transparent)]
    Db(#[from] DbError),
}
