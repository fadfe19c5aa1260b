//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring scan job.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use signaldesk_scan::{ScanError, Scanner};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// job cannot be registered (e.g. an invalid cron expression), or the
/// scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    scanner: Arc<Scanner>,
    scan_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_scan_job(&scheduler, pool, scanner, scan_cron).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Registers the periodic scan job (daily at 11:00 UTC by default).
///
/// Each run walks every user with at least one tracked client and scans them
/// one after another. The scan lease still applies: if an HTTP-triggered scan
/// is mid-flight, that user's slot is skipped and picked up on the next tick.
async fn register_scan_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    scanner: Arc<Scanner>,
    scan_cron: &str,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async(scan_cron, move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let scanner = Arc::clone(&scanner);

        Box::pin(async move {
            tracing::info!("scheduler: starting periodic scan run");
            run_scan_job(&pool, &scanner).await;
            tracing::info!("scheduler: periodic scan run complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Drives one scan per user with configured clients.
async fn run_scan_job(pool: &PgPool, scanner: &Scanner) {
    let users = match signaldesk_db::list_scan_users(pool).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to load scan users");
            return;
        }
    };

    if users.is_empty() {
        tracing::info!("scheduler: no users with clients; skipping");
        return;
    }

    tracing::info!(count = users.len(), "scheduler: scanning users");

    for user_id in &users {
        match scanner.run_scan(user_id).await {
            Ok(result) => {
                tracing::info!(
                    user = %user_id,
                    digests = result.digest_count,
                    failed_companies = result.errors.len(),
                    ok = result.ok,
                    "scheduler: scan finished"
                );
            }
            Err(ScanError::AlreadyRunning) => {
                tracing::warn!(user = %user_id, "scheduler: scan already running, skipping user");
            }
            Err(e) => {
                tracing::error!(user = %user_id, error = %e, "scheduler: scan failed");
            }
        }
    }
}
