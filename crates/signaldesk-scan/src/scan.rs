//! Scan orchestration.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;

use signaldesk_ai::ChatClient;
use signaldesk_core::validate_company_analysis;
use signaldesk_db::{self as db, ClientRow, NewDigestEntry};

use crate::error::{CompanyError, ScanError};
use crate::lease::{LeaseInfo, ScanLease};
use crate::prompt::build_scan_prompt;

/// Returned when a user triggers a scan with an empty roster.
pub const NO_CLIENTS_ERROR: &str = "No clients found. Add clients first.";

/// Outcome of one scan invocation. `ok` is false only when the scan could
/// not run at all (empty roster); individual company failures land in
/// `errors` while the batch still counts as a success.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub ok: bool,
    pub digest_count: usize,
    pub errors: Vec<String>,
}

/// Drives the scan pipeline: roster -> prompt -> model -> validation ->
/// dedup -> digest rows. Owns the process-wide [`ScanLease`].
pub struct Scanner {
    pool: PgPool,
    client: ChatClient,
    temperature: f32,
    lease: ScanLease,
}

impl Scanner {
    #[must_use]
    pub fn new(pool: PgPool, client: ChatClient, temperature: f32) -> Self {
        Self {
            pool,
            client,
            temperature,
            lease: ScanLease::new(),
        }
    }

    /// Whether a scan is currently executing in this process.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lease.is_running()
    }

    /// The active scan lease, if any.
    #[must_use]
    pub fn current_lease(&self) -> Option<LeaseInfo> {
        self.lease.current()
    }

    /// Runs a full scan for one user.
    ///
    /// Companies are processed one at a time: the model call and the
    /// validate/dedup/persist steps for one company complete (or fail)
    /// before the next begins, so at most one model request is in flight
    /// and ledger writes for the user never race within a scan.
    ///
    /// # Errors
    ///
    /// - [`ScanError::AlreadyRunning`] if any scan is active in this process;
    ///   the request is rejected, not queued.
    /// - [`ScanError::Db`] if storage fails; partial work up to that point
    ///   (marked URLs, appended rows) remains persisted.
    pub async fn run_scan(&self, user_id: &str) -> Result<ScanResult, ScanError> {
        let _lease = self
            .lease
            .try_acquire(user_id)
            .ok_or(ScanError::AlreadyRunning)?;

        tracing::info!(user = user_id, "scan started");
        let result = self.scan_roster(user_id).await;
        match &result {
            Ok(outcome) => tracing::info!(
                user = user_id,
                digests = outcome.digest_count,
                failed_companies = outcome.errors.len(),
                "scan finished"
            ),
            Err(e) => tracing::error!(user = user_id, error = %e, "scan aborted"),
        }
        result
        // Lease released here by the guard, on success and failure alike.
    }

    async fn scan_roster(&self, user_id: &str) -> Result<ScanResult, ScanError> {
        let clients = db::list_clients(&self.pool, user_id).await?;
        if clients.is_empty() {
            // Fail fast: no model call is made for an empty roster.
            return Ok(ScanResult {
                ok: false,
                digest_count: 0,
                errors: vec![NO_CLIENTS_ERROR.to_string()],
            });
        }

        let keywords: Vec<String> = db::list_keywords(&self.pool, user_id)
            .await?
            .into_iter()
            .map(|k| k.keyword)
            .collect();

        // Every digest row from this invocation shares one calendar day.
        let scan_date = Utc::now().date_naive();

        let mut digest_count = 0usize;
        let mut errors = Vec::new();

        for client in &clients {
            match self
                .analyze_company(user_id, client, &keywords, scan_date)
                .await
            {
                Ok(saved) => digest_count += saved,
                Err(CompanyError::Db(e)) => return Err(ScanError::Db(e)),
                Err(e) => {
                    tracing::warn!(
                        user = user_id,
                        company = %client.name,
                        error = %e,
                        "company analysis failed"
                    );
                    errors.push(format!("Failed to analyze {}: {e}", client.name));
                }
            }
        }

        Ok(ScanResult {
            ok: true,
            digest_count,
            errors,
        })
    }

    /// Analyzes one company and returns the number of digest rows appended.
    ///
    /// Signals are handled in sequence order; for each one the ledger check
    /// happens before the mark, which happens before the digest append. A
    /// URL already seen for this user is skipped entirely — no row, no
    /// re-mark — including a URL first seen earlier in this same analysis.
    async fn analyze_company(
        &self,
        user_id: &str,
        client: &ClientRow,
        keywords: &[String],
        scan_date: NaiveDate,
    ) -> Result<usize, CompanyError> {
        let prompt = build_scan_prompt(&client.name, client.domain.as_deref(), keywords);
        let payload = self
            .client
            .complete_json(&prompt, self.temperature)
            .await
            .map_err(CompanyError::Model)?;
        let analysis = validate_company_analysis(&payload).map_err(CompanyError::Schema)?;

        let mut saved = 0usize;
        for signal in &analysis.signals {
            if db::has_seen(&self.pool, user_id, &signal.source_url).await? {
                tracing::debug!(
                    user = user_id,
                    company = %analysis.company_name,
                    url = %signal.source_url,
                    "signal already seen, skipping"
                );
                continue;
            }

            db::mark_seen(
                &self.pool,
                user_id,
                &signal.source_url,
                &analysis.company_name,
                &signal.title,
            )
            .await?;

            db::append_digest(
                &self.pool,
                &NewDigestEntry {
                    user_id,
                    date: scan_date,
                    entity: &analysis.company_name,
                    signal_type: signal.signal_type.as_str(),
                    summary: &signal.description,
                    score: analysis.opportunity_score.weighted_by(signal.confidence),
                    url: &signal.source_url,
                    // Company-level hooks, shared by every signal of this company.
                    outreach_snippet: &analysis.outreach_hook,
                    content_hook: &analysis.content_hook,
                },
            )
            .await?;

            saved += 1;
        }

        Ok(saved)
    }
}
