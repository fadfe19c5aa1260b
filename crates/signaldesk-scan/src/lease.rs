//! Process-wide scan admission control.
//!
//! At most one scan runs per process, regardless of user — which also
//! guarantees no two scans for the same user ever overlap, keeping the
//! ledger's check-then-mark sequence effectively atomic. The lease records
//! who is scanning and since when, and is released on every exit path by the
//! guard's `Drop`.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

/// Who holds the scan lease, and since when.
#[derive(Debug, Clone)]
pub struct LeaseInfo {
    pub user_id: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ScanLease {
    holder: Mutex<Option<LeaseInfo>>,
}

impl ScanLease {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically takes the lease for `user_id`. Returns `None` if any scan
    /// is already running — the caller answers with a conflict, it does not
    /// queue.
    #[must_use]
    pub fn try_acquire(&self, user_id: &str) -> Option<ScanLeaseGuard<'_>> {
        let mut holder = self.lock();
        if holder.is_some() {
            return None;
        }
        *holder = Some(LeaseInfo {
            user_id: user_id.to_owned(),
            started_at: Utc::now(),
        });
        Some(ScanLeaseGuard { lease: self })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    /// The active lease, if any.
    #[must_use]
    pub fn current(&self) -> Option<LeaseInfo> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<LeaseInfo>> {
        // A poisoned lock only means a holder panicked mid-scan; the Option
        // state is still coherent, so keep going.
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the lease when dropped.
#[must_use = "dropping the guard releases the lease"]
pub struct ScanLeaseGuard<'a> {
    lease: &'a ScanLease,
}

impl Drop for ScanLeaseGuard<'_> {
    fn drop(&mut self) {
        self.lease.lock().take();
    }
}
