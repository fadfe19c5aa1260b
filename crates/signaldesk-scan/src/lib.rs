//! The scan pipeline.
//!
//! For each company on a user's roster: build a prompt, ask the model for a
//! structured analysis, validate it, drop signals whose source URL the user
//! has already been shown, and persist the survivors as scored digest rows.
//! One company's failure never aborts the batch; only storage failures do.

pub mod error;
pub mod lease;
pub mod prompt;
mod scan;

pub use error::ScanError;
pub use lease::{LeaseInfo, ScanLease, ScanLeaseGuard};
pub use prompt::{build_scan_prompt, PROMPT_VERSION};
pub use scan::{ScanResult, Scanner, NO_CLIENTS_ERROR};
