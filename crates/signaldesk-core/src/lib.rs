//! Domain model and configuration for signaldesk.
//!
//! Holds the validated analysis types (closed signal-type enum, range-checked
//! numeric wrappers), the schema validator that is the only way to construct
//! them from a model response, and env-driven application configuration.

pub mod app_config;
pub mod config;
pub mod types;
pub mod validate;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{CompanyAnalysis, Confidence, OpportunityScore, Signal, SignalType};
pub use validate::{validate_company_analysis, SchemaValidationError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
