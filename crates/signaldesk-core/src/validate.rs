//! Strict schema validation for model-produced company analyses.
//!
//! The decoded JSON payload is walked field by field, in a fixed order, and
//! the first structural violation rejects the whole payload. No partially
//! valid [`CompanyAnalysis`] is ever constructed.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{CompanyAnalysis, Confidence, OpportunityScore, Signal, SignalType};

/// A payload failed validation. `path` points at the offending field
/// (`signals[2].confidence`), `reason` says what was wrong with it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid analysis at {path}: {reason}")]
pub struct SchemaValidationError {
    pub path: String,
    pub reason: String,
}

impl SchemaValidationError {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Validates a decoded model response into a [`CompanyAnalysis`].
///
/// Field order follows the contract: `company_name`, `signals` (each entry in
/// sequence), `opportunity_score`, `outreach_hook`, `content_hook`,
/// `keywords_matched`.
///
/// # Errors
///
/// Returns [`SchemaValidationError`] on the first missing, mistyped, or
/// out-of-range field.
pub fn validate_company_analysis(
    payload: &Value,
) -> Result<CompanyAnalysis, SchemaValidationError> {
    let root = payload
        .as_object()
        .ok_or_else(|| SchemaValidationError::new("$", "expected a JSON object"))?;

    let company_name = require_string(root, "company_name")?;
    if company_name.is_empty() {
        return Err(SchemaValidationError::new(
            "company_name",
            "must be a non-empty string",
        ));
    }

    let raw_signals = require_array(root, "signals")?;
    let mut signals = Vec::with_capacity(raw_signals.len());
    for (i, entry) in raw_signals.iter().enumerate() {
        signals.push(validate_signal(entry, i)?);
    }

    let opportunity_score = OpportunityScore::new(require_number(root, "opportunity_score")?)
        .ok_or_else(|| {
            SchemaValidationError::new("opportunity_score", "must be a number within [1, 10]")
        })?;

    let outreach_hook = require_string(root, "outreach_hook")?.to_owned();
    let content_hook = require_string(root, "content_hook")?.to_owned();
    let keywords_matched = require_string_array(root, "keywords_matched")?;

    Ok(CompanyAnalysis {
        company_name: company_name.to_owned(),
        signals,
        opportunity_score,
        outreach_hook,
        content_hook,
        keywords_matched,
    })
}

fn validate_signal(entry: &Value, index: usize) -> Result<Signal, SchemaValidationError> {
    let path = |field: &str| format!("signals[{index}].{field}");

    let obj = entry.as_object().ok_or_else(|| {
        SchemaValidationError::new(format!("signals[{index}]"), "expected a JSON object")
    })?;

    let type_name = require_string_at(obj, "type", &path("type"))?;
    let signal_type = SignalType::parse(type_name).ok_or_else(|| {
        SchemaValidationError::new(path("type"), format!("unknown signal type '{type_name}'"))
    })?;

    let description = require_string_at(obj, "description", &path("description"))?.to_owned();

    let confidence = Confidence::new(require_number_at(obj, "confidence", &path("confidence"))?)
        .ok_or_else(|| {
            SchemaValidationError::new(path("confidence"), "must be a number within [0, 1]")
        })?;

    let source_url = require_string_at(obj, "source_url", &path("source_url"))?;
    if source_url.is_empty() {
        return Err(SchemaValidationError::new(
            path("source_url"),
            "must be a non-empty string",
        ));
    }

    let title = require_string_at(obj, "title", &path("title"))?.to_owned();

    Ok(Signal {
        signal_type,
        description,
        confidence,
        source_url: source_url.to_owned(),
        title,
    })
}

fn require<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, SchemaValidationError> {
    obj.get(key)
        .ok_or_else(|| SchemaValidationError::new(path, "missing required field"))
}

fn require_string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, SchemaValidationError> {
    require_string_at(obj, key, key)
}

fn require_string_at<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a str, SchemaValidationError> {
    require(obj, key, path)?
        .as_str()
        .ok_or_else(|| SchemaValidationError::new(path, "expected a string"))
}

fn require_number(obj: &Map<String, Value>, key: &str) -> Result<f64, SchemaValidationError> {
    require_number_at(obj, key, key)
}

fn require_number_at(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<f64, SchemaValidationError> {
    require(obj, key, path)?
        .as_f64()
        .ok_or_else(|| SchemaValidationError::new(path, "expected a number"))
}

fn require_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a [Value], SchemaValidationError> {
    require(obj, key, key)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| SchemaValidationError::new(key, "expected an array"))
}

fn require_string_array(
    obj: &Map<String, Value>,
    key: &str,
) -> Result<Vec<String>, SchemaValidationError> {
    let values = require_array(obj, key)?;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str().map(ToOwned::to_owned).ok_or_else(|| {
                SchemaValidationError::new(format!("{key}[{i}]"), "expected a string")
            })
        })
        .collect()
}
