//! Validated analysis types.
//!
//! A [`CompanyAnalysis`] can only be built through
//! [`crate::validate::validate_company_analysis`], so holding one means every
//! nested value already satisfies its bounds: `SignalType` is a closed enum,
//! [`Confidence`] lies in `[0, 1]`, and [`OpportunityScore`] lies in `[1, 10]`.

use serde::{Deserialize, Serialize};

/// Closed set of sales-event categories a signal can claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Funding,
    Hiring,
    ProductLaunch,
    Expansion,
    Partnership,
}

impl SignalType {
    /// Wire name, exactly as the model is instructed to emit it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::Funding => "FUNDING",
            SignalType::Hiring => "HIRING",
            SignalType::ProductLaunch => "PRODUCT_LAUNCH",
            SignalType::Expansion => "EXPANSION",
            SignalType::Partnership => "PARTNERSHIP",
        }
    }

    /// Parses the wire name. Anything outside the closed set returns `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FUNDING" => Some(SignalType::Funding),
            "HIRING" => Some(SignalType::Hiring),
            "PRODUCT_LAUNCH" => Some(SignalType::ProductLaunch),
            "EXPANSION" => Some(SignalType::Expansion),
            "PARTNERSHIP" => Some(SignalType::Partnership),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-signal confidence in `[0, 1]`. Out-of-range (or non-finite) values are
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence(f64);

impl Confidence {
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Company-level outreach potential in `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpportunityScore(f64);

impl OpportunityScore {
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (1.0..=10.0).contains(&value).then_some(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Composite score persisted per signal: the company-level opportunity
    /// score weighted by that signal's confidence. Multiplicative, so the
    /// result is bounded to `[0, 10]`; a zero confidence zeroes the score
    /// outright. This asymmetry mirrors the product definition and must not
    /// be smoothed over.
    #[must_use]
    pub fn weighted_by(self, confidence: Confidence) -> f64 {
        self.0 * confidence.0
    }
}

/// One claimed sales event within a [`CompanyAnalysis`].
#[derive(Debug, Clone)]
pub struct Signal {
    pub signal_type: SignalType,
    pub description: String,
    pub confidence: Confidence,
    /// Dedup key. Guaranteed non-empty; compared only via its SHA-256 hash.
    pub source_url: String,
    pub title: String,
}

/// The model's full per-company output for one scan invocation.
///
/// Transient: projected into digest rows, never persisted as a whole.
#[derive(Debug, Clone)]
pub struct CompanyAnalysis {
    /// Echoes the queried company name.
    pub company_name: String,
    pub signals: Vec<Signal>,
    pub opportunity_score: OpportunityScore,
    /// Shared by every signal of this company.
    pub outreach_hook: String,
    /// Shared by every signal of this company.
    pub content_hook: String,
    pub keywords_matched: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_type_round_trips_through_wire_names() {
        for t in [
            SignalType::Funding,
            SignalType::Hiring,
            SignalType::ProductLaunch,
            SignalType::Expansion,
            SignalType::Partnership,
        ] {
            assert_eq!(SignalType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn signal_type_rejects_unknown_and_lowercase_names() {
        assert_eq!(SignalType::parse("ACQUISITION"), None);
        assert_eq!(SignalType::parse("funding"), None);
        assert_eq!(SignalType::parse(""), None);
    }

    #[test]
    fn signal_type_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&SignalType::ProductLaunch).expect("serialize");
        assert_eq!(json, "\"PRODUCT_LAUNCH\"");
    }

    #[test]
    fn confidence_accepts_bounds_and_rejects_outside() {
        assert!(Confidence::new(0.0).is_some());
        assert!(Confidence::new(1.0).is_some());
        assert!(Confidence::new(-0.01).is_none());
        assert!(Confidence::new(1.01).is_none());
        assert!(Confidence::new(f64::NAN).is_none());
    }

    #[test]
    fn opportunity_score_accepts_bounds_and_rejects_outside() {
        assert!(OpportunityScore::new(1.0).is_some());
        assert!(OpportunityScore::new(10.0).is_some());
        assert!(OpportunityScore::new(0.99).is_none());
        assert!(OpportunityScore::new(10.5).is_none());
        assert!(OpportunityScore::new(f64::INFINITY).is_none());
    }

    #[test]
    fn weighted_score_is_the_product_and_stays_in_range() {
        let score = OpportunityScore::new(8.0).expect("valid score");
        let confidence = Confidence::new(0.75).expect("valid confidence");
        let weighted = score.weighted_by(confidence);
        assert!((weighted - 6.0).abs() < f64::EPSILON);
        assert!((0.0..=10.0).contains(&weighted));
    }

    #[test]
    fn zero_confidence_zeroes_the_weighted_score() {
        let score = OpportunityScore::new(10.0).expect("valid score");
        let confidence = Confidence::new(0.0).expect("valid confidence");
        assert!(score.weighted_by(confidence).abs() < f64::EPSILON);
    }
}
