//! Scan prompt template.
//!
//! The instructions sent to the model are a soft contract: the model must
//! return JSON matching the shape the validator enforces. The template is
//! kept as versioned configuration data so its wording can evolve (and be
//! audited) independently of the parsing logic. Bump [`PROMPT_VERSION`]
//! whenever the template text changes.

pub const PROMPT_VERSION: &str = "v1";

const SCAN_PROMPT_TEMPLATE: &str = r#"You are a sales intelligence analyst. Analyze the company "{company}"{domain_clause} for recent sales opportunities and signals.

Keywords to watch for: {keywords}

Based on your knowledge, identify any recent or likely sales signals for this company. For each signal, provide:
- The type of signal (FUNDING, HIRING, PRODUCT_LAUNCH, EXPANSION, PARTNERSHIP)
- A detailed description of the signal
- A confidence score (0-1) for how likely this signal is real/current
- A plausible source URL (use the company domain or relevant news sites)
- A short title for the signal

Also provide:
- An overall opportunity score (1-10) for sales outreach potential
- A personalized outreach hook (1-2 sentences a sales rep could use to open a conversation)
- A content hook (a topic or angle for creating relevant content)
- Which keywords matched

Return your analysis as JSON matching this exact structure:
{
  "company_name": "string",
  "signals": [
    {
      "type": "FUNDING|HIRING|PRODUCT_LAUNCH|EXPANSION|PARTNERSHIP",
      "description": "string",
      "confidence": 0.0-1.0,
      "source_url": "string",
      "title": "string"
    }
  ],
  "opportunity_score": 1-10,
  "outreach_hook": "string",
  "content_hook": "string",
  "keywords_matched": ["string"]
}

Be creative but realistic. Generate 2-4 signals per company."#;

/// Renders the scan prompt for one company.
///
/// A company with no keywords configured still gets scanned; the keyword list
/// falls back to requesting "general business signals".
#[must_use]
pub fn build_scan_prompt(company: &str, domain: Option<&str>, keywords: &[String]) -> String {
    let domain_clause = domain
        .map(|d| format!(" (website: {d})"))
        .unwrap_or_default();

    let keyword_list = if keywords.is_empty() {
        "general business signals".to_string()
    } else {
        keywords.join(", ")
    };

    SCAN_PROMPT_TEMPLATE
        .replace("{company}", company)
        .replace("{domain_clause}", &domain_clause)
        .replace("{keywords}", &keyword_list)
}
