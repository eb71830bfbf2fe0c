//! Turning extractor output into income mappings.
//!
//! Two paths exist. The preferred one parses the JSON object a language model
//! returns for a document, strictly, against a fixed schema. When the model
//! response holds no usable JSON, [`extract_with_patterns`] scans the raw
//! document text for well-known salary and deduction labels instead.
//!
//! Model output is only ever parsed as data.

use std::sync::LazyLock;

use itr_core::{AmountMap, IncomeInputs};
use regex::Regex;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

static SALARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(basic|hra|allowance|bonus|special allowance)[^\d]*(\d[\d,]+)")
        .expect("salary pattern is valid")
});

static DEDUCTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(section\s*80[cdefg]|ppf|lic|elss|nps|medical insurance)[^\d]*(\d[\d,]+)")
        .expect("deduction pattern is valid")
});

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model response")]
    NoJsonObject,

    #[error("model response does not match the extraction schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("no valid documents were processed")]
    NoDocuments,

    /// An upload carried neither document text nor an extractor response.
    #[error("'{0}' has neither text nor extractor output")]
    NothingToExtract(String),
}

/// Tax-relevant fields pulled out of a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, deserialize_with = "deserialize_amounts")]
    pub salary_components: AmountMap,

    #[serde(default, deserialize_with = "deserialize_amounts")]
    pub other_income: AmountMap,

    #[serde(default, deserialize_with = "deserialize_amounts")]
    pub deductions: AmountMap,

    /// Free-text description of the document.
    #[serde(default)]
    pub summary: String,
}

impl ExtractedFields {
    pub fn into_inputs(self) -> IncomeInputs {
        IncomeInputs::new(self.salary_components, self.other_income, self.deductions)
    }
}

/// Accepted shapes for an amount in model output.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

fn deserialize_amounts<'de, D>(deserializer: D) -> Result<AmountMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<std::collections::BTreeMap<String, RawAmount>> =
        Option::deserialize(deserializer)?;

    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                RawAmount::Number(n) => n.to_string(),
                RawAmount::Text(s) => s,
            };
            let amount = parse_amount(&text).ok_or_else(|| {
                de::Error::custom(format!("invalid amount '{text}' for '{key}'"))
            })?;
            Ok((key, amount))
        })
        .collect()
}

/// Parses a rupee amount such as `150000`, `1,50,000`, `₹ 50,000.00` or
/// `Rs. 1200`. Negative and non-numeric values yield `None`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_data::extraction::parse_amount;
///
/// assert_eq!(parse_amount("1,50,000"), Some(dec!(150000)));
/// assert_eq!(parse_amount("₹ 2,500.50"), Some(dec!(2500.50)));
/// assert_eq!(parse_amount("-100"), None);
/// assert_eq!(parse_amount("n/a"), None);
/// ```
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix('₹')
        .or_else(|| trimmed.strip_prefix("Rs."))
        .or_else(|| trimmed.strip_prefix("Rs"))
        .or_else(|| trimmed.strip_prefix("INR"))
        .unwrap_or(trimmed);
    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let amount = cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    (amount >= Decimal::ZERO).then_some(amount)
}

/// Returns the outermost `{...}` span, ignoring markdown fences or reasoning
/// text around it.
fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    (end > start).then(|| &s[start..=end])
}

/// Parses a model response into [`ExtractedFields`].
///
/// # Errors
///
/// * [`ExtractionError::NoJsonObject`] when the response holds no braces.
/// * [`ExtractionError::Schema`] for malformed JSON, wrong field types or
///   unparseable/negative amounts.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_data::extraction::parse_model_response;
///
/// let response = r#"Here is what I found:
/// {"salary_components": {"basic": 800000, "hra": "4,00,000"},
///  "deductions": {"80c": 150000},
///  "summary": "Form 16 for FY 2024-25"}"#;
///
/// let fields = parse_model_response(response).unwrap();
/// assert_eq!(fields.salary_components["hra"], dec!(400000));
/// assert!(fields.other_income.is_empty());
/// ```
pub fn parse_model_response(response: &str) -> Result<ExtractedFields, ExtractionError> {
    let json = extract_json_object(response).ok_or(ExtractionError::NoJsonObject)?;
    let fields: ExtractedFields = serde_json::from_str(json)?;
    debug!(
        salary_components = fields.salary_components.len(),
        other_income = fields.other_income.len(),
        deductions = fields.deductions.len(),
        "parsed model response"
    );
    Ok(fields)
}

/// Regex fallback over the raw document text.
///
/// Labels are matched case-insensitively and stored lower-cased; when a label
/// appears twice the later amount wins. `summary` is carried through as-is
/// (typically the unparseable model response).
pub fn extract_with_patterns(
    content: &str,
    summary: &str,
) -> ExtractedFields {
    let lowered = content.to_lowercase();

    ExtractedFields {
        salary_components: collect_matches(&SALARY_PATTERN, &lowered),
        other_income: AmountMap::new(),
        deductions: collect_matches(&DEDUCTION_PATTERN, &lowered),
        summary: summary.to_string(),
    }
}

fn collect_matches(
    pattern: &Regex,
    text: &str,
) -> AmountMap {
    let mut found = AmountMap::new();
    for captures in pattern.captures_iter(text) {
        let label = &captures[1];
        match parse_amount(&captures[2]) {
            Some(amount) => {
                found.insert(label.to_string(), amount);
            }
            None => warn!(label, raw = &captures[2], "skipping unparseable amount"),
        }
    }
    found
}

/// Parses the model response, falling back to pattern matching over
/// `content` when the response is unusable.
pub fn extract_fields(
    content: &str,
    model_response: &str,
) -> ExtractedFields {
    match parse_model_response(model_response) {
        Ok(fields) => fields,
        Err(error) => {
            warn!(%error, "model response unusable; falling back to pattern extraction");
            extract_with_patterns(content, model_response)
        }
    }
}
