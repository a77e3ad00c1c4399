//! Search response model and validation
//!
//! The backend returns per-sheet keyword matches as JSON. Validation here is
//! deliberately shallow: the two structural checks in `validate_response` are the
//! whole policy, and downstream code treats any missing per-sheet field as empty.
//! This keeps the narrowness of the check visible in one place instead of spread
//! through rendering code.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Matched rows for a single sheet
///
/// `columns` and `data` both default to empty so a sheet entry with either field
/// missing still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetResult {
    /// Column names, in workbook order
    #[serde(default)]
    pub columns: Vec<String>,

    /// Matched rows, in the order the backend returned them.
    /// Row order is preserved end-to-end (display and CSV export).
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

/// Match counts reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Total keyword matches across all sheets.
    ///
    /// The backend counts matches before applying its per-sheet/total row caps,
    /// so this can exceed the number of rows actually returned.
    #[serde(default)]
    pub total_matches: u64,

    /// Per-sheet match counts. Sheets with zero matches may appear with a
    /// count of 0; sheets absent from `results_by_sheet` had no returned rows.
    #[serde(default)]
    pub sheet_counts: IndexMap<String, u64>,
}

/// A validated backend search response
///
/// Constructed only by [`validate_response`] and immutable afterwards. The sheet
/// map keeps backend insertion order because the combined CSV export derives its
/// header from the first non-empty sheet encountered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "keyword_results")]
    pub results_by_sheet: IndexMap<String, SheetResult>,

    #[serde(default, rename = "keyword_summary")]
    pub summary: SearchSummary,
}

impl SearchResponse {
    /// A response with no sheets and zero counts
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of sheets that contributed at least one returned row
    pub fn matched_sheet_count(&self) -> usize {
        self.results_by_sheet
            .values()
            .filter(|sheet| !sheet.data.is_empty())
            .count()
    }
}

/// Reasons a backend payload fails shape validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing or non-object `keyword_results` field")]
    ResultsNotObject,

    #[error("missing or non-object `keyword_summary` field")]
    SummaryNotObject,

    #[error("`keyword_summary.total_matches` must be a number")]
    TotalMatchesNotNumber,

    #[error("response decode failed: {0}")]
    Decode(String),
}

/// Validate an untrusted decoded JSON payload into a [`SearchResponse`]
///
/// Exactly two structural checks are performed (shallow by policy):
/// 1. `keyword_results` is present and is a JSON object
/// 2. `keyword_summary` is present, is a JSON object, and its `total_matches`
///    is a JSON number. A numeric string like `"5"` is rejected, not coerced
///
/// On rejection the caller must not adopt any part of the payload; the session
/// replaces its state with a failure rather than merging partial data.
pub fn validate_response(value: Value) -> Result<SearchResponse, ValidationError> {
    if !value
        .get("keyword_results")
        .is_some_and(Value::is_object)
    {
        return Err(ValidationError::ResultsNotObject);
    }

    let summary = value
        .get("keyword_summary")
        .filter(|v| v.is_object())
        .ok_or(ValidationError::SummaryNotObject)?;

    if !summary.get("total_matches").is_some_and(Value::is_number) {
        return Err(ValidationError::TotalMatchesNotNumber);
    }

    serde_json::from_value(value).map_err(|e| ValidationError::Decode(e.to_string()))
}

/// Render a cell value as plain text
///
/// Null becomes the empty string, strings pass through unquoted, numbers and
/// booleans use their display form. Shared by the highlighter and the exporter
/// so both agree on what a cell "says".
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod response_tests;
