use serde::{Deserialize, Serialize};

use super::status::TestStatus;

/// Project label used when the runner does not report one.
pub const DEFAULT_PROJECT: &str = "default";

/// Canonical record of one finished test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub id: String,
    pub title: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub location: String,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// Free-form note attached to a test by the runner (`skip` reasons, issue links...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TestRecord {
    /// The error message, but only when the test actually failed.
    pub fn displayed_error(&self) -> Option<&str> {
        if self.status.is_failed() {
            self.error.as_deref()
        } else {
            None
        }
    }

    /// Case-insensitive match of an already lower-cased needle against
    /// title, location and project name.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || [&self.title, &self.location, &self.project_name]
                .iter()
                .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

/// Derive the addressing id of a test from its suite and title.
///
/// `"Simple Suite" / "should pass"` becomes `"simple-suite-should-pass"`.
pub fn record_id(suite_title: &str, title: &str) -> String {
    let joined = format!("{}-{}", suite_title, title);
    let mut id = String::with_capacity(joined.len());
    let mut in_whitespace = false;
    for c in joined.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('-');
            }
            in_whitespace = true;
        } else {
            id.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    id
}

/// Round a runner-reported duration to whole, non-negative milliseconds.
pub fn normalize_duration(raw_ms: f64) -> u64 {
    if raw_ms.is_finite() && raw_ms > 0.0 {
        raw_ms.round() as u64
    } else {
        0
    }
}
