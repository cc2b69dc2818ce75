use std::path::Path;

use serde::{Deserialize, Serialize};

use super::record::TestRecord;
use super::summary::Summary;
use crate::error::{ReportError, Result};

/// Immutable snapshot of one run handed from the assembler to the renderer.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub summary: Summary,
    pub tests: Vec<TestRecord>,
    pub start_time: i64,
    pub end_time: i64,
    pub duration: i64,
}

impl ReportPayload {
    pub fn new(tests: Vec<TestRecord>, start_time: i64, end_time: i64) -> Self {
        let duration = end_time - start_time;
        if duration < 0 {
            tracing::warn!(start_time, end_time, "run ended before it started; clamping duration to 0");
        }
        Self {
            summary: Summary::from_records(&tests),
            tests,
            start_time,
            end_time,
            duration: duration.max(0),
        }
    }

    /// Load a payload previously written as `data.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ReportError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn find(&self, id: &str) -> Option<&TestRecord> {
        self.tests.iter().find(|t| t.id == id)
    }
}
