use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::models::{ReportPayload, Summary, TestRecord, TestStatus};

use super::format::test_info;

/// Status predicate applied to the test list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TestStatus),
}

impl StatusFilter {
    /// `All` followed by every known status, in the order the UIs cycle them.
    pub fn cycle() -> impl Iterator<Item = StatusFilter> {
        std::iter::once(StatusFilter::All).chain(TestStatus::KNOWN.into_iter().map(StatusFilter::Only))
    }

    pub fn next(&self) -> StatusFilter {
        let all: Vec<_> = Self::cycle().collect();
        let pos = all.iter().position(|f| f == self).unwrap_or(0);
        all[(pos + 1) % all.len()].clone()
    }

    pub fn matches(&self, status: &TestStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    /// `"all"` or any status string; unknown strings filter on that exact status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => StatusFilter::All,
            other => StatusFilter::Only(TestStatus::from(other)),
        })
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// The document produced by "export": the summary plus the currently
/// filtered tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub summary: Summary,
    pub tests: Vec<TestRecord>,
    pub generated_at: String,
    pub export_type: String,
}

impl ExportDocument {
    /// Write the document as pretty JSON, creating `path`'s parent if needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ReportError::Serialize)?;
        std::fs::write(path, json).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// File name offered for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("pakoda-report-{}.json", date.format("%Y-%m-%d"))
}

/// Filter/search state over one report payload.
///
/// The visible list is recomputed whenever the filter or search term
/// changes and always keeps the payload's insertion order.
#[derive(Debug, Clone)]
pub struct ReportView {
    payload: ReportPayload,
    filter: StatusFilter,
    search_term: String,
    visible: Vec<usize>,
}

impl ReportView {
    pub fn new(payload: ReportPayload) -> Self {
        let visible = (0..payload.tests.len()).collect();
        Self {
            payload,
            filter: StatusFilter::All,
            search_term: String::new(),
            visible,
        }
    }

    pub fn payload(&self) -> &ReportPayload {
        &self.payload
    }

    pub fn summary(&self) -> &Summary {
        &self.payload.summary
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.refresh();
    }

    pub fn visible(&self) -> impl Iterator<Item = &TestRecord> {
        self.visible.iter().map(|&i| &self.payload.tests[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_at(&self, index: usize) -> Option<&TestRecord> {
        self.visible.get(index).map(|&i| &self.payload.tests[i])
    }

    /// Whether the empty-state message should be shown instead of a list.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Serialize the filtered view, not the full dataset.
    pub fn export(&self, generated_at: DateTime<Utc>) -> ExportDocument {
        ExportDocument {
            summary: self.payload.summary,
            tests: self.visible().cloned().collect(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            export_type: "json".to_string(),
        }
    }

    /// Clipboard text for the test with `id`, looked up in the full dataset.
    pub fn copy_info(&self, id: &str) -> Option<String> {
        self.payload.find(id).map(test_info)
    }

    fn refresh(&mut self) {
        let needle = self.search_term.to_lowercase();
        self.visible = self
            .payload
            .tests
            .iter()
            .enumerate()
            .filter(|(_, t)| self.filter.matches(&t.status) && t.matches_search(&needle))
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(id: &str, title: &str, status: TestStatus, project: &str) -> TestRecord {
        TestRecord {
            id: id.into(),
            title: title.into(),
            status,
            duration_ms: 100,
            error: None,
            location: format!("tests/{}.spec.ts:1", id),
            project_name: project.into(),
            annotations: Vec::new(),
        }
    }

    fn view() -> ReportView {
        ReportView::new(ReportPayload::new(
            vec![
                record("a", "user login flow", TestStatus::Failed, "chromium"),
                record("b", "login redirect", TestStatus::Passed, "chromium"),
                record("c", "checkout", TestStatus::Failed, "webkit"),
                record("d", "profile", TestStatus::Skipped, "webkit"),
            ],
            0,
            10,
        ))
    }

    fn ids(view: &ReportView) -> Vec<String> {
        view.visible().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn filter_and_search_compose() {
        let mut view = view();
        view.set_filter(StatusFilter::Only(TestStatus::Failed));
        view.set_search("login");
        assert_eq!(ids(&view), ["a"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut view = view();
        view.set_search("WEBKIT");
        assert_eq!(ids(&view), ["c", "d"]);
        view.set_search("tests/b.spec");
        assert_eq!(ids(&view), ["b"]);
        view.set_search("");
        assert_eq!(view.visible_len(), 4);
    }

    #[test]
    fn filtering_preserves_order_and_is_idempotent() {
        let mut view = view();
        view.set_filter(StatusFilter::Only(TestStatus::Failed));
        let once = ids(&view);
        view.set_filter(StatusFilter::Only(TestStatus::Failed));
        assert_eq!(ids(&view), once);
        assert_eq!(once, ["a", "c"]);
    }

    #[test]
    fn export_contains_only_filtered_tests() {
        let mut view = view();
        view.set_filter(StatusFilter::Only(TestStatus::Failed));
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let doc = view.export(at);

        assert!(doc.tests.iter().all(|t| t.status == TestStatus::Failed));
        assert_eq!(doc.tests.len(), 2);
        assert_eq!(doc.summary.total, 4);
        assert_eq!(doc.generated_at, "2025-01-02T03:04:05.000Z");
        assert_eq!(doc.export_type, "json");

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["exportType"], "json");
        assert!(json.get("generatedAt").is_some());
    }

    #[test]
    fn copy_info_ignores_filter_and_misses_quietly() {
        let mut view = view();
        view.set_filter(StatusFilter::Only(TestStatus::Skipped));
        let info = view.copy_info("b").unwrap();
        assert!(info.starts_with("Test: login redirect\nStatus: passed"));
        assert_eq!(view.copy_info("nope"), None);
    }

    #[test]
    fn empty_dataset_shows_empty_state() {
        let mut view = ReportView::new(ReportPayload::new(Vec::new(), 0, 0));
        assert!(view.is_empty());
        view.set_filter(StatusFilter::Only(TestStatus::Failed));
        view.set_search("anything");
        assert!(view.is_empty());
        assert_eq!(view.visible_at(0), None);
    }

    #[test]
    fn filter_cycles_through_all_statuses() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..6 {
            filter = filter.next();
            seen.push(filter.to_string());
        }
        assert_eq!(
            seen,
            ["passed", "failed", "skipped", "timedOut", "interrupted", "all"]
        );
    }

    #[test]
    fn filter_parses_from_cli_strings() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "timedOut".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(TestStatus::TimedOut)
        );
    }

    #[test]
    fn export_writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("out.json");
        let doc = view().export(Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
        doc.write(&path).unwrap();

        let back: ExportDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn export_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(export_file_name(date), "pakoda-report-2025-06-30.json");
    }
}
