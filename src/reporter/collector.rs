use std::collections::HashSet;

use crate::error::Result;
use crate::models::{DEFAULT_PROJECT, ReportPayload, TestRecord, normalize_duration, record_id};

use super::{Reporter, RunInfo, RunOutcome, TestCase, TestOutcome};

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Accumulates normalized records for a single run and assembles the payload.
#[derive(Debug)]
pub struct ResultCollector {
    records: Vec<TestRecord>,
    ids: HashSet<String>,
    start_time: i64,
}

impl Default for ResultCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCollector {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            ids: HashSet::new(),
            start_time: now_millis(),
        }
    }

    /// Begin a new run at `start_time`, dropping anything collected before.
    pub fn start_at(&mut self, start_time: i64) {
        self.start_time = start_time;
        self.records.clear();
        self.ids.clear();
    }

    /// Normalize one runner result and append it. Missing fields get defaults.
    pub fn record(&mut self, test: &TestCase, outcome: &TestOutcome) -> &TestRecord {
        let id = self.unique_id(record_id(&test.suite_title, &test.title));

        let project_name = test
            .project_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PROJECT)
            .to_string();

        let location = format!(
            "{}:{}",
            test.file.as_deref().unwrap_or("unknown"),
            test.line.unwrap_or(0)
        );

        let record = TestRecord {
            id,
            title: test.title.clone(),
            status: outcome.status.clone(),
            duration_ms: normalize_duration(outcome.duration_ms),
            error: outcome.error.clone().filter(|e| !e.is_empty()),
            location,
            project_name,
            annotations: outcome.annotations.clone(),
        };

        tracing::debug!(id = %record.id, status = %record.status, "test completed");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Package everything collected so far, ending the run at `end_time`.
    ///
    /// Pure with respect to the collected state; calling it again simply
    /// recomputes with the new end time.
    pub fn assemble_at(&self, end_time: i64) -> ReportPayload {
        ReportPayload::new(self.records.clone(), self.start_time, end_time)
    }

    pub fn assemble(&self) -> ReportPayload {
        self.assemble_at(now_millis())
    }

    /// Suite and title text can repeat within a run; later duplicates get a
    /// numeric suffix so every record stays addressable.
    fn unique_id(&mut self, base: String) -> String {
        if self.ids.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.ids.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl Reporter for ResultCollector {
    type Output = ReportPayload;

    fn on_run_start(&mut self, info: &RunInfo) {
        self.start_at(info.started_at.unwrap_or_else(now_millis));
    }

    fn on_test_complete(&mut self, test: &TestCase, outcome: &TestOutcome) {
        self.record(test, outcome);
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) -> Result<ReportPayload> {
        Ok(self.assemble_at(outcome.ended_at.unwrap_or_else(now_millis)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{Summary, TestStatus};

    fn case(suite: &str, title: &str) -> TestCase {
        TestCase {
            title: title.into(),
            suite_title: suite.into(),
            file: Some("tests/simple.spec.js".into()),
            line: Some(4),
            project_name: Some("chromium".into()),
        }
    }

    fn outcome(status: &str, duration_ms: f64, error: Option<&str>) -> TestOutcome {
        TestOutcome {
            status: TestStatus::from(status),
            duration_ms,
            error: error.map(str::to_string),
            annotations: Vec::new(),
        }
    }

    #[test]
    fn three_test_run_produces_expected_summary() {
        let mut collector = ResultCollector::new();
        collector.on_run_start(&RunInfo {
            total_tests: Some(3),
            started_at: Some(1000),
        });
        collector.on_test_complete(&case("Suite", "passes"), &outcome("passed", 120.0, None));
        collector.on_test_complete(
            &case("Suite", "fails"),
            &outcome("failed", 450.0, Some("Timeout 30000ms exceeded.")),
        );
        collector.on_test_complete(&case("Suite", "skips"), &outcome("skipped", 0.0, None));

        let payload = collector
            .on_run_end(&RunOutcome {
                status: Some("failed".into()),
                ended_at: Some(2000),
            })
            .unwrap();

        assert_eq!(
            payload.summary,
            Summary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
                timed_out: 0,
                interrupted: 0,
                pass_rate: 33,
            }
        );
        assert_eq!(payload.duration, 1000);
        assert_eq!(payload.tests[1].error.as_deref(), Some("Timeout 30000ms exceeded."));
        let titles: Vec<_> = payload.tests.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["passes", "fails", "skips"]);
    }

    #[test]
    fn zero_completions_assemble_to_empty_payload() {
        let mut collector = ResultCollector::new();
        collector.start_at(5);
        let payload = collector.assemble_at(5);
        assert_eq!(payload.summary, Summary::default());
        assert!(payload.tests.is_empty());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let mut collector = ResultCollector::new();
        let record = collector.record(
            &TestCase {
                title: "bare".into(),
                ..TestCase::default()
            },
            &outcome("passed", -1.0, Some("")),
        );
        assert_eq!(record.project_name, "default");
        assert_eq!(record.location, "unknown:0");
        assert_eq!(record.duration_ms, 0);
        assert_eq!(record.error, None);
        assert_eq!(record.id, "-bare");
    }

    #[test]
    fn duplicate_ids_get_numeric_suffixes() {
        let mut collector = ResultCollector::new();
        for _ in 0..3 {
            collector.record(&case("Same Suite", "same test"), &outcome("passed", 1.0, None));
        }
        let ids: Vec<_> = collector.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            ["same-suite-same-test", "same-suite-same-test-2", "same-suite-same-test-3"]
        );
    }

    #[test]
    fn run_start_resets_previous_records() {
        let mut collector = ResultCollector::new();
        collector.record(&case("S", "t"), &outcome("passed", 1.0, None));
        collector.start_at(10);
        assert!(collector.records().is_empty());
        collector.record(&case("S", "t"), &outcome("passed", 1.0, None));
        assert_eq!(collector.records()[0].id, "s-t");
    }

    #[test]
    fn assembling_twice_is_stable_apart_from_end_time() {
        let mut collector = ResultCollector::new();
        collector.start_at(100);
        collector.record(&case("S", "t"), &outcome("failed", 3.0, Some("x")));
        let first = collector.assemble_at(200);
        let second = collector.assemble_at(300);
        assert_eq!(first.tests, second.tests);
        assert_eq!(first.summary, second.summary);
        assert_eq!(second.duration, 200);
    }
}
