pub mod collector;
pub mod events;
pub mod html;

use crate::models::{Annotation, TestStatus};

pub use collector::{ResultCollector, now_millis};
pub use events::{RunnerEvent, dispatch, drive, drive_started, parse_line, stream_events};
pub use html::{HtmlReporter, ReportOutcome};

/// What the runner tells us when a run begins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunInfo {
    pub total_tests: Option<usize>,
    /// Runner-side start time in epoch milliseconds, if it sent one.
    pub started_at: Option<i64>,
}

/// Identity of a finished test as seen by the runner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCase {
    pub title: String,
    pub suite_title: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub project_name: Option<String>,
}

/// Result of a finished test as seen by the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub status: TestStatus,
    /// Raw runner duration; may be fractional or negative.
    pub duration_ms: f64,
    pub error: Option<String>,
    pub annotations: Vec<Annotation>,
}

/// What the runner tells us when the run is over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Overall run status (`passed`, `failed`, `timedout`, `interrupted`).
    pub status: Option<String>,
    pub ended_at: Option<i64>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == "passed")
    }
}

/// Lifecycle hooks driven by the host test runner.
///
/// The runner calls `on_run_start` once, `on_test_complete` once per finished
/// test (one at a time), then `on_run_end` once.
pub trait Reporter {
    type Output;

    fn on_run_start(&mut self, info: &RunInfo);

    fn on_test_complete(&mut self, test: &TestCase, outcome: &TestOutcome);

    fn on_run_end(&mut self, outcome: &RunOutcome) -> crate::error::Result<Self::Output>;
}
