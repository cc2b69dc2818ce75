use std::fmt;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::ui::theme::Theme;

/// Final status of a test as reported by the runner.
///
/// Anything the runner sends that is not one of the known statuses is kept
/// verbatim in [`TestStatus::Unknown`] so it can be displayed as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    TimedOut,
    Interrupted,
    Unknown(String),
}

impl TestStatus {
    /// The known statuses, in the order the UIs list them.
    pub const KNOWN: [TestStatus; 5] = [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Skipped,
        TestStatus::TimedOut,
        TestStatus::Interrupted,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
            TestStatus::TimedOut => "timedOut",
            TestStatus::Interrupted => "interrupted",
            TestStatus::Unknown(raw) => raw,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TestStatus::Passed => "✔",
            TestStatus::Failed => "✘",
            TestStatus::Skipped => "⊘",
            TestStatus::TimedOut => "⏱",
            TestStatus::Interrupted => "⏹",
            TestStatus::Unknown(_) => "?",
        }
    }

    pub fn color(&self, theme: &Theme) -> Color {
        match self {
            TestStatus::Passed => theme.green,
            TestStatus::Failed => theme.red,
            TestStatus::Skipped => theme.overlay,
            TestStatus::TimedOut => theme.peach,
            TestStatus::Interrupted => theme.yellow,
            TestStatus::Unknown(_) => theme.subtext,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestStatus::Failed)
    }
}

impl From<String> for TestStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "passed" => TestStatus::Passed,
            "failed" => TestStatus::Failed,
            "skipped" => TestStatus::Skipped,
            "timedOut" => TestStatus::TimedOut,
            "interrupted" => TestStatus::Interrupted,
            blank if blank.trim().is_empty() => TestStatus::Unknown("unknown".into()),
            _ => TestStatus::Unknown(raw),
        }
    }
}

impl From<&str> for TestStatus {
    fn from(raw: &str) -> Self {
        TestStatus::from(raw.to_string())
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        match status {
            TestStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
