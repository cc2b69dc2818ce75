use serde::{Deserialize, Serialize};

use super::record::TestRecord;
use super::status::TestStatus;

/// Per-status counts over one run. Always derived from the full record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub timed_out: usize,
    pub interrupted: usize,
    pub pass_rate: u32,
}

impl Summary {
    /// Bucket every record by status in a single pass.
    ///
    /// Unknown statuses only contribute to `total`.
    pub fn from_records(records: &[TestRecord]) -> Self {
        let mut summary = Summary {
            total: records.len(),
            ..Summary::default()
        };

        for record in records {
            match record.status {
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Skipped => summary.skipped += 1,
                TestStatus::TimedOut => summary.timed_out += 1,
                TestStatus::Interrupted => summary.interrupted += 1,
                TestStatus::Unknown(_) => {}
            }
        }

        summary.pass_rate = pass_rate(summary.passed, summary.total);
        summary
    }

    /// Records whose status fell outside the known buckets.
    pub fn unknown(&self) -> usize {
        self.total
            - (self.passed + self.failed + self.skipped + self.timed_out + self.interrupted)
    }

    pub fn count_for(&self, status: &TestStatus) -> usize {
        match status {
            TestStatus::Passed => self.passed,
            TestStatus::Failed => self.failed,
            TestStatus::Skipped => self.skipped,
            TestStatus::TimedOut => self.timed_out,
            TestStatus::Interrupted => self.interrupted,
            TestStatus::Unknown(_) => self.unknown(),
        }
    }
}

/// `round(100 * passed / total)` with half-up rounding, 0 for an empty run.
fn pass_rate(passed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((passed * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_statuses(statuses: &[&str]) -> Vec<TestRecord> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| TestRecord {
                id: format!("t-{i}"),
                title: format!("test {i}"),
                status: TestStatus::from(*s),
                duration_ms: 0,
                error: None,
                location: "a.spec.ts:1".into(),
                project_name: "default".into(),
                annotations: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn empty_run_has_zero_pass_rate() {
        assert_eq!(Summary::from_records(&[]), Summary::default());
    }

    #[test]
    fn pass_rate_rounds_half_up() {
        assert_eq!(pass_rate(2, 3), 67);
        assert_eq!(pass_rate(1, 3), 33);
        assert_eq!(pass_rate(1, 8), 13);
        assert_eq!(pass_rate(1, 2), 50);
        assert_eq!(pass_rate(5, 5), 100);
    }

    #[test]
    fn buckets_partition_known_statuses() {
        let records = with_statuses(&[
            "passed",
            "failed",
            "skipped",
            "timedOut",
            "interrupted",
            "passed",
        ]);
        let summary = Summary::from_records(&records);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.timed_out, 1);
        assert_eq!(summary.interrupted, 1);
        assert_eq!(summary.unknown(), 0);
        assert_eq!(summary.pass_rate, 33);
    }

    #[test]
    fn unknown_statuses_count_only_towards_total() {
        let summary = Summary::from_records(&with_statuses(&["passed", "flaky"]));
        assert_eq!(summary.total, 2);
        assert_eq!(
            summary.passed + summary.failed + summary.skipped + summary.timed_out + summary.interrupted,
            1
        );
        assert_eq!(summary.count_for(&TestStatus::Unknown("flaky".into())), 1);
        assert_eq!(summary.pass_rate, 50);
    }

    #[test]
    fn serializes_with_report_field_names() {
        let json = serde_json::to_value(Summary::from_records(&with_statuses(&["timedOut"])))
            .unwrap();
        assert_eq!(json["timedOut"], 1);
        assert_eq!(json["passRate"], 0);
    }
}
