use std::path::PathBuf;

use crate::error::Result;
use crate::models::ReportPayload;
use crate::render::{RenderedReport, Renderer};

use super::{Reporter, ResultCollector, RunInfo, RunOutcome, TestCase, TestOutcome};

/// What a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub payload: ReportPayload,
    pub report: RenderedReport,
    pub run: RunOutcome,
}

/// Collects results and writes the HTML report when the run ends.
pub struct HtmlReporter {
    collector: ResultCollector,
    renderer: Renderer,
    output_dir: PathBuf,
}

impl HtmlReporter {
    pub fn new(output_dir: impl Into<PathBuf>, renderer: Renderer) -> Self {
        Self {
            collector: ResultCollector::new(),
            renderer,
            output_dir: output_dir.into(),
        }
    }
}

impl Reporter for HtmlReporter {
    type Output = ReportOutcome;

    fn on_run_start(&mut self, info: &RunInfo) {
        tracing::info!("🥟 Pakoda Reporter: Starting test execution...");
        if let Some(total) = info.total_tests {
            tracing::debug!(total, "runner announced test count");
        }
        self.collector.on_run_start(info);
    }

    fn on_test_complete(&mut self, test: &TestCase, outcome: &TestOutcome) {
        self.collector.on_test_complete(test, outcome);
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) -> Result<ReportOutcome> {
        let payload = self.collector.on_run_end(outcome)?;
        let report = self.renderer.render(&payload, &self.output_dir)?;

        let shown = std::path::absolute(&report.index_html).unwrap_or_else(|_| report.index_html.clone());
        tracing::info!(
            "🥟 Pakoda Reporter: Report generated at {}",
            shown.display()
        );

        Ok(ReportOutcome {
            payload,
            report,
            run: outcome.clone(),
        })
    }
}
