use std::path::Path;

use pakoda::models::{ReportPayload, Summary, TestStatus};
use pakoda::render::{AssetSource, Renderer};
use pakoda::reporter::{
    HtmlReporter, Reporter, RunInfo, RunOutcome, RunnerEvent, drive, drive_started, stream_events,
};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

const SIMPLE_RUN: &str = include_str!("fixtures/simple-run.ndjson");

async fn ingest(ndjson: &'static str, out: &Path) -> pakoda::reporter::ReportOutcome {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let feed = tokio::spawn(stream_events(ndjson.as_bytes(), tx));
    let mut reporter = HtmlReporter::new(out, Renderer::new());
    let outcome = drive(&mut reporter, &mut rx).await.unwrap();
    feed.await.unwrap().unwrap();
    outcome
}

#[tokio::test]
async fn simple_run_produces_full_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pakoda-report");
    let outcome = ingest(SIMPLE_RUN, &out).await;

    assert_eq!(
        outcome.payload.summary,
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
    assert_eq!(outcome.payload.duration, 1000);
    assert!(!outcome.run.succeeded());

    let ids: Vec<_> = outcome.payload.tests.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "simple-test-suite-should-pass---basic-test",
            "simple-test-suite-should-fail---intentional-failure",
            "simple-test-suite-should-skip---conditional-test",
        ]
    );

    assert!(out.join("index.html").is_file());
    assert!(out.join("assets/app.js").is_file());
    assert!(out.join("assets/styles.css").is_file());

    let html = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert!(html.contains("window.reportData = {"));
    assert!(html.contains("Timeout 30000ms exceeded."));
    assert!(!html.contains("{{REPORT_DATA}}"));
    assert!(!html.contains("{{TIMESTAMP}}"));
}

#[tokio::test]
async fn data_json_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report");
    let outcome = ingest(SIMPLE_RUN, &out).await;

    let raw = std::fs::read_to_string(out.join("data.json")).unwrap();
    assert!(raw.starts_with("{\n  \"summary\""), "data.json is pretty-printed");

    let loaded = ReportPayload::load(&out.join("data.json")).unwrap();
    assert_eq!(loaded, outcome.payload);
    assert_eq!(loaded.tests[2].annotations[0].kind, "skip");
    assert_eq!(loaded.tests[1].status, TestStatus::Failed);
}

#[tokio::test]
async fn empty_run_renders_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report");
    let outcome = ingest(
        "{\"type\":\"run-start\",\"time\":5}\n{\"type\":\"run-end\",\"status\":\"passed\",\"time\":5}\n",
        &out,
    )
    .await;

    assert_eq!(outcome.payload.summary, Summary::default());
    assert_eq!(outcome.payload.duration, 0);
    assert!(outcome.run.succeeded());

    let html = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert!(html.contains(r#""tests":[]"#));
}

#[tokio::test]
async fn unknown_status_survives_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report");
    ingest(
        "{\"type\":\"test-end\",\"test\":{\"title\":\"t\",\"suite\":\"s\"},\"result\":{\"status\":\"flaky\"}}\n{\"type\":\"run-end\"}\n",
        &out,
    )
    .await;

    let loaded = ReportPayload::load(&out.join("data.json")).unwrap();
    assert_eq!(loaded.tests[0].status, TestStatus::Unknown("flaky".into()));
    assert_eq!(loaded.tests[0].location, "unknown:0");
    assert_eq!(loaded.tests[0].project_name, "default");
    assert_eq!(loaded.summary.total, 1);
    assert_eq!(loaded.summary.passed + loaded.summary.failed, 0);
}

#[test]
fn missing_assets_and_template_degrade_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report");
    let renderer = Renderer::new()
        .with_assets(AssetSource::Directory(dir.path().join("no-assets")))
        .with_template(dir.path().join("no-template.html"));
    let mut reporter = HtmlReporter::new(&out, renderer);

    reporter.on_run_start(&RunInfo::default());
    let outcome = reporter.on_run_end(&RunOutcome::default()).unwrap();

    assert_eq!(outcome.report.assets_copied, 0);
    let html = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert!(html.contains("id=\"test-results\""));
}

#[test]
fn rerender_rebuilds_html_from_data_json() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let mut reporter = HtmlReporter::new(&first, Renderer::new());
    reporter.on_run_start(&RunInfo::default());
    reporter.on_run_end(&RunOutcome::default()).unwrap();

    let second = dir.path().join("second");
    let report = Renderer::new()
        .rerender(&first.join("data.json"), &second)
        .unwrap();
    assert_eq!(report.index_html, second.join("index.html"));
    assert_eq!(
        std::fs::read_to_string(first.join("data.json")).unwrap(),
        std::fs::read_to_string(second.join("data.json")).unwrap()
    );
}

#[test]
fn unwritable_output_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut reporter = HtmlReporter::new(blocker.join("report"), Renderer::new());
    reporter.on_run_start(&RunInfo::default());
    let err = reporter.on_run_end(&RunOutcome::default()).unwrap_err();
    assert!(matches!(err, pakoda::ReportError::CreateDir { .. }));
}

#[tokio::test]
async fn runner_that_never_starts_keeps_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pakoda-report");
    ingest(SIMPLE_RUN, &out).await;
    let before = std::fs::read_to_string(out.join("data.json")).unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(RunnerEvent::Output {
        line: "sh: npx: command not found".into(),
    })
    .unwrap();
    drop(tx);
    let mut reporter = HtmlReporter::new(&out, Renderer::new());
    assert!(drive_started(&mut reporter, &mut rx).await.unwrap().is_none());

    let after = std::fs::read_to_string(out.join("data.json")).unwrap();
    assert_eq!(before, after);
}
