use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::models::{Annotation, TestStatus};

use super::{Reporter, RunInfo, RunOutcome, TestCase, TestOutcome};

/// Events streamed from a host runner into a [`Reporter`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    RunStarted(RunInfo),
    TestFinished { test: TestCase, outcome: TestOutcome },
    RunFinished(RunOutcome),
    /// Anything the runner printed that is not an event.
    Output { line: String },
    Error { message: String },
}

/// Apply one event to the reporter. Returns the reporter output once the run ends.
pub fn dispatch<R: Reporter>(reporter: &mut R, event: RunnerEvent) -> Result<Option<R::Output>> {
    match event {
        RunnerEvent::RunStarted(info) => reporter.on_run_start(&info),

        RunnerEvent::TestFinished { test, outcome } => reporter.on_test_complete(&test, &outcome),

        RunnerEvent::RunFinished(outcome) => return reporter.on_run_end(&outcome).map(Some),

        RunnerEvent::Output { line } => tracing::info!(target: "pakoda::runner", "{}", line),

        RunnerEvent::Error { message } => tracing::warn!(target: "pakoda::runner", "{}", message),
    }
    Ok(None)
}

/// Decode one NDJSON line. Blank lines are dropped; lines that are not
/// events are passed through as runner output.
pub fn parse_line(line: &str) -> Option<RunnerEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<WireEvent>(line) {
        Ok(event) => Some(event.into_runner_event()),
        Err(_) => Some(RunnerEvent::Output {
            line: line.to_string(),
        }),
    }
}

/// Read NDJSON from `reader` until EOF, forwarding decoded events.
pub async fn stream_events<R>(reader: R, tx: mpsc::UnboundedSender<RunnerEvent>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        tracing::trace!(target: "pakoda::wire", "{}", line);
        if let Some(event) = parse_line(&line)
            && tx.send(event).is_err()
        {
            break;
        }
    }
    Ok(())
}

/// Feed events from `rx` to the reporter until the run ends.
///
/// A stream that closes without a run-end event is finished as an
/// interrupted run so whatever was collected still gets reported.
pub async fn drive<R: Reporter>(
    reporter: &mut R,
    rx: &mut mpsc::UnboundedReceiver<RunnerEvent>,
) -> Result<R::Output> {
    while let Some(event) = rx.recv().await {
        if let Some(output) = dispatch(reporter, event)? {
            return Ok(output);
        }
    }
    tracing::warn!("event stream ended without run-end; finishing the run as interrupted");
    reporter.on_run_end(&RunOutcome {
        status: Some("interrupted".into()),
        ended_at: None,
    })
}

/// Like [`drive`], but yields `None` when the stream closes before the run
/// produced any lifecycle event. A runner that never started (missing
/// binary, bad config) then leaves an earlier report in place.
pub async fn drive_started<R: Reporter>(
    reporter: &mut R,
    rx: &mut mpsc::UnboundedReceiver<RunnerEvent>,
) -> Result<Option<R::Output>> {
    while let Some(event) = rx.recv().await {
        let lifecycle = event.is_lifecycle();
        if let Some(output) = dispatch(reporter, event)? {
            return Ok(Some(output));
        }
        if lifecycle {
            return drive(reporter, rx).await.map(Some);
        }
    }
    Ok(None)
}

impl RunnerEvent {
    fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            RunnerEvent::RunStarted(_) | RunnerEvent::TestFinished { .. } | RunnerEvent::RunFinished(_)
        )
    }
}

// --- NDJSON deserialization types ---
//
// Optional fields that are null or of the wrong type decode as absent, so one
// odd field never costs the whole test result.

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
enum WireEvent {
    RunStart {
        #[serde(default, deserialize_with = "lenient")]
        total_tests: Option<usize>,
        #[serde(default, deserialize_with = "lenient")]
        time: Option<i64>,
    },
    TestEnd {
        #[serde(default, deserialize_with = "lenient")]
        test: Option<WireTest>,
        #[serde(default, deserialize_with = "lenient")]
        result: Option<WireResult>,
    },
    RunEnd {
        #[serde(default, deserialize_with = "lenient")]
        status: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        time: Option<i64>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireTest {
    #[serde(deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    suite: Option<String>,
    #[serde(deserialize_with = "lenient")]
    file: Option<String>,
    #[serde(deserialize_with = "line_number")]
    line: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    project: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireResult {
    #[serde(deserialize_with = "lenient")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    duration: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    error: Option<WireError>,
    #[serde(deserialize_with = "lenient_list")]
    annotations: Vec<WireAnnotation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireError {
    #[serde(deserialize_with = "lenient")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAnnotation {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Arrays keep the entries that decode; anything else is an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Line numbers also arrive as numeric strings from some reporters.
fn line_number<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl WireEvent {
    fn into_runner_event(self) -> RunnerEvent {
        match self {
            WireEvent::RunStart { total_tests, time } => RunnerEvent::RunStarted(RunInfo {
                total_tests,
                started_at: time,
            }),

            WireEvent::TestEnd { test, result } => {
                let test = test.unwrap_or_default();
                let result = result.unwrap_or_default();
                RunnerEvent::TestFinished {
                    test: TestCase {
                        title: test.title.unwrap_or_default(),
                        suite_title: test.suite.unwrap_or_default(),
                        file: test.file,
                        line: test.line,
                        project_name: test.project,
                    },
                    outcome: TestOutcome {
                        status: result
                            .status
                            .map(TestStatus::from)
                            .unwrap_or_else(|| TestStatus::Unknown("unknown".into())),
                        duration_ms: result.duration.unwrap_or(0.0),
                        error: result
                            .error
                            .and_then(|e| e.message)
                            .map(|m| strip_ansi(&m)),
                        annotations: result
                            .annotations
                            .into_iter()
                            .map(|a| Annotation {
                                kind: a.kind.unwrap_or_default(),
                                description: a.description,
                            })
                            .collect(),
                    },
                }
            }

            WireEvent::RunEnd { status, time } => RunnerEvent::RunFinished(RunOutcome {
                status,
                ended_at: time,
            }),
        }
    }
}

/// Strip ANSI escape sequences from a string.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until we hit a letter (end of escape sequence)
            for c2 in chars.by_ref() {
                if c2.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
