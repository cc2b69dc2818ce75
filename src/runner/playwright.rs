use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::reporter::{RunnerEvent, stream_events};

use super::HostRunner;

pub const DEFAULT_COMMAND: &str = "npx playwright test";

const REPORTER_SOURCE: &str = include_str!("../../reporters/playwright-reporter.mjs");

/// The NDJSON reporter shim handed to Playwright.
pub fn reporter_source() -> &'static str {
    REPORTER_SOURCE
}

/// Guard that kills the child process (and its entire process group) on drop.
struct ChildGuard {
    child: Option<tokio::process::Child>,
    /// Process group ID saved at spawn time so we can kill the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
}

impl ChildGuard {
    fn new(child: tokio::process::Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child: Some(child),
            #[cfg(unix)]
            pgid,
        }
    }

    /// Wait for a normal exit; once reaped there is nothing left to kill.
    async fn wait(&mut self) -> Result<Option<std::process::ExitStatus>> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };
        let status = child.wait().await.context("failed to wait for runner")?;
        self.child = None;
        #[cfg(unix)]
        {
            self.pgid = None;
        }
        Ok(Some(status))
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        // Kill the entire process group so browser workers don't become orphans.
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
        }
        if let Some(ref mut child) = self.child {
            let _ = child.start_kill();
        }
    }
}

/// Playwright adapter: spawns the runner with the embedded NDJSON reporter
/// and forwards its events.
pub struct PlaywrightRunner {
    workspace: PathBuf,
    argv: Vec<String>,
}

impl PlaywrightRunner {
    pub fn new(workspace: PathBuf, argv: Vec<String>) -> Self {
        Self { workspace, argv }
    }

    /// Write the embedded reporter to a temp file and return its path.
    fn write_reporter(&self) -> Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("pakoda-playwright-reporter-")
            .suffix(".mjs")
            .tempfile()
            .context("failed to create temp reporter file")?;

        use std::io::Write;
        file.write_all(REPORTER_SOURCE.as_bytes())
            .context("failed to write reporter to temp file")?;

        Ok(file)
    }

    fn command(&self, reporter_path: &str) -> Result<Command> {
        let (program, args) = self.argv.split_first().context("runner command is empty")?;
        let mut cmd = Command::new(program);
        cmd.args(args).arg(format!("--reporter={}", reporter_path));
        Ok(cmd)
    }
}

#[async_trait]
impl HostRunner for PlaywrightRunner {
    async fn run(&self, tx: mpsc::UnboundedSender<RunnerEvent>) -> Result<()> {
        let reporter_file = self.write_reporter()?;
        let mut cmd = self.command(&reporter_file.path().to_string_lossy())?;

        tracing::debug!(cmd = ?cmd.as_std(), cwd = %self.workspace.display(), "spawning runner");

        // Own process group so the guard can take out every worker the runner forks.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.as_std_mut().process_group(0);
        }

        let mut child = cmd
            .current_dir(&self.workspace)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.argv.join(" ")))?;

        let stdout = child.stdout.take().context("missing stdout")?;
        let stderr = child.stderr.take().context("missing stderr")?;
        let mut child_guard = ChildGuard::new(child);

        let tx_err = tx.clone();
        let stderr_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let _ = tx_err.send(RunnerEvent::Output { line });
            }
        });

        stream_events(BufReader::new(stdout), tx.clone())
            .await
            .context("failed to read runner output")?;
        stderr_handle.await.ok();

        // Playwright exits non-zero whenever a test fails; only the event stream
        // decides the outcome.
        if let Some(status) = child_guard.wait().await? {
            tracing::debug!(%status, "runner exited");
            if status.code().is_none() {
                let _ = tx.send(RunnerEvent::Error {
                    message: format!("{} terminated by signal", self.name()),
                });
            }
        }

        // Keep the temp file alive until the runner exits
        drop(reporter_file);
        Ok(())
    }

    fn name(&self) -> &str {
        "Playwright"
    }
}
