pub mod playwright;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::reporter::RunnerEvent;

pub use playwright::{DEFAULT_COMMAND, PlaywrightRunner, reporter_source};

/// Trait for host test runners that can be driven as a child process.
#[async_trait]
pub trait HostRunner: Send + Sync {
    /// Run the whole suite, streaming lifecycle events over the channel.
    async fn run(&self, tx: mpsc::UnboundedSender<RunnerEvent>) -> Result<()>;

    /// Display name for this runner (e.g., "Playwright").
    fn name(&self) -> &str;
}

/// Build the runner for `command` (split shell-style) plus extra arguments.
pub fn detect(workspace: PathBuf, command: &str, args: Vec<String>) -> Result<Arc<dyn HostRunner>> {
    let mut argv = shell_words::split(command)
        .with_context(|| format!("invalid runner command `{}`", command))?;
    if argv.is_empty() {
        anyhow::bail!("runner command is empty");
    }
    argv.extend(args);
    Ok(Arc::new(PlaywrightRunner::new(workspace, argv)))
}
