mod cli;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};
use tracing_subscriber::EnvFilter;

use pakoda::app::{App, handle_action, trigger_action};
use pakoda::config::Config;
use pakoda::models::ReportPayload;
use pakoda::render::{AssetSource, Renderer};
use pakoda::reporter::{HtmlReporter, ReportOutcome, RunnerEvent, drive, drive_started, stream_events};
use pakoda::view::{ReportView, StatusFilter, export_file_name};
use pakoda::{runner, ui};

use cli::{Cli, Commands};

const DATA_FILE: &str = "data.json";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, matches!(cli.command, Commands::View { .. }))?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(Path::new(".")),
    };

    match cli.command {
        Commands::Run {
            output_dir,
            command,
            assets_dir,
            template,
            args,
        } => {
            let mut renderer = Renderer::new();
            if let Some(dir) = assets_dir {
                renderer = renderer.with_assets(AssetSource::Directory(dir));
            }
            if let Some(path) = template {
                renderer = renderer.with_template(path);
            }
            let reporter = HtmlReporter::new(config.output_dir(output_dir.as_deref()), renderer);
            let outcome = run_tests(reporter, &command, args).await?;
            Ok(exit_code(&outcome))
        }

        Commands::Ingest { input, output_dir } => {
            let reporter =
                HtmlReporter::new(config.output_dir(output_dir.as_deref()), Renderer::new());
            let outcome = ingest(reporter, &input).await?;
            Ok(exit_code(&outcome))
        }

        Commands::Render {
            data_json,
            output_dir,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| parent_dir(&data_json));
            let report = Renderer::new()
                .rerender(&data_json, &output_dir)
                .context("failed to render report")?;
            tracing::info!("Report generated at {}", report.index_html.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::View { path } => {
            let path = path.unwrap_or_else(|| config.output_dir.clone());
            view(&path).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Export {
            data_json,
            status,
            search,
            output,
        } => {
            export(&data_json, status, search, output)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::ReporterScript => {
            print!("{}", runner::reporter_source());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr, except in the viewer where they would corrupt the
/// screen: there they go to `PAKODA_LOG_FILE` or nowhere.
fn init_logging(verbose: bool, viewer: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("PAKODA_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    if !viewer {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(());
    }

    let Some(path) = std::env::var_os("PAKODA_LOG_FILE") else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", PathBuf::from(&path).display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn exit_code(outcome: &ReportOutcome) -> ExitCode {
    if outcome.run.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_tests(
    mut reporter: HtmlReporter,
    command: &str,
    args: Vec<String>,
) -> Result<ReportOutcome> {
    let workspace = std::env::current_dir().context("failed to resolve working directory")?;
    let test_runner = runner::detect(workspace, command, args)?;
    tracing::debug!(runner = test_runner.name(), "starting runner");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let runner_task = {
        let test_runner = Arc::clone(&test_runner);
        tokio::spawn(async move { test_runner.run(tx).await })
    };

    let outcome = drive_started(&mut reporter, &mut rx).await;

    // Runner errors take precedence over report errors.
    runner_task
        .await
        .context("runner task panicked")?
        .with_context(|| format!("{} failed", test_runner.name()))?;

    match outcome.context("failed to write report")? {
        Some(outcome) => Ok(outcome),
        None => bail!(
            "{} exited without reporting any tests; report left untouched",
            test_runner.name()
        ),
    }
}

async fn ingest(mut reporter: HtmlReporter, input: &str) -> Result<ReportOutcome> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = if input == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(input)
            .await
            .with_context(|| format!("failed to open event stream {}", input))?;
        Box::new(BufReader::new(file))
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<RunnerEvent>();
    let feed = tokio::spawn(stream_events(reader, tx));

    let outcome = drive(&mut reporter, &mut rx)
        .await
        .context("failed to write report")?;

    feed.await
        .context("event reader panicked")?
        .context("failed to read event stream")?;
    Ok(outcome)
}

fn export(
    data_json: &Path,
    status: StatusFilter,
    search: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let payload = ReportPayload::load(data_json)?;
    let mut view = ReportView::new(payload);
    view.set_filter(status);
    view.set_search(search);

    let now = Utc::now();
    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(now.date_naive())));
    view.export(now).write(&path)?;
    tracing::info!(
        tests = view.visible_len(),
        path = %path.display(),
        "exported filtered report"
    );
    Ok(())
}

/// Resolve a report directory or `data.json` path to the data file.
fn data_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DATA_FILE)
    } else {
        path.to_path_buf()
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

async fn view(path: &Path) -> Result<()> {
    let data_json = data_file(path);
    let payload = ReportPayload::load(&data_json)?;
    let mut app = App::new(payload, parent_dir(&data_json));
    app.notifier.info(
        format!("Loaded {} tests from {}", app.view.summary().total, data_json.display()),
        3,
    );

    // Setup terminal
    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = view_loop(&mut terminal, &mut app).await;

    // Teardown terminal
    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn view_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut tick = interval(Duration::from_millis(100));
    let mut event_stream = EventStream::new();
    // Kept for the whole session: on X11 the clipboard owner must stay alive.
    let mut clipboard: Option<arboard::Clipboard> = None;

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    None => break,
                    Some(Err(e)) => return Err(e.into()),
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = trigger_action(key, app.search_active) {
                            handle_action(app, action);
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }

            _ = tick.tick() => {
                app.on_tick(Instant::now());
            }
        }

        if let Some(text) = app.pending_copy.take() {
            match copy_to_clipboard(&mut clipboard, text) {
                Ok(()) => app.notifier.success("Test info copied to clipboard"),
                Err(e) => {
                    tracing::warn!(error = %e, "clipboard unavailable");
                    app.notifier.error(format!("Clipboard unavailable: {}", e));
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn copy_to_clipboard(
    clipboard: &mut Option<arboard::Clipboard>,
    text: String,
) -> Result<(), arboard::Error> {
    if clipboard.is_none() {
        *clipboard = Some(arboard::Clipboard::new()?);
    }
    if let Some(clipboard) = clipboard.as_mut() {
        clipboard.set_text(text)?;
    }
    Ok(())
}
