use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pakoda::view::StatusFilter;

#[derive(Debug, Parser)]
#[command(name = "pakoda")]
#[command(about = "Static HTML/JSON reports for Playwright test runs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./pakoda.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (PAKODA_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run Playwright with the pakoda reporter attached and write the report
    Run {
        /// Report directory (overrides `output_dir` from the config file)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Runner command line, split shell-style
        #[arg(long, default_value = pakoda::runner::DEFAULT_COMMAND)]
        command: String,

        /// Copy client assets from this directory instead of the built-in ones
        #[arg(long)]
        assets_dir: Option<PathBuf>,

        /// Custom HTML template
        #[arg(long)]
        template: Option<PathBuf>,

        /// Extra arguments passed through to the runner
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Build a report from an NDJSON event stream
    Ingest {
        /// Event file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Re-render index.html and assets for an existing data.json
    Render {
        data_json: PathBuf,

        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Browse a report in the terminal
    View {
        /// Report directory or data.json (defaults to the configured output dir)
        path: Option<PathBuf>,
    },

    /// Write the filtered test list of a report as JSON
    Export {
        data_json: PathBuf,

        /// `all` or a test status (passed, failed, skipped, timedOut, interrupted)
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// Case-insensitive match on title, location or project
        #[arg(long, default_value = "")]
        search: String,

        /// Output file (defaults to pakoda-report-<date>.json)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the Playwright reporter script used by `run`
    ReporterScript,
}
