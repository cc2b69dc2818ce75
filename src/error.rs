use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the reporting step. All of them are fatal to the step.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report directory `{}`", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report payload")]
    Serialize(#[source] serde_json::Error),

    #[error("`{}` is not a valid report payload", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;
