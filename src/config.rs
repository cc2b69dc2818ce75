use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the optional config file looked up in the working directory.
pub const FILE_NAME: &str = "pakoda.toml";

pub const DEFAULT_OUTPUT_DIR: &str = "pakoda-report";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Directory the report is written to, relative to the working directory.
    /// Example: "reports/e2e"
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Config {
    /// Load `pakoda.toml` from `workspace`, falling back to defaults if absent or invalid.
    pub fn load(workspace: &Path) -> Self {
        Self::load_from(&workspace.join(FILE_NAME))
    }

    /// Load an explicit config file, falling back to defaults if absent or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// The configured output directory, unless overridden on the command line.
    pub fn output_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override.map_or_else(|| self.output_dir.clone(), Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_default_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).output_dir, PathBuf::from("pakoda-report"));
    }

    #[test]
    fn reads_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), "output_dir = \"out/e2e\"\n").unwrap();
        assert_eq!(Config::load(dir.path()).output_dir, PathBuf::from("out/e2e"));
    }

    #[test]
    fn invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), "output_dir = [").unwrap();
        assert_eq!(Config::load(dir.path()), Config::default());
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), "").unwrap();
        assert_eq!(Config::load(dir.path()), Config::default());
    }

    #[test]
    fn cli_flag_wins() {
        let config = Config::default();
        assert_eq!(
            config.output_dir(Some(Path::new("custom"))),
            PathBuf::from("custom")
        );
        assert_eq!(config.output_dir(None), PathBuf::from("pakoda-report"));
    }
}
