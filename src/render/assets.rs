use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

const APP_JS: &str = include_str!("../../assets/app.js");
const STYLES_CSS: &str = include_str!("../../assets/styles.css");

/// Where the client script and stylesheet come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssetSource {
    /// The copies compiled into the binary.
    #[default]
    Embedded,
    /// Every file below a directory on disk.
    Directory(PathBuf),
}

/// Copy the client assets into `dest`. Returns how many files were written.
///
/// A missing source directory is skipped with a warning; the report still
/// renders, just without styling or interactivity.
pub fn copy(source: &AssetSource, dest: &Path) -> Result<usize> {
    match source {
        AssetSource::Embedded => {
            create_dir(dest)?;
            write(&dest.join("app.js"), APP_JS)?;
            write(&dest.join("styles.css"), STYLES_CSS)?;
            Ok(2)
        }
        AssetSource::Directory(dir) => copy_dir(dir, dest),
    }
}

fn copy_dir(dir: &Path, dest: &Path) -> Result<usize> {
    if !dir.is_dir() {
        tracing::warn!(source = %dir.display(), "asset source not found, skipping asset copy");
        return Ok(0);
    }

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(source = %dir.display(), error = %e, "unusable asset source, skipping asset copy");
            return Ok(0);
        }
    };

    let mut copied = 0;
    for entry in entries.flatten() {
        if !entry.is_file() {
            continue;
        }
        let Ok(relative) = entry.strip_prefix(dir) else {
            continue;
        };
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }
        std::fs::copy(&entry, &target).map_err(|source| ReportError::Write {
            path: target.clone(),
            source,
        })?;
        copied += 1;
    }

    tracing::debug!(copied, source = %dir.display(), "copied report assets");
    Ok(copied)
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| ReportError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_assets_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("assets");
        assert_eq!(copy(&AssetSource::Embedded, &dest).unwrap(), 2);
        let script = std::fs::read_to_string(dest.join("app.js")).unwrap();
        assert!(script.contains("window.reportData"));
        assert!(dest.join("styles.css").is_file());
    }

    #[test]
    fn missing_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = AssetSource::Directory(dir.path().join("missing"));
        let dest = dir.path().join("out/assets");
        assert_eq!(copy(&source, &dest).unwrap(), 0);
        assert!(!dest.exists());
    }

    #[test]
    fn directory_source_copies_nested_files() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("fonts")).unwrap();
        std::fs::write(src.path().join("app.js"), "// custom").unwrap();
        std::fs::write(src.path().join("fonts/icons.woff2"), [0u8, 1, 2]).unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("assets");
        let copied = copy(&AssetSource::Directory(src.path().to_path_buf()), &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(std::fs::read_to_string(dest.join("app.js")).unwrap(), "// custom");
        assert!(dest.join("fonts/icons.woff2").is_file());
    }
}
