pub mod assets;
pub mod template;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{ReportError, Result};
use crate::models::ReportPayload;

pub use assets::AssetSource;

pub const REPORT_TITLE: &str = "Pakoda Test Report";

/// Paths of the artifacts written by [`Renderer::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub index_html: PathBuf,
    pub data_json: PathBuf,
    pub assets_copied: usize,
}

/// Turns a [`ReportPayload`] into `index.html`, `data.json` and `assets/`.
#[derive(Debug, Clone)]
pub struct Renderer {
    assets: AssetSource,
    template: Option<PathBuf>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            assets: AssetSource::Embedded,
            template: None,
        }
    }

    pub fn with_assets(mut self, assets: AssetSource) -> Self {
        self.assets = assets;
        self
    }

    /// Use a custom HTML template. If the file is missing at render time the
    /// built-in template is used instead.
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    pub fn render(&self, payload: &ReportPayload, output_dir: &Path) -> Result<RenderedReport> {
        self.render_at(payload, output_dir, Local::now())
    }

    pub fn render_at(
        &self,
        payload: &ReportPayload,
        output_dir: &Path,
        rendered_at: DateTime<Local>,
    ) -> Result<RenderedReport> {
        std::fs::create_dir_all(output_dir).map_err(|source| ReportError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let assets_copied = assets::copy(&self.assets, &output_dir.join("assets"))?;

        let data = serde_json::to_string(payload).map_err(ReportError::Serialize)?;
        let template = template::load(self.template.as_deref());
        let html = template::fill(
            &template,
            REPORT_TITLE,
            &template::format_timestamp(&rendered_at),
            &data,
        );
        let index_html = output_dir.join("index.html");
        write(&index_html, &html)?;

        let pretty = serde_json::to_string_pretty(payload).map_err(ReportError::Serialize)?;
        let data_json = output_dir.join("data.json");
        write(&data_json, &pretty)?;

        tracing::debug!(
            tests = payload.tests.len(),
            dir = %output_dir.display(),
            "report artifacts written"
        );

        Ok(RenderedReport {
            index_html,
            data_json,
            assets_copied,
        })
    }

    /// Re-render the report for a previously written `data.json`.
    pub fn rerender(&self, data_json: &Path, output_dir: &Path) -> Result<RenderedReport> {
        let payload = ReportPayload::load(data_json)?;
        self.render(&payload, output_dir)
    }
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{TestRecord, TestStatus};

    fn payload() -> ReportPayload {
        ReportPayload::new(
            vec![TestRecord {
                id: "suite-a".into(),
                title: "a".into(),
                status: TestStatus::Failed,
                duration_ms: 450,
                error: Some("Timeout 30000ms exceeded.".into()),
                location: "a.spec.ts:3".into(),
                project_name: "default".into(),
                annotations: Vec::new(),
            }],
            1000,
            2000,
        )
    }

    #[test]
    fn writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/report");
        let report = Renderer::new().render(&payload(), &out).unwrap();

        assert_eq!(report.index_html, out.join("index.html"));
        assert_eq!(report.assets_copied, 2);
        assert!(out.join("assets/app.js").is_file());

        let html = std::fs::read_to_string(&report.index_html).unwrap();
        assert!(html.contains("window.reportData = {\"summary\""));
        assert!(html.contains(REPORT_TITLE));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn data_json_round_trips_and_is_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let original = payload();
        let report = Renderer::new().render(&original, dir.path()).unwrap();

        let text = std::fs::read_to_string(&report.data_json).unwrap();
        assert!(text.starts_with("{\n  \"summary\""));
        assert_eq!(ReportPayload::load(&report.data_json).unwrap(), original);
    }

    #[test]
    fn rerender_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new();
        let first = renderer.render(&payload(), dir.path()).unwrap();
        std::fs::write(&first.index_html, "stale").unwrap();

        let second = renderer.rerender(&first.data_json, dir.path()).unwrap();
        let html = std::fs::read_to_string(second.index_html).unwrap();
        assert!(html.contains("Timeout 30000ms exceeded."));
    }

    #[test]
    fn uncreatable_output_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let err = Renderer::new()
            .render(&payload(), &blocker.join("report"))
            .unwrap_err();
        assert!(matches!(err, ReportError::CreateDir { .. }));
    }

    #[test]
    fn missing_assets_and_template_still_render() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new()
            .with_assets(AssetSource::Directory(dir.path().join("no-assets")))
            .with_template(dir.path().join("no-template.html"));
        let report = renderer.render(&payload(), &dir.path().join("out")).unwrap();

        assert_eq!(report.assets_copied, 0);
        let html = std::fs::read_to_string(report.index_html).unwrap();
        assert!(html.contains("id=\"test-results\""));
    }
}
