//! Collects Playwright results and turns them into a static HTML report
//! (`index.html`, `data.json`, `assets/`), plus a terminal viewer over the
//! same data.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod reporter;
pub mod runner;
pub mod ui;
pub mod view;

pub use error::{ReportError, Result};
