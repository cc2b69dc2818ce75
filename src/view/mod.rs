//! Filter/search/export logic behind the report viewers.
//!
//! `assets/app.js` implements the same rules in the browser; this module is
//! the Rust side used by the terminal viewer and headless export.

pub mod debounce;
pub mod format;
pub mod state;

pub use debounce::{Debounce, SEARCH_DEBOUNCE};
pub use format::{format_duration, test_info};
pub use state::{ExportDocument, ReportView, StatusFilter, export_file_name};
