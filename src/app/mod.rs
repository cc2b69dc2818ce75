use std::{
    collections::HashSet,
    path::PathBuf,
    time::Instant,
};

use chrono::{DateTime, Utc};

use crate::{
    app::notifier::Notifier,
    error::Result,
    models::{ReportPayload, TestRecord},
    ui::theme::Theme,
    view::{Debounce, ReportView, StatusFilter, export_file_name},
};

pub mod actions;
pub mod notifier;

pub use actions::{Action, handle_action, trigger_action};
pub use notifier::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    TestList,
    Detail,
}

/// State of the terminal report viewer.
pub struct App {
    pub view: ReportView,
    pub theme: Theme,
    pub active_panel: Panel,
    pub selected_index: usize,
    pub list_scroll_offset: usize,
    pub list_viewport_height: usize,
    pub detail_scroll_offset: u16,
    pub search_active: bool,
    pub search: tui_input::Input,
    pub debounce: Debounce,
    /// Ids of failed tests whose error block is unfolded.
    pub expanded_errors: HashSet<String>,
    /// Directory exports are written to.
    pub export_dir: PathBuf,
    /// Text waiting to be placed on the system clipboard by the event loop.
    pub pending_copy: Option<String>,
    pub should_quit: bool,
    pub notifier: Notifier,
}

impl App {
    pub fn new(payload: ReportPayload, export_dir: PathBuf) -> Self {
        Self {
            view: ReportView::new(payload),
            theme: Theme::default(),
            active_panel: Panel::TestList,
            selected_index: 0,
            list_scroll_offset: 0,
            list_viewport_height: 0,
            detail_scroll_offset: 0,
            search_active: false,
            search: tui_input::Input::default(),
            debounce: Debounce::default(),
            expanded_errors: HashSet::new(),
            export_dir,
            pending_copy: None,
            should_quit: false,
            notifier: Notifier::new(),
        }
    }

    pub fn selected_record(&self) -> Option<&TestRecord> {
        self.view.visible_at(self.selected_index)
    }

    pub fn error_expanded(&self, record: &TestRecord) -> bool {
        self.expanded_errors.contains(&record.id)
    }

    /// Apply any search term whose debounce interval has elapsed.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(term) = self.debounce.poll(now) {
            self.apply_search(term);
        }
        self.notifier.prune_expired(now);
    }

    pub fn apply_filter(&mut self, filter: StatusFilter) {
        tracing::debug!(%filter, "filter changed");
        self.view.set_filter(filter);
        self.reset_selection();
    }

    pub fn apply_search(&mut self, term: String) {
        if term == self.view.search_term() {
            return;
        }
        tracing::debug!(%term, "search applied");
        self.view.set_search(term);
        self.reset_selection();
    }

    /// Write the filtered view to `export_dir` and return the file written.
    pub fn export(&self, now: DateTime<Utc>) -> Result<PathBuf> {
        let path = self.export_dir.join(export_file_name(now.date_naive()));
        self.view.export(now).write(&path)?;
        Ok(path)
    }

    fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.list_scroll_offset = 0;
        self.detail_scroll_offset = 0;
    }

    fn adjust_list_scroll(&mut self) {
        if self.list_viewport_height == 0 {
            return;
        }
        if self.selected_index < self.list_scroll_offset {
            self.list_scroll_offset = self.selected_index;
        } else if self.selected_index >= self.list_scroll_offset + self.list_viewport_height {
            self.list_scroll_offset = self.selected_index - self.list_viewport_height + 1;
        }
    }
}
