use std::time::Instant;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::InputRequest;

use crate::{
    app::{App, Panel},
    models::TestStatus,
    view::StatusFilter,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    FocusNext,
    NavigateUp,
    NavigateDown,
    ScrollUp,
    ScrollDown,
    JumpToStart,
    JumpToEnd,
    SearchEnter,
    SearchInput(char),
    SearchBackspace,
    SearchExit,
    SearchApply,
    CycleFilter,
    SetFilter(StatusFilter),
    ToggleError,
    CopyInfo,
    Export,
    ToggleTheme,
}

/// Process a keyboard action.
pub fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,

        Action::FocusNext => {
            app.active_panel = match app.active_panel {
                Panel::TestList => Panel::Detail,
                Panel::Detail => Panel::TestList,
            };
        }

        Action::NavigateUp => match app.active_panel {
            Panel::TestList => select(app, app.selected_index.saturating_sub(1)),
            Panel::Detail => {
                app.detail_scroll_offset = app.detail_scroll_offset.saturating_sub(1);
            }
        },

        Action::NavigateDown => match app.active_panel {
            Panel::TestList => select(app, app.selected_index + 1),
            Panel::Detail => {
                app.detail_scroll_offset = app.detail_scroll_offset.saturating_add(1);
            }
        },

        Action::ScrollUp => {
            let half = (app.list_viewport_height / 2).max(1);
            match app.active_panel {
                Panel::TestList => select(app, app.selected_index.saturating_sub(half)),
                Panel::Detail => {
                    app.detail_scroll_offset = app.detail_scroll_offset.saturating_sub(half as u16);
                }
            }
        }

        Action::ScrollDown => {
            let half = (app.list_viewport_height / 2).max(1);
            match app.active_panel {
                Panel::TestList => select(app, app.selected_index + half),
                Panel::Detail => {
                    app.detail_scroll_offset = app.detail_scroll_offset.saturating_add(half as u16);
                }
            }
        }

        Action::JumpToStart => match app.active_panel {
            Panel::TestList => {
                select(app, 0);
                app.list_scroll_offset = 0;
            }
            Panel::Detail => app.detail_scroll_offset = 0,
        },

        Action::JumpToEnd => match app.active_panel {
            Panel::TestList => select(app, usize::MAX),
            Panel::Detail => app.detail_scroll_offset = u16::MAX,
        },

        Action::SearchEnter => app.search_active = true,

        Action::SearchInput(c) => {
            app.search.handle(InputRequest::InsertChar(c));
            app.debounce.push(app.search.value(), Instant::now());
        }

        Action::SearchBackspace => {
            app.search.handle(InputRequest::DeletePrevChar);
            app.debounce.push(app.search.value(), Instant::now());
        }

        Action::SearchExit => {
            app.search.reset();
            app.debounce.flush();
            app.search_active = false;
            app.apply_search(String::new());
        }

        Action::SearchApply => {
            app.search_active = false;
            app.debounce.flush();
            app.apply_search(app.search.value().to_string());
        }

        Action::CycleFilter => {
            let next = app.view.filter().next();
            app.apply_filter(next);
        }

        Action::SetFilter(filter) => app.apply_filter(filter),

        Action::ToggleError => {
            let Some(record) = app.selected_record() else {
                return;
            };
            if record.displayed_error().is_none() {
                return;
            }
            let id = record.id.clone();
            if !app.expanded_errors.remove(&id) {
                app.expanded_errors.insert(id);
            }
        }

        Action::CopyInfo => {
            let info = app
                .selected_record()
                .map(|r| r.id.clone())
                .and_then(|id| app.view.copy_info(&id));
            if let Some(info) = info {
                app.pending_copy = Some(info);
            }
        }

        Action::Export => match app.export(Utc::now()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "exported filtered report");
                app.notifier.success(format!("Exported {}", path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                app.notifier.error(e.to_string());
            }
        },

        Action::ToggleTheme => {
            app.theme = app.theme.toggled();
            app.notifier.info(format!("Theme: {}", app.theme.label()), 2);
        }
    }
}

pub fn trigger_action(key: KeyEvent, search_active: bool) -> Option<Action> {
    if search_active {
        match key.code {
            KeyCode::Esc => Some(Action::SearchExit),
            KeyCode::Enter => Some(Action::SearchApply),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Up => Some(Action::NavigateUp),
            KeyCode::Down => Some(Action::NavigateDown),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        }
    } else {
        map_key(key)
    }
}

fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('u') => Some(Action::ScrollUp),
            KeyCode::Char('d') => Some(Action::ScrollDown),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::FocusNext),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::JumpToStart),
        KeyCode::Char('G') | KeyCode::End => Some(Action::JumpToEnd),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        KeyCode::Char('/') => Some(Action::SearchEnter),
        KeyCode::Esc => Some(Action::SearchExit),
        KeyCode::Char('f') => Some(Action::CycleFilter),
        KeyCode::Char(c @ '1'..='6') => filter_for_digit(c).map(Action::SetFilter),
        KeyCode::Enter | KeyCode::Char('x') => Some(Action::ToggleError),
        KeyCode::Char('y') => Some(Action::CopyInfo),
        KeyCode::Char('s') => Some(Action::Export),
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        _ => None,
    }
}

/// `1` is "all", `2..=6` follow [`TestStatus::KNOWN`].
fn filter_for_digit(c: char) -> Option<StatusFilter> {
    let n = c.to_digit(10)? as usize;
    if n == 1 {
        return Some(StatusFilter::All);
    }
    TestStatus::KNOWN.get(n - 2).cloned().map(StatusFilter::Only)
}

fn select(app: &mut App, index: usize) {
    let max = app.view.visible_len().saturating_sub(1);
    app.selected_index = index.min(max);
    app.detail_scroll_offset = 0;
    app.adjust_list_scroll();
}
