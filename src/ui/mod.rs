use ratatui::{prelude::*, widgets::Block};

use crate::app::App;

mod detail_panel;
mod notifications;
mod search_box;
mod status_bar;
mod summary_bar;
mod test_list;
pub mod theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::default().style(Style::default().bg(app.theme.base)), frame.area());

    let [summary_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [left_area, right_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(main_area);

    summary_bar::draw(frame, app, summary_area);

    if app.search_active || !app.search.value().is_empty() {
        let [search_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(left_area);
        search_box::draw(frame, app, search_area);
        test_list::draw(frame, app, list_area);
    } else {
        test_list::draw(frame, app, left_area);
    }
    detail_panel::draw(frame, app, right_area);
    status_bar::draw(frame, app, status_area);
    notifications::draw(frame, app);
}
