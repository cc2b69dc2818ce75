use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let query = app.search.value();
    let (display, border_color, text_style) = if app.search_active {
        (
            format!("/ {}│", query),
            theme.blue,
            Style::default().fg(theme.text),
        )
    } else {
        (
            format!("/ {}", query),
            theme.surface2,
            Style::default().fg(theme.overlay),
        )
    };

    let title = if app.debounce.is_pending() {
        " Search … "
    } else {
        " Search "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let paragraph = Paragraph::new(display).style(text_style).block(block);
    frame.render_widget(paragraph, area);
}
