use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::{App, Panel};
use crate::view::{StatusFilter, format_duration};

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme;
    let focused = app.active_panel == Panel::TestList;
    let border_style = if focused {
        Style::default().fg(theme.blue)
    } else {
        Style::default().fg(theme.surface2)
    };

    let title = match app.view.filter() {
        StatusFilter::All => format!(" Tests ({}) ", app.view.visible_len()),
        filter => format!(" Tests: {} ({}) ", filter, app.view.visible_len()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner_height = block.inner(area).height as usize;
    app.list_viewport_height = inner_height;

    if app.view.is_empty() {
        let empty = Paragraph::new("No tests found matching your criteria.")
            .style(Style::default().fg(theme.overlay))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .view
        .visible()
        .enumerate()
        .skip(app.list_scroll_offset)
        .take(inner_height)
        .map(|(i, record)| {
            let color = record.status.color(&theme);
            let duration = format_duration(record.duration_ms);

            let name_style = if i == app.selected_index {
                let bg = if focused { theme.surface1 } else { theme.surface0 };
                Style::default().bg(bg).fg(theme.text).bold()
            } else {
                Style::default().fg(theme.text)
            };

            // icon + space + title + padding + duration
            let used = 2 + record.title.chars().count() + duration.len();
            let pad = width.saturating_sub(used).max(1);

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", record.status.icon()), Style::default().fg(color)),
                Span::styled(record.title.as_str(), name_style),
                Span::raw(" ".repeat(pad)),
                Span::styled(duration, Style::default().fg(theme.overlay)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
