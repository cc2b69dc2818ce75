use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::Theme;
use crate::app::{App, Panel};
use crate::models::TestRecord;
use crate::view::format_duration;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme;
    let focused = app.active_panel == Panel::Detail;
    let border_style = if focused {
        Style::default().fg(theme.blue)
    } else {
        Style::default().fg(theme.surface2)
    };

    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = match app.selected_record() {
        Some(record) => build_detail_text(record, app.error_expanded(record), &theme),
        None => Text::from(Span::styled(
            "Select a test to view details.",
            Style::default().fg(theme.overlay),
        )),
    };

    let max_scroll = (content.height() as u16).saturating_sub(inner.height);
    let scroll = app.detail_scroll_offset.min(max_scroll);

    let paragraph = Paragraph::new(content)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, inner);
    app.detail_scroll_offset = scroll;
}

fn build_detail_text<'a>(record: &'a TestRecord, expanded: bool, theme: &Theme) -> Text<'a> {
    let color = record.status.color(theme);
    let label = Style::default().fg(theme.overlay);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", record.status.icon()), Style::default().fg(color)),
            Span::styled(record.title.as_str(), Style::default().fg(theme.text).bold()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Status:   ", label),
            Span::styled(record.status.to_string(), Style::default().fg(color)),
        ]),
        Line::from(vec![
            Span::styled("Duration: ", label),
            Span::raw(format_duration(record.duration_ms)),
        ]),
        Line::from(vec![
            Span::styled("Location: ", label),
            Span::raw(record.location.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Project:  ", label),
            Span::raw(record.project_name.as_str()),
        ]),
    ];

    if !record.annotations.is_empty() {
        lines.push(Line::from(""));
        for annotation in &record.annotations {
            let mut spans = vec![Span::styled(
                format!("@{}", annotation.kind),
                Style::default().fg(theme.mauve),
            )];
            if let Some(description) = &annotation.description {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(description.as_str(), Style::default().fg(theme.subtext)));
            }
            lines.push(Line::from(spans));
        }
    }

    if let Some(error) = record.displayed_error() {
        lines.push(Line::from(""));
        if expanded {
            lines.push(Line::from(Span::styled(
                "▼ Error",
                Style::default().fg(theme.red).bold(),
            )));
            lines.push(Line::from(""));
            for error_line in error.lines() {
                lines.push(Line::from(Span::styled(error_line, Style::default().fg(theme.red))));
            }
        } else {
            lines.push(Line::from(vec![
                Span::styled("▶ Error", Style::default().fg(theme.red).bold()),
                Span::styled("  [x] show", Style::default().fg(theme.overlay)),
            ]));
        }
    }

    Text::from(lines)
}
