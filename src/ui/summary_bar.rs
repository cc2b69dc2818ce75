use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::app::App;
use crate::models::TestStatus;
use crate::view::format_duration;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let summary = app.view.summary();

    let block = Block::default()
        .title(" 🥟 Pakoda Test Report ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.surface2));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [counts_area, gauge_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(24)]).areas(inner);

    let mut spans = vec![
        Span::styled(" Total ", Style::default().fg(theme.overlay)),
        Span::styled(summary.total.to_string(), Style::default().fg(theme.text).bold()),
    ];
    for status in TestStatus::KNOWN {
        let count = summary.count_for(&status);
        if count == 0 && matches!(status, TestStatus::TimedOut | TestStatus::Interrupted) {
            continue;
        }
        let color = status.color(&theme);
        spans.push(Span::styled(format!("  {} ", status.icon()), Style::default().fg(color)));
        spans.push(Span::styled(count.to_string(), Style::default().fg(color)));
    }
    spans.push(Span::styled(
        format!("  {}", format_duration(app.view.payload().duration.max(0) as u64)),
        Style::default().fg(theme.mauve),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), counts_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.green).bg(theme.surface0))
        .percent(summary.pass_rate.min(100) as u16)
        .label(format!("{}% passed", summary.pass_rate));
    frame.render_widget(gauge, gauge_area);
}
