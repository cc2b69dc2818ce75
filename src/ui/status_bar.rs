use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let key = Style::default().fg(theme.yellow);

    let bar = if app.search_active {
        Line::from(vec![
            Span::styled(" [esc]", key),
            Span::raw(" clear  "),
            Span::styled("[enter]", key),
            Span::raw(" apply"),
        ])
    } else {
        Line::from(vec![
            Span::styled(" [/]", key),
            Span::raw(" search  "),
            Span::styled("[f]", key),
            Span::raw(format!(" filter: {}  ", app.view.filter())),
            Span::styled("[x]", key),
            Span::raw(" error  "),
            Span::styled("[y]", key),
            Span::raw(" copy  "),
            Span::styled("[s]", key),
            Span::raw(" export  "),
            Span::styled("[t]", key),
            Span::raw(format!(" theme: {}  ", app.theme.label())),
            Span::styled("[q]", key),
            Span::raw(" quit"),
        ])
    };

    let paragraph = Paragraph::new(bar).style(Style::default().fg(theme.text).bg(theme.surface0));
    frame.render_widget(paragraph, area);
}
