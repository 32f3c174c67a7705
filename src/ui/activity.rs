//! Activity view: every notification shown this session, newest first.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_age;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let total = app.notifications.history().len();

    let lines: Vec<Line> = app
        .notifications
        .history()
        .rev()
        .skip(app.activity_offset)
        .map(|n| {
            Line::from(vec![
                Span::styled(format!(" {} ", n.level.symbol()), app.theme.level_style(n.level)),
                Span::styled(
                    format!("{:>9} ", format_age(now.saturating_duration_since(n.created))),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::styled(format!("{}: ", n.title), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(n.message.clone()),
            ])
        })
        .collect();

    let body = if lines.is_empty() {
        vec![Line::from(Span::styled(
            " Nothing yet",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        lines
    };

    let block = Block::default()
        .title(format!(" Activity ({}) ", total))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(body).block(block), area);
}
