//! Toast notifications in the top-right corner of the content area.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

const TOAST_HEIGHT: u16 = 3;
const MAX_TOAST_WIDTH: u16 = 48;

/// Stack the visible notifications, newest on top.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let width = MAX_TOAST_WIDTH.min(area.width / 2);
    if width < 12 {
        return;
    }

    let x = area.x + area.width - width - 1;
    let mut y = area.y + 1;

    for n in app.notifications.visible(Instant::now()) {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);
        let style = app.theme.level_style(n.level);

        let block = Block::default()
            .title(format!(" {} {} ", n.level.symbol(), n.title))
            .title_style(style)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(style);

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(n.message.as_str())
                .style(Style::default())
                .block(block)
                .wrap(Wrap { trim: true }),
            toast_area,
        );
        y += TOAST_HEIGHT;
    }
}
