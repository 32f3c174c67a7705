//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything known about the selected
//! transaction, plus the alert raised for it if there is one.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the transaction detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(txn) = app.selected_transaction() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Min(10),   // Fields
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let level = app.thresholds.classify(txn.risk_score);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {:<12}", name), Style::default().add_modifier(Modifier::DIM)),
            Span::raw(value),
        ])
    };
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    let mut lines = vec![
        Line::from(vec![Span::styled(format!(" {} ", txn.id), bold)]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Risk: "),
            Span::styled(
                format!("{:.1} {}", txn.risk_score, level.symbol()),
                app.theme.risk_style(level).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Decision: "),
            Span::styled(txn.decision.label(), app.theme.decision_style(txn.decision)),
        ]),
        Line::from(""),
        field("Customer", or_dash(&txn.customer)),
        field("Amount", format!("{:.2}", txn.amount)),
        field("Type", or_dash(&txn.kind)),
        field("Channel", or_dash(&txn.channel)),
        field("Location", or_dash(&txn.location)),
        field("Time", txn.timestamp.clone().unwrap_or_else(|| "-".to_string())),
        field("Reason", txn.reason.clone().unwrap_or_else(|| "-".to_string())),
    ];

    if let Some(alert) = app.alerts.all().iter().find(|a| a.transaction_id == txn.id) {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Alert ", bold),
            Span::styled(alert.severity.label(), app.theme.severity_style(alert.severity)),
            Span::raw(format!(
                "  {}  assigned: {}",
                or_dash(&alert.status),
                alert.assigned_to.as_deref().unwrap_or("-")
            )),
        ]));
    }

    let block = Block::default()
        .title(" Transaction Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let body = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[0]);

    let footer = Paragraph::new(" a:approve b:block v:review ↑↓:next Esc:close")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[1]);
}
