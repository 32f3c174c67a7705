//! Alerts view rendering.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use fraudwatch_types::Severity;

use super::live::dash_if_empty;
use crate::app::App;

/// Render pending alerts, most severe first.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let alerts = app.visible_alerts();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if alerts.is_empty() {
        let msg = if app.alerts.last_updated.is_none() {
            "No alerts fetched yet"
        } else {
            "No pending alerts"
        };
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Alerts "));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Severity"),
        Cell::from("Transaction"),
        Cell::from("Customer"),
        Cell::from("Risk"),
        Cell::from("Status"),
        Cell::from("Assigned"),
        Cell::from("Reason"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = alerts
        .iter()
        .map(|a| {
            let status = if a.escalated && a.status != "Escalated" {
                format!("{} ↑", dash_if_empty(&a.status))
            } else {
                dash_if_empty(&a.status)
            };
            Row::new(vec![
                Cell::from(a.severity.label()).style(app.theme.severity_style(a.severity)),
                Cell::from(a.transaction_id.clone()),
                Cell::from(dash_if_empty(&a.customer)),
                Cell::from(format!("{:.1}", a.risk_score))
                    .style(app.theme.risk_style(app.thresholds.classify(a.risk_score))),
                Cell::from(status),
                Cell::from(a.assigned_to.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(a.reason.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(9),  // Severity
        Constraint::Fill(2), // Transaction
        Constraint::Fill(2), // Customer
        Constraint::Min(6),  // Risk
        Constraint::Fill(1), // Status
        Constraint::Fill(1), // Assigned
        Constraint::Fill(3), // Reason
    ];

    let selected = app.selected_alert_index.min(alerts.len().saturating_sub(1));
    let critical = app.alerts.at_least(Severity::High);

    let title = format!(
        " Alerts ({}) [{} high+] [{}/{}] ",
        app.alerts.len(),
        critical,
        selected + 1,
        alerts.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
