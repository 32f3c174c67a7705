//! Live view rendering.
//!
//! Displays the latest transactions from the stream with risk and decision
//! coloring.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use fraudwatch_stream::StreamState;

use crate::app::App;

/// Render the Live view showing the transaction feed.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let transactions = app.visible_transactions();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.transactions.last_updated.is_none() {
        let msg = match app.stream_state() {
            StreamState::Running => "Waiting for the first update...",
            _ => "Stream is not running. Press p to start.",
        };
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Transactions "));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Transaction"),
        Cell::from("Customer"),
        Cell::from("Amount"),
        Cell::from("Channel"),
        Cell::from("Location"),
        Cell::from("Risk"),
        Cell::from("Decision"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = transactions
        .iter()
        .map(|t| {
            let level = app.thresholds.classify(t.risk_score);
            Row::new(vec![
                Cell::from(t.id.clone()),
                Cell::from(dash_if_empty(&t.customer)),
                Cell::from(format!("{:.2}", t.amount)),
                Cell::from(dash_if_empty(&t.channel)),
                Cell::from(dash_if_empty(&t.location)),
                Cell::from(format!("{:>5.1} {}", t.risk_score, level.symbol()))
                    .style(app.theme.risk_style(level)),
                Cell::from(t.decision.label()).style(app.theme.decision_style(t.decision)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2), // Transaction
        Constraint::Fill(2), // Customer
        Constraint::Fill(1), // Amount
        Constraint::Fill(1), // Channel
        Constraint::Fill(2), // Location
        Constraint::Min(11), // Risk
        Constraint::Min(9),  // Decision
    ];

    let selected = app.selected_txn_index.min(transactions.len().saturating_sub(1));

    let search_info = if !app.search_text.is_empty() {
        format!(" /{}/ [c:clear]", app.search_text)
    } else {
        String::new()
    };

    let position_info = if !transactions.is_empty() {
        format!(" [{}/{}]", selected + 1, transactions.len())
    } else {
        String::new()
    };

    let title = format!(
        " Transactions ({}/{}) [f:{}]{}{} ",
        transactions.len(),
        app.transactions.len(),
        app.status_filter().label(),
        search_info,
        position_info
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

pub(crate) fn dash_if_empty(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
