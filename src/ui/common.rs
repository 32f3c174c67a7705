//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_age;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the header bar with the KPI overview and stream state.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.stream_state();
    let mut spans = vec![
        Span::styled(" ● ", app.theme.stream_style(state)),
        Span::styled("FRAUDWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(state.label(), app.theme.stream_style(state)),
        Span::raw(" │ "),
    ];

    let Some(stats) = app.history.latest() else {
        spans.push(Span::raw(format!("Connecting to {}...", app.endpoint())));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    };
    let kpis = &stats.kpis;

    let dim_zero = |n: u64, style: Style| {
        if n > 0 {
            Span::styled(format_count(n), style)
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    spans.extend([
        Span::styled(format_count(kpis.total_txns), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" txns "),
        dim_zero(kpis.approved, Style::default().fg(app.theme.healthy)),
        Span::raw(" ok "),
        dim_zero(kpis.review, Style::default().fg(app.theme.warning)),
        Span::raw(" review "),
        dim_zero(
            kpis.blocked,
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" blocked │ risk "),
        Span::styled(
            format!("{:.1}", kpis.avg_risk),
            app.theme.risk_style(app.thresholds.classify(kpis.avg_risk)),
        ),
        Span::raw(format!(" {} │ fraud ", sparkline(&app.history.risk_sparkline()))),
        Span::raw(format!("{:.1}%", kpis.fraud_rate)),
        Span::raw(format!(" {} │ ", sparkline(&app.history.fraud_rate_sparkline()))),
        dim_zero(kpis.alerts, Style::default().fg(app.theme.warning)),
        Span::raw(" alerts"),
    ]);

    if let Some(rate) = app.history.txn_rate() {
        spans.push(Span::raw(format!(" │ {:.1}/s", rate)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub(crate) fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Last eight samples as block characters.
pub(crate) fn sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string();
    }

    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();
    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Live "),
        Line::from(format!(" 2:Alerts ({}) ", app.alerts.len())),
        Line::from(" 3:Activity "),
    ];

    let selected = match app.current_view {
        View::Live => 0,
        View::Alerts => 1,
        View::Activity => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the stream state, the active filter, data age and the controls
/// for the current view.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.stream_state();

    if app.search_active {
        let line = Line::from(vec![
            Span::styled(format!(" {} ", state.label()), app.theme.stream_style(state)),
            Span::raw(format!("| /{}_ | Enter:apply Esc:cancel", app.search_text)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let toggle = if app.stream().is_running() {
        "p:pause"
    } else {
        "p:resume"
    };

    let controls = match app.current_view {
        View::Live => "a/b/v:approve/block/review f:filter Enter:detail",
        View::Alerts => "a/b:resolve x:escalate g:assign",
        View::Activity => "↑↓:scroll d:dismiss",
    };

    let age = app
        .transactions
        .last_updated
        .map(|at| format!("Updated {}", format_age(Instant::now().saturating_duration_since(at))))
        .unwrap_or_else(|| "No data yet".to_string());

    let line = Line::from(vec![
        Span::styled(format!(" {} ", state.label()), app.theme.stream_style(state)),
        Span::styled(
            format!(
                "| {} | filter:{} | {} {} r:refresh ?:help q:quit",
                age,
                app.status_filter().label(),
                controls,
                toggle,
            ),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Stream"),
        Line::from("  p/Space     Pause or resume"),
        Line::from("  r           Refresh now"),
        Line::from("  f           Cycle status filter"),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Enter/Esc   Open/close detail"),
        Line::from("  /  c        Search, clear search"),
        Line::from(""),
        section(" Actions"),
        Line::from("  a/b/v       Approve/block/review"),
        Line::from("  x  g        Escalate, assign alert"),
        Line::from("  e  E  R     Export CSV, audit, report"),
        Line::from("  w           Write local snapshot"),
        Line::from(""),
        section(" General"),
        Line::from("  d  t        Dismiss toast, theme"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 29u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_abbreviated() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn sparkline_keeps_last_eight() {
        assert_eq!(sparkline(&[]), "        ");
        assert_eq!(sparkline(&[0, 7]), "▁█");
        assert_eq!(sparkline(&[7, 7, 0, 1, 2, 3, 4, 5, 6, 7]), "▁▂▃▄▅▆▇█");
    }
}
