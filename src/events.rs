use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use fraudwatch_client::TransactionVerdict;

use crate::app::{App, View};

/// Where `w` writes the local snapshot.
const SNAPSHOT_PATH: &str = "fraudwatch_snapshot.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through transactions while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('a') => app.judge_selected(TransactionVerdict::Approve),
            KeyCode::Char('b') => app.judge_selected(TransactionVerdict::Block),
            KeyCode::Char('v') => app.judge_selected(TransactionVerdict::Review),
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                app.toggle_stream();
            }
            _ => {}
        }
        return;
    }

    // If search input is active, handle text input
    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Stream control
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.toggle_stream();
        }
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('f') => app.cycle_status_filter(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Live),
        KeyCode::Char('2') => app.set_view(View::Alerts),
        KeyCode::Char('3') => app.set_view(View::Activity),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Analyst actions
        KeyCode::Char('a') => app.judge_selected(TransactionVerdict::Approve),
        KeyCode::Char('b') => app.judge_selected(TransactionVerdict::Block),
        KeyCode::Char('v') => app.judge_selected(TransactionVerdict::Review),
        KeyCode::Char('x') => app.escalate_selected(),
        KeyCode::Char('g') => app.assign_selected(),

        // Exports
        KeyCode::Char('e') => app.export_transactions(),
        KeyCode::Char('E') => app.export_audit_log(),
        KeyCode::Char('R') => app.generate_report(),
        KeyCode::Char('w') => app.write_snapshot(&PathBuf::from(SNAPSHOT_PATH)),

        // Search
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('c') => {
            if !app.search_text.is_empty() {
                app.clear_search();
            }
        }

        KeyCode::Char('d') => app.dismiss_notification(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while search is active
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm search
        KeyCode::Enter => {
            app.search_active = false;
        }

        // Cancel search (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_search();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_search();
        }

        KeyCode::Backspace => {
            app.search_pop();
            if app.search_text.is_empty() {
                app.search_active = false;
            }
        }

        KeyCode::Char(c) => {
            app.search_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.select_prev();
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
        }

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;

                match app.current_view {
                    View::Live => {
                        if item_row < app.visible_transactions().len() {
                            app.selected_txn_index = item_row;
                        }
                    }
                    View::Alerts => {
                        if item_row < app.visible_alerts().len() {
                            app.selected_alert_index = item_row;
                        }
                    }
                    View::Activity => {}
                }
            }

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Live (0-8), Alerts (9-24), Activity (25-38)
                if col < 9 {
                    app.set_view(View::Live);
                } else if col < 25 {
                    app.set_view(View::Alerts);
                } else if col < 39 {
                    app.set_view(View::Activity);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => {
            app.go_back();
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::FeedPayload;
    use fraudwatch_client::BackendClient;
    use fraudwatch_stream::StreamState;
    use fraudwatch_types::{StatusFilter, Transaction};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn app() -> App {
        App::detached(BackendClient::builder().build().unwrap()).0
    }

    #[tokio::test]
    async fn space_and_p_toggle_the_stream() {
        let mut app = app();
        handle_key_event(&mut app, key(' '));
        assert_eq!(app.stream_state(), StreamState::Running);
        handle_key_event(&mut app, key('p'));
        assert_eq!(app.stream_state(), StreamState::Paused);
        handle_key_event(&mut app, key('p'));
        assert_eq!(app.stream_state(), StreamState::Running);
    }

    #[tokio::test]
    async fn help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key('?'));
        assert!(app.show_help);
        handle_key_event(&mut app, key('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[tokio::test]
    async fn search_mode_captures_letters() {
        let mut app = app();
        handle_key_event(&mut app, key('/'));
        for c in "pq".chars() {
            handle_key_event(&mut app, key(c));
        }
        assert_eq!(app.search_text, "pq");
        assert!(app.running);
        assert_eq!(app.stream_state(), StreamState::Idle);

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        handle_key_event(&mut app, key('c'));
        assert!(app.search_text.is_empty());
    }

    #[tokio::test]
    async fn filter_key_cycles_status_filter() {
        let mut app = app();
        handle_key_event(&mut app, key('f'));
        handle_key_event(&mut app, key('f'));
        assert_eq!(app.status_filter(), StatusFilter::Review);
    }

    #[tokio::test]
    async fn enter_opens_detail_only_with_selection() {
        let (mut app, tx) = App::detached(BackendClient::builder().build().unwrap());
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(!app.show_detail_overlay);

        app.toggle_stream();
        tx.send(
            app.stream().epoch(),
            FeedPayload::Transactions(vec![Transaction::new("T1", 5.0, 5.0)]),
        );
        app.pump();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(app.show_detail_overlay);

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.show_detail_overlay);
    }

    #[tokio::test]
    async fn quit_key_stops_app() {
        let mut app = app();
        handle_key_event(&mut app, key('q'));
        assert!(!app.running);
        assert_eq!(app.stream_state(), StreamState::Disposed);
    }
}
