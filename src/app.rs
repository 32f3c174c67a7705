//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::TryRecvError};

use fraudwatch_client::{BackendClient, TransactionVerdict};
use fraudwatch_stream::{StreamController, StreamEvent, StreamState};
use fraudwatch_types::{Alert, ExportFormat, StatusFilter, Transaction};

use crate::actions::{verdict_decision, ActionOutcome, ActionRunner, DashboardAction};
use crate::config::DashboardConfig;
use crate::data::{AlertBook, RiskThresholds, StatsHistory, TransactionBook};
use crate::export::Snapshot;
use crate::feeds::{self, FeedInbox, FeedPayload, FeedUpdate, SharedFilter, TRANSACTIONS_FEED};
use crate::notify::{Level, Notifications};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Transaction detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Live transaction feed.
    Live,
    /// Pending alerts.
    Alerts,
    /// Notification history.
    Activity,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Live => View::Alerts,
            View::Alerts => View::Activity,
            View::Activity => View::Live,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Live => View::Activity,
            View::Alerts => View::Live,
            View::Activity => View::Alerts,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Live => "Live",
            View::Alerts => "Alerts",
            View::Activity => "Activity",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Live stream
    stream: StreamController,
    inbox: FeedInbox,
    stream_events: broadcast::Receiver<StreamEvent>,
    status_filter: SharedFilter,
    endpoint: String,

    // Backend actions
    actions: ActionRunner,
    analyst: String,

    // Data
    pub transactions: TransactionBook,
    pub alerts: AlertBook,
    pub history: StatsHistory,
    pub thresholds: RiskThresholds,

    // Notifications
    pub notifications: Notifications,
    toggle_ttl: Duration,

    // Navigation state
    pub selected_txn_index: usize,
    pub selected_alert_index: usize,
    pub activity_offset: usize,

    // Search
    pub search_text: String,
    pub search_active: bool,

    // UI
    pub theme: Theme,
}

impl App {
    /// Mount the dashboard feeds and build the app.
    ///
    /// The stream starts right away unless `stream.autostart` is off.
    pub fn new(
        runtime: Handle,
        client: BackendClient,
        config: &DashboardConfig,
        theme: Theme,
    ) -> Result<Self> {
        let status_filter = SharedFilter::default();
        let (stream, inbox) = feeds::mount(
            runtime.clone(),
            client.clone(),
            &config.stream,
            status_filter.clone(),
        )?;
        let endpoint = client.endpoint().to_string();
        let actions = ActionRunner::new(client, runtime, config.download_dir.clone());

        let mut app = Self::from_parts(stream, inbox, status_filter, actions, config, theme);
        app.endpoint = endpoint;
        if config.stream.autostart {
            app.stream.start()?;
        }
        Ok(app)
    }

    pub(crate) fn from_parts(
        stream: StreamController,
        inbox: FeedInbox,
        status_filter: SharedFilter,
        actions: ActionRunner,
        config: &DashboardConfig,
        theme: Theme,
    ) -> Self {
        let stream_events = stream.subscribe();
        Self {
            running: true,
            current_view: View::Live,
            show_help: false,
            show_detail_overlay: false,
            stream,
            inbox,
            stream_events,
            status_filter,
            endpoint: String::new(),
            actions,
            analyst: config.analyst.clone(),
            transactions: TransactionBook::new(),
            alerts: AlertBook::new(),
            history: StatsHistory::new(),
            thresholds: config.risk,
            notifications: Notifications::new(
                config.notifications.ttl,
                config.notifications.max_visible,
            ),
            toggle_ttl: config.notifications.toggle_ttl,
            selected_txn_index: 0,
            selected_alert_index: 0,
            activity_offset: 0,
            search_text: String::new(),
            search_active: false,
            theme,
        }
    }

    /// Backend the console is connected to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn stream_state(&self) -> StreamState {
        self.stream.state()
    }

    pub fn stream(&self) -> &StreamController {
        &self.stream
    }

    pub fn status_filter(&self) -> StatusFilter {
        *self.status_filter.read()
    }

    /// Apply everything that arrived since the last call.
    ///
    /// Feed results from an earlier epoch, or that arrive while the stream is
    /// not running, are dropped. Returns how many feed updates were applied.
    pub fn pump(&mut self) -> usize {
        let now = Instant::now();

        let mut applied = 0;
        while let Some(update) = self.inbox.try_next() {
            if self.stream.is_current(update.epoch) {
                self.apply_update(update, now);
                applied += 1;
            } else {
                tracing::debug!(
                    epoch = update.epoch,
                    current = self.stream.epoch(),
                    "discarding stale feed result"
                );
            }
        }

        loop {
            match self.stream_events.try_recv() {
                Ok(event) => self.on_stream_event(event, now),
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "stream events lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        while let Some(outcome) = self.actions.try_next() {
            self.on_action_outcome(outcome);
        }

        self.notifications.prune(now);
        applied
    }

    fn apply_update(&mut self, update: FeedUpdate, now: Instant) {
        match update.payload {
            FeedPayload::Transactions(items) => {
                self.transactions.replace(items, now);
                self.clamp_selection();
            }
            FeedPayload::Stats(stats) => self.history.record(stats, now),
            FeedPayload::Alerts(items) => {
                self.alerts.replace(items, now);
                self.clamp_selection();
            }
        }
    }

    fn on_stream_event(&mut self, event: StreamEvent, now: Instant) {
        match event {
            StreamEvent::Started { resumed, .. } => {
                let message = if resumed {
                    "Live stream resumed"
                } else {
                    "Live stream started"
                };
                self.notifications.push(Level::Info, "Stream", message, self.toggle_ttl, now);
            }
            StreamEvent::Paused { .. } => {
                self.notifications
                    .push(Level::Info, "Stream", "Live stream paused", self.toggle_ttl, now);
            }
            StreamEvent::Disposed => tracing::debug!("stream disposed"),
            StreamEvent::FeedFailed { feed, epoch, error, .. } => {
                if !self.stream.is_current(epoch) {
                    tracing::debug!(
                        feed = %feed,
                        epoch,
                        error = %error,
                        "dropping failure from an earlier run"
                    );
                    return;
                }
                self.notifications.error("Feed error", format!("{}: {}", feed, error));
            }
        }
    }

    fn on_action_outcome(&mut self, outcome: ActionOutcome) {
        let title = outcome.action.title();
        match outcome.result {
            Ok(report) => {
                self.apply_action_locally(&outcome.action);
                self.notifications.success(title, report.message);
            }
            Err(err) => {
                self.notifications.error(title, err.to_string());
            }
        }
    }

    fn apply_action_locally(&mut self, action: &DashboardAction) {
        match action {
            DashboardAction::Judge {
                transaction_id,
                verdict,
            } => {
                self.transactions
                    .apply_decision(transaction_id, verdict_decision(*verdict));
            }
            DashboardAction::Escalate { alert_id } => {
                self.alerts.mark_escalated(alert_id);
            }
            DashboardAction::Assign { alert_id, user } => {
                self.alerts.assign(alert_id, user);
            }
            DashboardAction::Resolve {
                transaction_id,
                decision,
            } => {
                self.alerts.resolve(transaction_id);
                self.transactions.apply_decision(transaction_id, *decision);
                self.clamp_selection();
            }
            DashboardAction::ExportTransactions { .. }
            | DashboardAction::ExportAudit { .. }
            | DashboardAction::GenerateReport { .. } => {}
        }
    }

    /// The pause/resume button. Returns the resulting state.
    pub fn toggle_stream(&mut self) -> StreamState {
        if let Err(err) = self.stream.toggle() {
            self.notifications.error("Stream", err.to_string());
        }
        self.stream.state()
    }

    /// Fetch every feed now instead of waiting for the next tick.
    pub fn refresh(&mut self) {
        if !self.stream.is_running() {
            self.notifications.info("Stream", "Stream is paused, resume to refresh");
            return;
        }
        if let Err(err) = self.stream.poll_all() {
            self.notifications.error("Refresh", err.to_string());
        }
    }

    /// Switch the server-side status filter and refetch transactions.
    pub fn cycle_status_filter(&mut self) {
        let next = {
            let mut filter = self.status_filter.write();
            *filter = filter.next();
            *filter
        };
        self.selected_txn_index = 0;
        tracing::debug!(filter = next.label(), "status filter changed");

        if self.stream.is_running() {
            if let Err(err) = self.stream.poll_now(TRANSACTIONS_FEED) {
                self.notifications.error("Refresh", err.to_string());
            }
        }
    }

    /// Transactions shown in the Live view, after filter and search.
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        self.transactions.visible(self.status_filter(), &self.search_text)
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.visible_transactions().get(self.selected_txn_index).copied()
    }

    /// Alerts shown in the Alerts view, after search.
    pub fn visible_alerts(&self) -> Vec<&Alert> {
        let search = self.search_text.to_lowercase();
        self.alerts
            .all()
            .iter()
            .filter(|a| {
                search.is_empty()
                    || a.transaction_id.to_lowercase().contains(&search)
                    || a.customer.to_lowercase().contains(&search)
            })
            .collect()
    }

    pub fn selected_alert(&self) -> Option<&Alert> {
        self.visible_alerts().get(self.selected_alert_index).copied()
    }

    /// Act on the selection with approve/block/review.
    ///
    /// In the Alerts view approve and block resolve the selected alert.
    pub fn judge_selected(&mut self, verdict: TransactionVerdict) {
        let action = match self.current_view {
            View::Live => self.selected_transaction().map(|t| DashboardAction::Judge {
                transaction_id: t.id.clone(),
                verdict,
            }),
            View::Alerts if verdict != TransactionVerdict::Review => {
                self.selected_alert().map(|a| DashboardAction::Resolve {
                    transaction_id: a.transaction_id.clone(),
                    decision: verdict_decision(verdict),
                })
            }
            _ => None,
        };
        self.dispatch_or_hint(action);
    }

    pub fn escalate_selected(&mut self) {
        let action = self.selected_alert().map(|a| DashboardAction::Escalate {
            alert_id: a.id.clone(),
        });
        self.dispatch_or_hint(action);
    }

    /// Assign the selected alert to the configured analyst.
    pub fn assign_selected(&mut self) {
        let action = self.selected_alert().map(|a| DashboardAction::Assign {
            alert_id: a.id.clone(),
            user: self.analyst.clone(),
        });
        self.dispatch_or_hint(action);
    }

    pub fn export_transactions(&mut self) {
        let filter = self.status_filter();
        self.dispatch(DashboardAction::ExportTransactions {
            format: ExportFormat::Csv,
            filter,
        });
    }

    pub fn export_audit_log(&mut self) {
        self.dispatch(DashboardAction::ExportAudit {
            format: ExportFormat::Pdf,
        });
    }

    pub fn generate_report(&mut self) {
        self.dispatch(DashboardAction::GenerateReport {
            name: "Fraud Summary".to_string(),
            format: ExportFormat::Pdf,
        });
    }

    fn dispatch(&mut self, action: DashboardAction) {
        self.actions.dispatch(action);
    }

    fn dispatch_or_hint(&mut self, action: Option<DashboardAction>) {
        match action {
            Some(action) => self.dispatch(action),
            None => {
                self.notifications.info("Nothing selected", "Select a row first");
            }
        }
    }

    /// Write what is on screen to a local JSON file.
    pub fn write_snapshot(&mut self, path: &Path) {
        let snapshot = Snapshot::build(
            self.history.latest(),
            self.transactions.all(),
            self.alerts.all(),
            &self.thresholds,
        );
        match snapshot.write_to(path) {
            Ok(()) => {
                self.notifications
                    .success("Snapshot", format!("Exported to {}", path.display()));
            }
            Err(e) => {
                self.notifications.error("Snapshot", format!("Export failed: {}", e));
            }
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss_latest();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        let index = self.selection_mut();
        *index = (*index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let index = self.selection_mut();
        *index = index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.selection_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.row_count().saturating_sub(1);
        *self.selection_mut() = last;
    }

    fn row_count(&self) -> usize {
        match self.current_view {
            View::Live => self.visible_transactions().len(),
            View::Alerts => self.visible_alerts().len(),
            View::Activity => self.notifications.history().len(),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Live => &mut self.selected_txn_index,
            View::Alerts => &mut self.selected_alert_index,
            View::Activity => &mut self.activity_offset,
        }
    }

    fn clamp_selection(&mut self) {
        let txns = self.visible_transactions().len();
        let alerts = self.visible_alerts().len();
        self.selected_txn_index = self.selected_txn_index.min(txns.saturating_sub(1));
        self.selected_alert_index = self.selected_alert_index.min(alerts.saturating_sub(1));
    }

    /// Open the detail overlay for the selected transaction.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Live && self.selected_transaction().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then go to Live.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else {
            self.current_view = View::Live;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter search input mode (starts capturing keystrokes).
    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    /// Exit search input mode without clearing the search text.
    pub fn cancel_search(&mut self) {
        self.search_active = false;
    }

    /// Clear the search text and exit search mode.
    pub fn clear_search(&mut self) {
        self.search_text.clear();
        self.search_active = false;
        self.clamp_selection();
    }

    /// Append a character to the search text.
    pub fn search_push(&mut self, c: char) {
        self.search_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the search text.
    pub fn search_pop(&mut self) {
        self.search_text.pop();
        self.clamp_selection();
    }

    /// Stop the stream and leave the main loop.
    pub fn quit(&mut self) {
        self.stream.dispose();
        self.running = false;
    }
}

#[cfg(test)]
impl App {
    /// An app with no feeds registered, fed by hand through the returned sender.
    pub(crate) fn detached(client: BackendClient) -> (Self, crate::feeds::FeedSender) {
        let (tx, inbox) = FeedInbox::create();
        let stream = StreamController::new(Handle::current());
        let actions = ActionRunner::new(client, Handle::current(), None);
        let app = Self::from_parts(
            stream,
            inbox,
            SharedFilter::default(),
            actions,
            &DashboardConfig::default(),
            Theme::dark(),
        );
        (app, tx)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stream.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::FeedSender;
    use fraudwatch_types::Decision;
    use httpmock::prelude::*;
    use serde_json::json;

    struct Harness {
        app: App,
        tx: FeedSender,
    }

    fn harness(client: BackendClient) -> Harness {
        let (app, tx) = App::detached(client);
        Harness { app, tx }
    }

    fn offline() -> BackendClient {
        BackendClient::builder().build().unwrap()
    }

    fn txns(ids: &[&str]) -> FeedPayload {
        FeedPayload::Transactions(
            ids.iter()
                .map(|id| Transaction::new(*id, 100.0, 50.0))
                .collect(),
        )
    }

    fn titles(app: &App) -> Vec<String> {
        app.notifications
            .visible(Instant::now())
            .iter()
            .map(|n| format!("{}: {}", n.title, n.message))
            .collect()
    }

    async fn pump_until(app: &mut App, mut done: impl FnMut(&App) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                app.pump();
                if done(app) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached within 5s");
    }

    #[tokio::test]
    async fn stale_results_are_discarded() {
        let Harness { mut app, tx } = harness(offline());

        app.toggle_stream();
        let running_epoch = app.stream().epoch();
        tx.send(running_epoch, txns(&["T1"]));
        assert_eq!(app.pump(), 1);
        assert_eq!(app.transactions.len(), 1);

        // In flight when the pause happened.
        app.toggle_stream();
        tx.send(running_epoch, txns(&["T1", "T2"]));
        tx.send(app.stream().epoch(), txns(&["T1", "T2", "T3"]));
        assert_eq!(app.pump(), 0);
        assert_eq!(app.transactions.len(), 1);

        app.toggle_stream();
        tx.send(app.stream().epoch(), txns(&["T9"]));
        assert_eq!(app.pump(), 1);
        assert!(app.transactions.get("T9").is_some());
    }

    #[tokio::test]
    async fn toggle_shows_notification_and_label() {
        let Harness { mut app, .. } = harness(offline());

        assert_eq!(app.toggle_stream(), StreamState::Running);
        app.pump();
        assert_eq!(titles(&app), ["Stream: Live stream started"]);

        assert_eq!(app.toggle_stream(), StreamState::Paused);
        assert_eq!(app.stream_state().label(), "Paused");
        app.pump();
        assert!(titles(&app).contains(&"Stream: Live stream paused".to_string()));

        assert_eq!(app.toggle_stream(), StreamState::Running);
        app.pump();
        assert!(titles(&app).contains(&"Stream: Live stream resumed".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn feed_failure_becomes_error_notification() {
        let Harness { mut app, .. } = harness(offline());
        app.stream
            .register_fn("transactions", Duration::from_secs(2), |_| async {
                Err(anyhow::anyhow!("backend down"))
            })
            .unwrap();

        app.toggle_stream();
        tokio::time::sleep(Duration::from_millis(2_050)).await;
        app.pump();

        assert!(titles(&app).contains(&"Feed error: transactions: backend down".to_string()));
        assert!(app.stream().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_landing_after_pause_is_dropped() {
        let Harness { mut app, .. } = harness(offline());
        app.stream
            .register_fn("transactions", Duration::from_secs(2), |_| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Err(anyhow::anyhow!("late failure"))
            })
            .unwrap();

        app.toggle_stream();
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        app.toggle_stream();
        tokio::time::sleep(Duration::from_secs(1)).await;
        app.pump();

        assert_eq!(app.stream_state(), StreamState::Paused);
        assert!(!app.notifications.history().any(|n| n.level == Level::Error));
    }

    #[tokio::test]
    async fn refresh_while_paused_only_hints() {
        let Harness { mut app, .. } = harness(offline());
        app.refresh();
        assert_eq!(titles(&app), ["Stream: Stream is paused, resume to refresh"]);
    }

    #[tokio::test]
    async fn cycle_filter_updates_shared_filter() {
        let Harness { mut app, tx } = harness(offline());
        app.toggle_stream();
        let mut items = Vec::new();
        for (id, decision) in [("T1", Decision::Approved), ("T2", Decision::Blocked)] {
            let mut t = Transaction::new(id, 1.0, 1.0);
            t.decision = decision;
            items.push(t);
        }
        tx.send(app.stream().epoch(), FeedPayload::Transactions(items));
        app.pump();
        app.selected_txn_index = 1;

        app.cycle_status_filter();
        assert_eq!(app.status_filter(), StatusFilter::Blocked);
        assert_eq!(app.selected_txn_index, 0);
        assert_eq!(app.selected_transaction().unwrap().id, "T2");
    }

    #[tokio::test]
    async fn filter_refetch_failure_is_reported() {
        let Harness { mut app, .. } = harness(offline());
        app.toggle_stream();

        // Nothing is mounted under the transactions name.
        app.cycle_status_filter();
        let refresh = app.notifications.history().find(|n| n.title == "Refresh").unwrap();
        assert_eq!(refresh.level, Level::Error);
        assert!(refresh.message.contains("transactions"));
    }

    #[tokio::test]
    async fn successful_action_updates_local_state() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/transactions/T1/block");
            then.status(200)
                .json_body(json!({"success": true, "message": "Transaction blocked"}));
        });
        let client = BackendClient::builder().endpoint(server.base_url()).build().unwrap();
        let Harness { mut app, tx } = harness(client);

        app.toggle_stream();
        tx.send(app.stream().epoch(), txns(&["T1"]));
        app.pump();

        app.judge_selected(TransactionVerdict::Block);
        pump_until(&mut app, |app| {
            app.transactions.get("T1").unwrap().decision == Decision::Blocked
        })
        .await;
        assert!(titles(&app).contains(&"Block transaction: Transaction blocked".to_string()));
    }

    #[tokio::test]
    async fn failed_action_leaves_state_alone() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PATCH).path("/api/alerts/T1");
            then.status(200)
                .json_body(json!({"success": false, "message": "Alert not found"}));
        });
        let client = BackendClient::builder().endpoint(server.base_url()).build().unwrap();
        let Harness { mut app, tx } = harness(client);

        app.toggle_stream();
        tx.send(
            app.stream().epoch(),
            FeedPayload::Alerts(vec![Alert::new("a1", "T1")]),
        );
        app.pump();

        app.set_view(View::Alerts);
        app.judge_selected(TransactionVerdict::Approve);
        pump_until(&mut app, |app| {
            app.notifications.history().any(|n| n.level == Level::Error)
        })
        .await;

        assert_eq!(app.alerts.len(), 1);
        assert!(titles(&app).contains(&"Resolve alert: Alert not found".to_string()));
    }

    #[tokio::test]
    async fn action_without_selection_hints() {
        let Harness { mut app, .. } = harness(offline());
        app.escalate_selected();
        assert_eq!(titles(&app), ["Nothing selected: Select a row first"]);
    }

    #[tokio::test]
    async fn selection_is_clamped_to_rows() {
        let Harness { mut app, tx } = harness(offline());
        app.toggle_stream();
        tx.send(app.stream().epoch(), txns(&["T1", "T2", "T3"]));
        app.pump();

        app.select_last();
        assert_eq!(app.selected_txn_index, 2);
        app.select_next_n(10);
        assert_eq!(app.selected_txn_index, 2);

        tx.send(app.stream().epoch(), txns(&["T1"]));
        app.pump();
        assert_eq!(app.selected_txn_index, 0);
    }

    #[tokio::test]
    async fn quit_disposes_stream() {
        let Harness { mut app, .. } = harness(offline());
        app.toggle_stream();
        app.quit();
        assert!(!app.running);
        assert_eq!(app.stream_state(), StreamState::Disposed);
        assert_eq!(app.stream().active_timers(), 0);
    }

    #[tokio::test]
    async fn snapshot_written_and_notified() {
        let Harness { mut app, .. } = harness(offline());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");

        app.write_snapshot(&path);

        assert!(path.exists());
        assert_eq!(app.notifications.history().last().unwrap().level, Level::Success);
    }
}
