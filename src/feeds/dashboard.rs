//! The dashboard's three polling feeds, behind one stream control.

use std::sync::Arc;

use async_trait::async_trait;
use fraudwatch_client::BackendClient;
use fraudwatch_stream::{Feed, StreamController, StreamError, Tick};
use fraudwatch_types::StatusFilter;
use parking_lot::RwLock;
use tokio::runtime::Handle;

use super::{FeedInbox, FeedPayload, FeedSender};
use crate::config::StreamSettings;

pub const TRANSACTIONS_FEED: &str = "transactions";
pub const STATS_FEED: &str = "stats";
pub const ALERTS_FEED: &str = "alerts";

/// Status filter shared between the UI and the transactions feed.
pub type SharedFilter = Arc<RwLock<StatusFilter>>;

struct TransactionsFeed {
    client: BackendClient,
    filter: SharedFilter,
    limit: usize,
    tx: FeedSender,
}

#[async_trait]
impl Feed for TransactionsFeed {
    async fn fetch(&self, tick: Tick) -> anyhow::Result<()> {
        // Read on every tick so a filter change applies to the next fetch.
        let filter = *self.filter.read();
        let txns = self.client.transactions(filter, self.limit).await?;
        tracing::trace!(count = txns.len(), filter = filter.label(), seq = tick.seq, "transactions fetched");
        self.tx.send(tick.epoch, FeedPayload::Transactions(txns));
        Ok(())
    }
}

struct StatsFeed {
    client: BackendClient,
    tx: FeedSender,
}

#[async_trait]
impl Feed for StatsFeed {
    async fn fetch(&self, tick: Tick) -> anyhow::Result<()> {
        let stats = self.client.dashboard_stats().await?;
        self.tx.send(tick.epoch, FeedPayload::Stats(stats));
        Ok(())
    }
}

struct AlertsFeed {
    client: BackendClient,
    tx: FeedSender,
}

#[async_trait]
impl Feed for AlertsFeed {
    async fn fetch(&self, tick: Tick) -> anyhow::Result<()> {
        let alerts = self.client.alerts().await?;
        tracing::trace!(count = alerts.len(), seq = tick.seq, "alerts fetched");
        self.tx.send(tick.epoch, FeedPayload::Alerts(alerts));
        Ok(())
    }
}

/// Register the transactions, stats and alerts feeds on a new controller.
///
/// The controller is returned idle; the caller decides when to start it.
pub fn mount(
    runtime: Handle,
    client: BackendClient,
    settings: &StreamSettings,
    filter: SharedFilter,
) -> Result<(StreamController, FeedInbox), StreamError> {
    let (tx, inbox) = FeedInbox::create();
    let mut stream = StreamController::new(runtime);

    stream.register_feed(
        TRANSACTIONS_FEED,
        TransactionsFeed {
            client: client.clone(),
            filter,
            limit: settings.limit,
            tx: tx.clone(),
        },
        settings.transactions,
    )?;
    stream.register_feed(
        STATS_FEED,
        StatsFeed {
            client: client.clone(),
            tx: tx.clone(),
        },
        settings.stats,
    )?;
    stream.register_feed(ALERTS_FEED, AlertsFeed { client, tx }, settings.alerts)?;

    Ok((stream, inbox))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::FeedUpdate;
    use fraudwatch_stream::{StreamEvent, StreamState};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn fast_settings() -> StreamSettings {
        StreamSettings {
            transactions: Duration::from_millis(50),
            stats: Duration::from_millis(60),
            alerts: Duration::from_millis(70),
            autostart: true,
            limit: 10,
        }
    }

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::builder()
            .endpoint(server.base_url())
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    async fn next_update(inbox: &mut FeedInbox) -> FeedUpdate {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(update) = inbox.try_next() {
                    return update;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("no feed update within 5s")
    }

    fn mock_backend(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/api/transactions");
            then.status(200).json_body(json!({"items": [{"id": "TXN-1", "risk_score": 20}]}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/stats/dashboard");
            then.status(200).json_body(json!({"kpis": {"total_txns": 9}}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/alerts");
            then.status(200).json_body(json!([]));
        });
    }

    #[test]
    fn mount_registers_three_feeds_idle() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let client = BackendClient::builder().build().unwrap();
        let filter = SharedFilter::default();

        let (stream, _inbox) =
            mount(runtime.handle().clone(), client, &StreamSettings::default(), filter).unwrap();

        assert_eq!(stream.state(), StreamState::Idle);
        assert_eq!(stream.feed_names(), [ALERTS_FEED, STATS_FEED, TRANSACTIONS_FEED]);
        assert_eq!(stream.interval(TRANSACTIONS_FEED), Some(Duration::from_secs(2)));
        assert_eq!(stream.interval(STATS_FEED), Some(Duration::from_secs(4)));
        assert_eq!(stream.interval(ALERTS_FEED), Some(Duration::from_secs(5)));
        assert_eq!(stream.active_timers(), 0);
    }

    #[tokio::test]
    async fn running_stream_delivers_every_payload() {
        let server = MockServer::start_async().await;
        mock_backend(&server);

        let (mut stream, mut inbox) = mount(
            Handle::current(),
            client_for(&server),
            &fast_settings(),
            SharedFilter::default(),
        )
        .unwrap();
        stream.start().unwrap();

        let (mut txns, mut stats, mut alerts) = (false, false, false);
        while !(txns && stats && alerts) {
            let update = next_update(&mut inbox).await;
            assert_eq!(update.epoch, stream.epoch());
            match update.payload {
                FeedPayload::Transactions(items) => {
                    assert_eq!(items[0].id, "TXN-1");
                    txns = true;
                }
                FeedPayload::Stats(s) => {
                    assert_eq!(s.kpis.total_txns, 9);
                    stats = true;
                }
                FeedPayload::Alerts(_) => alerts = true,
            }
        }
        stream.dispose();
    }

    #[tokio::test]
    async fn filter_change_applies_to_next_fetch() {
        let server = MockServer::start_async().await;
        let blocked = server.mock(|when, then| {
            when.method(GET)
                .path("/api/transactions")
                .query_param("status", "Blocked");
            then.status(200).json_body(json!([{"id": "TXN-B", "status": "Blocked"}]));
        });

        let filter = SharedFilter::default();
        let (mut stream, mut inbox) = mount(
            Handle::current(),
            client_for(&server),
            &fast_settings(),
            filter.clone(),
        )
        .unwrap();
        stream.unregister_feed(STATS_FEED);
        stream.unregister_feed(ALERTS_FEED);

        *filter.write() = StatusFilter::Blocked;
        stream.start().unwrap();

        let update = next_update(&mut inbox).await;
        assert!(matches!(update.payload, FeedPayload::Transactions(ref t) if t[0].id == "TXN-B"));
        assert!(blocked.calls() >= 1);
        stream.dispose();
    }

    #[tokio::test]
    async fn backend_failure_is_reported_and_polling_continues() {
        let server = MockServer::start_async().await;
        let failing = server.mock(|when, then| {
            when.method(GET).path("/api/alerts");
            then.status(500).body("boom");
        });

        let (mut stream, _inbox) = mount(
            Handle::current(),
            client_for(&server),
            &fast_settings(),
            SharedFilter::default(),
        )
        .unwrap();
        stream.unregister_feed(STATS_FEED);
        stream.unregister_feed(TRANSACTIONS_FEED);
        let mut events = stream.subscribe();
        stream.start().unwrap();

        let mut failures = 0;
        tokio::time::timeout(Duration::from_secs(5), async {
            while failures < 2 {
                if let Ok(StreamEvent::FeedFailed { feed, .. }) = events.recv().await {
                    assert_eq!(feed, ALERTS_FEED);
                    failures += 1;
                }
            }
        })
        .await
        .expect("expected two failed ticks");

        assert!(stream.is_running());
        assert!(failing.calls() >= 2);
        stream.dispose();
    }
}
