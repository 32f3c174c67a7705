//! # fraudwatch
//!
//! A terminal console for a fraud-monitoring backend.
//!
//! The console polls three feeds (transactions, dashboard stats and alerts)
//! on independent intervals. All of them hang off a single
//! [`StreamController`](fraudwatch_stream::StreamController), so one key
//! pauses or resumes the whole live stream.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │ (books)  │    │(ratatui)│    │          │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘  │
//! │       │ pump()                                               │
//! │       ▼                                                      │
//! │  ┌─────────┐   epoch-tagged   ┌────────────────────────────┐ │
//! │  │  feeds  │◀──── results ────│ StreamController (tokio)   │ │
//! │  │ actions │                  │ transactions | stats | ... │ │
//! │  └─────────┘                  └────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: application state, navigation and the pump that applies
//!   feed results, stream events and action outcomes
//! - **[`feeds`]**: the dashboard feeds mounted on a stream controller
//! - **[`actions`]**: analyst actions (approve, block, escalate, exports)
//! - **[`data`]**: transaction and alert books, stats history, risk
//!   thresholds
//! - **[`notify`]**: toast notifications and their history
//! - **[`config`]**: layered configuration
//! - **[`ui`]**: rendering with ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Connect to a local backend
//! fraudwatch --backend http://localhost:5001
//!
//! # Start paused, poll transactions every 500ms once resumed
//! fraudwatch --paused --interval 500ms
//!
//! # Write a one-off JSON snapshot and exit
//! fraudwatch --export snapshot.json
//! ```
//!
//! ### Mounting the feeds without the UI
//!
//! ```no_run
//! use fraudwatch::config::DashboardConfig;
//! use fraudwatch::feeds::{self, SharedFilter};
//! use fraudwatch_client::BackendClient;
//!
//! # tokio_test::block_on(async {
//! let config = DashboardConfig::default();
//! let client = BackendClient::builder()
//!     .endpoint(config.backend.url.clone())
//!     .build()?;
//!
//! let (mut stream, mut inbox) = feeds::mount(
//!     tokio::runtime::Handle::current(),
//!     client,
//!     &config.stream,
//!     SharedFilter::default(),
//! )?;
//! stream.start()?;
//!
//! tokio::time::sleep(config.stream.transactions * 2).await;
//! while let Some(update) = inbox.try_next() {
//!     if stream.is_current(update.epoch) {
//!         println!("{:?}", update.payload);
//!     }
//! }
//! stream.dispose();
//! # Ok::<_, anyhow::Error>(())
//! # }).unwrap();
//! ```

pub mod actions;
pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod feeds;
pub mod notify;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use self::config::{DashboardConfig, Overrides};
pub use data::{AlertBook, RiskLevel, RiskThresholds, StatsHistory, TransactionBook};
pub use notify::{Level, Notification, Notifications};
