//! # fraudwatch-stream
//!
//! Coordinates periodic dashboard feeds so they can be paused and resumed
//! together from a single control.
//!
//! A [`StreamController`] owns a set of named [`Feed`]s. While running, each
//! feed has exactly one background timer task that invokes it on a fixed
//! interval. Pausing cancels every timer; resuming re-arms them. A feed that
//! fails is reported through [`StreamEvent::FeedFailed`] and keeps ticking.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use fraudwatch_stream::{feed_fn, StreamController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = StreamController::new(tokio::runtime::Handle::current());
//!
//!     stream.register_feed(
//!         "transactions",
//!         feed_fn(|tick| async move {
//!             println!("tick {} of {}", tick.seq, tick.feed);
//!             Ok(())
//!         }),
//!         Duration::from_secs(2),
//!     )?;
//!
//!     stream.start()?;
//!     tokio::time::sleep(Duration::from_secs(5)).await;
//!
//!     // The pause button
//!     stream.toggle()?;
//!
//!     // View teardown
//!     stream.dispose();
//!     Ok(())
//! }
//! ```
//!
//! ## State machine
//!
//! ```text
//!  Idle ──start──▶ Running ──pause──▶ Paused
//!                     ▲                  │
//!                     └──start/resume────┘
//!
//!  any ──dispose──▶ Disposed (terminal)
//! ```

mod controller;
mod error;
mod event;
mod feed;

pub use controller::{StreamController, StreamState};
pub use error::StreamError;
pub use event::StreamEvent;
pub use feed::{feed_fn, Feed, FnFeed, Tick};
