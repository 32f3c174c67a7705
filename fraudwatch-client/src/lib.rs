//! # fraudwatch-client
//!
//! Async client for the fraud-monitoring backend.
//!
//! The backend is an opaque collaborator that speaks JSON over HTTP:
//!
//! - list endpoints answer `{"items": [...]}` or a bare array,
//! - action endpoints answer `{"success": bool, ...}`,
//! - export endpoints answer `{"success": true, "download_url": "..."}`.
//!
//! Every failure (transport, `success: false`, undecodable body) surfaces
//! as a [`BackendError`], so callers can treat them uniformly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fraudwatch_client::BackendClient;
//! use fraudwatch_types::StatusFilter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackendClient::builder()
//!         .endpoint("http://localhost:5001")
//!         .build()?;
//!
//!     let blocked = client.transactions(StatusFilter::Blocked, 50).await?;
//!     println!("{} blocked transactions", blocked.len());
//!
//!     if let Some(txn) = blocked.first() {
//!         client.review_transaction(&txn.id).await?;
//!     }
//!     Ok(())
//! }
//! ```

mod api;
mod client;
pub mod error;

pub use api::TransactionVerdict;
pub use client::{BackendClient, BackendClientBuilder};
pub use error::{BackendError, ErrorKind};

// Re-export types for convenience
pub use fraudwatch_types as types;
