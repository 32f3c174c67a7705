//! # fraudwatch-types
//!
//! Wire types shared by the fraudwatch console and its backend client.
//!
//! The backend is an external fraud-detection service. This crate only
//! describes the JSON shapes it returns so the rest of the workspace can
//! work with typed data instead of raw `serde_json::Value`s.
//!
//! ## Envelopes
//!
//! - [`ListResponse`]: list endpoints answer either `{"items": [...]}` or a
//!   bare array; both decode to the same `Vec<T>`.
//! - [`ActionResponse`]: mutating endpoints answer `{"success": bool, ...}`
//!   (some older endpoints answer `{"status": "success"}` instead).
//! - [`Download`]: export endpoints answer with a `download_url`.
//!
//! ## Example
//!
//! ```rust
//! use fraudwatch_types::{Decision, ListResponse, Transaction};
//!
//! let body = r#"{"items": [{"id": "TXN-1", "amount": 12000.0, "risk_score": 91, "status": "Blocked"}]}"#;
//! let list: ListResponse<Transaction> = serde_json::from_str(body).unwrap();
//! let txns = list.into_items();
//!
//! assert_eq!(txns[0].decision, Decision::Blocked);
//! ```

mod alert;
mod envelope;
mod stats;
mod transaction;

pub use alert::*;
pub use envelope::*;
pub use stats::*;
pub use transaction::*;
