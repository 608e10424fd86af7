//! `stockia-client`
//!
//! Client-side core of the Stockia inventory application:
//! - REST bindings to the Stockia backend ([`api`])
//! - an in-memory product cache with load tickets ([`cache`])
//! - stock-movement submission with server-authoritative reconciliation
//!   ([`submitter`])
//! - the explicit application context tying them together ([`context`])
//!
//! The backend stays the system of record; nothing here persists locally.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod inflight;
pub mod reference;
pub mod session;
pub mod submitter;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpBackend, StockiaBackend};
pub use cache::{CacheState, LoadTicket, ProductCache};
pub use config::{ClientConfig, ConfigError};
pub use context::AppContext;
pub use error::{ClientError, SubmissionError};
pub use reference::ReferenceData;
pub use session::{BearerToken, Credentials, Session};
pub use submitter::{Reconciliation, SubmittedMovement};
