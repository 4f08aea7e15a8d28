//! # gridtable-commons
//!
//! Shared value types for GridTable. This crate holds the wire-level
//! `Record` property bag, the Bootgrid-style `PageResponse` envelope, and
//! the connection configuration read from the process environment. It
//! performs no I/O, so both the storage layer (`gridtable-store`) and the
//! model facade (`gridtable-service`) can depend on it without pulling in
//! a backend.
//!
//! ## Architecture
//!
//! ```text
//! gridtable-service (model facade)
//!     ↓
//! gridtable-store (client, scanner, backends)
//!     ↓
//! gridtable-commons (records, pages, config)   ← this crate
//! ```

pub mod config;
pub mod page;
pub mod record;

pub use config::{ConfigError, StoreConfig};
pub use page::PageResponse;
pub use record::{Record, PARTITION_KEY, ROW_KEY};
