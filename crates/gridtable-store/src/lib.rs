//! # gridtable-store
//!
//! Storage layer of GridTable: a generic access layer over a partitioned,
//! two-key wide-column table store. The store itself is external and
//! pluggable; this crate supplies everything between a typed entity and
//! the backend's segmented-scan primitive.
//!
//! ## Architecture
//!
//! ```text
//! TableClient<E> / CompatClient<E>   ← typed CRUD, queries, paging (client.rs, compat.rs)
//!     ↓
//! scanner                            ← continuation-token scan loops (scanner.rs)
//!     ↓
//! Filter / TableQuery                ← predicate and query building (filter.rs, backend.rs)
//!     ↓
//! TableBackend                       ← capability trait (backend.rs)
//!     ↓
//! MemoryBackend / remote stores      ← implementations (memory.rs, out-of-tree)
//! ```
//!
//! The client surface returns `Result` with explicit [`StoreError`]
//! variants. The legacy behavior, where every failure degrades to a
//! sentinel value after logging, lives in [`CompatClient`].

pub mod backend;
pub mod client;
pub mod compat;
pub mod entity;
pub mod filter;
pub mod memory;
pub mod scanner;

// Available to dependent crates' tests as well.
pub mod test_utils;

pub use backend::{
    ContinuationToken, RecordSegment, Result, StoreError, TableBackend, TableQuery, UpsertMode,
    MAX_SEGMENT_SIZE,
};
pub use client::TableClient;
pub use compat::CompatClient;
pub use entity::TableEntity;
pub use filter::Filter;
pub use memory::MemoryBackend;

// Re-export the shared value types so most callers need one import.
pub use gridtable_commons::{PageResponse, Record, PARTITION_KEY, ROW_KEY};
