//! Backend abstraction for pluggable table store implementations.
//!
//! GridTable talks to its store through the `TableBackend` trait, so the
//! client and scanner never depend on a concrete wire protocol. A backend
//! maps tables, point operations, batches, and the segmented query
//! primitive onto whatever its store natively offers:
//!
//! - remote wide-column services: table = table, segment = one REST page
//! - the embedded [`MemoryBackend`](crate::memory::MemoryBackend):
//!   table = a `BTreeMap`, segment = a bounded slice of key order
//!
//! ## Segmented query contract
//!
//! `query_segment` returns a bounded batch of records plus, when more data
//! remains, a continuation token that resumes the scan. A `None` token
//! signals completion. Tokens are opaque to everything above the backend.
//!
//! ## Error handling
//!
//! Implementations return `TableNotFound` for unknown tables, `Backend`
//! for transport or protocol failures, and `PreconditionFailed` for
//! if-match style rejections. Nothing in this module logs or degrades;
//! converting failures into the legacy sentinel values is the job of
//! [`CompatClient`](crate::compat::CompatClient).

use gridtable_commons::Record;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::Filter;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Largest number of records a backend returns in one segment unless it
/// advertises a different cap through `TableBackend::max_segment_size`.
pub const MAX_SEGMENT_SIZE: usize = 1000;

/// Errors that can occur at the storage boundary.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("record is missing its {0}")]
    MissingKey(&'static str),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Write mode for single and batch upserts.
///
/// `Replace` overwrites the whole property bag; `Merge` folds the non-null
/// properties of the incoming record into whatever is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertMode {
    Replace,
    Merge,
}

/// Opaque cursor returned by a segmented query when more data remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A query against one table: optional filter, optional column
/// projection, optional take cap.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    filter: Option<Filter>,
    select: Option<Vec<String>>,
    take: Option<usize>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            select: None,
            take: None,
        }
    }

    /// Restricts the query to records matching `filter`.
    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    /// Projects results down to the named columns.
    pub fn select(mut self, columns: Vec<String>) -> Self {
        self.select = Some(columns);
        self
    }

    /// Caps the number of records a single segment may return.
    pub fn take(mut self, count: usize) -> Self {
        self.take = Some(count);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn selected(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    pub fn take_count(&self) -> Option<usize> {
        self.take
    }
}

/// One bounded batch of a segmented scan.
#[derive(Debug, Clone)]
pub struct RecordSegment {
    pub records: Vec<Record>,
    pub continuation: Option<ContinuationToken>,
}

/// Capability interface every table store backend implements.
///
/// Implementations must be thread-safe; a single backend handle is shared
/// by every client built on it. All operations block the calling thread
/// for the duration of backend I/O. Timeouts, if any, are the backend's
/// own business.
pub trait TableBackend: Send + Sync {
    /// Creates `table` when it does not exist yet. Idempotent.
    fn ensure_table(&self, table: &str) -> Result<()>;

    /// Point lookup by composite key. `Ok(None)` when absent.
    fn retrieve(&self, table: &str, partition_key: &str, row_key: &str)
        -> Result<Option<Record>>;

    /// Inserts or updates a single record.
    fn upsert(&self, table: &str, record: &Record, mode: UpsertMode) -> Result<()>;

    /// Submits all records as one all-or-nothing batch.
    ///
    /// Every record must target the same partition; mixed-partition
    /// batches are rejected before any write is applied.
    fn batch_upsert(&self, table: &str, records: &[Record], mode: UpsertMode) -> Result<()>;

    /// Deletes a record by its composite key. Idempotent: deleting an
    /// absent record succeeds. When the record carries an etag, backends
    /// enforce it as an if-match precondition.
    fn delete(&self, table: &str, record: &Record) -> Result<()>;

    /// Executes one bounded segment of `query`, resuming at `token`.
    fn query_segment(
        &self,
        query: &TableQuery,
        token: Option<&ContinuationToken>,
    ) -> Result<RecordSegment>;

    /// The backend-imposed per-segment record cap.
    fn max_segment_size(&self) -> usize {
        MAX_SEGMENT_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = TableQuery::new("people")
            .with_filter(Some(Filter::equal("City", "Oslo")))
            .select(vec!["PartitionKey".to_string()])
            .take(25);

        assert_eq!(query.table(), "people");
        assert!(query.filter().is_some());
        assert_eq!(query.selected(), Some(&["PartitionKey".to_string()][..]));
        assert_eq!(query.take_count(), Some(25));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::TableNotFound("people".to_string());
        assert_eq!(err.to_string(), "table not found: people");

        let err = StoreError::MissingKey("PartitionKey");
        assert_eq!(err.to_string(), "record is missing its PartitionKey");
    }
}
