//! Test utilities for gridtable-store and dependent crates.
//!
//! Everything here wraps a real backend, usually a
//! [`MemoryBackend`](crate::memory::MemoryBackend), to observe or disturb
//! the segmented scan path from the outside.

use gridtable_commons::Record;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::backend::{
    ContinuationToken, RecordSegment, Result, StoreError, TableBackend, TableQuery, UpsertMode,
};

/// Delegating backend that fails the Nth `query_segment` call (1-based).
/// All other operations pass straight through.
pub struct FailingBackend {
    inner: Arc<dyn TableBackend>,
    fail_on_call: usize,
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn new(inner: Arc<dyn TableBackend>, fail_on_call: usize) -> Self {
        Self {
            inner,
            fail_on_call,
            calls: AtomicUsize::new(0),
        }
    }
}

impl TableBackend for FailingBackend {
    fn ensure_table(&self, table: &str) -> Result<()> {
        self.inner.ensure_table(table)
    }

    fn retrieve(&self, table: &str, partition_key: &str, row_key: &str)
        -> Result<Option<Record>> {
        self.inner.retrieve(table, partition_key, row_key)
    }

    fn upsert(&self, table: &str, record: &Record, mode: UpsertMode) -> Result<()> {
        self.inner.upsert(table, record, mode)
    }

    fn batch_upsert(&self, table: &str, records: &[Record], mode: UpsertMode) -> Result<()> {
        self.inner.batch_upsert(table, records, mode)
    }

    fn delete(&self, table: &str, record: &Record) -> Result<()> {
        self.inner.delete(table, record)
    }

    fn query_segment(
        &self,
        query: &TableQuery,
        token: Option<&ContinuationToken>,
    ) -> Result<RecordSegment> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on_call {
            return Err(StoreError::Backend("injected segment failure".into()));
        }
        self.inner.query_segment(query, token)
    }

    fn max_segment_size(&self) -> usize {
        self.inner.max_segment_size()
    }
}

/// Delegating backend that counts `query_segment` calls.
pub struct CountingBackend {
    inner: Arc<dyn TableBackend>,
    calls: AtomicUsize,
}

impl CountingBackend {
    pub fn new(inner: Arc<dyn TableBackend>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn segment_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TableBackend for CountingBackend {
    fn ensure_table(&self, table: &str) -> Result<()> {
        self.inner.ensure_table(table)
    }

    fn retrieve(&self, table: &str, partition_key: &str, row_key: &str)
        -> Result<Option<Record>> {
        self.inner.retrieve(table, partition_key, row_key)
    }

    fn upsert(&self, table: &str, record: &Record, mode: UpsertMode) -> Result<()> {
        self.inner.upsert(table, record, mode)
    }

    fn batch_upsert(&self, table: &str, records: &[Record], mode: UpsertMode) -> Result<()> {
        self.inner.batch_upsert(table, records, mode)
    }

    fn delete(&self, table: &str, record: &Record) -> Result<()> {
        self.inner.delete(table, record)
    }

    fn query_segment(
        &self,
        query: &TableQuery,
        token: Option<&ContinuationToken>,
    ) -> Result<RecordSegment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.query_segment(query, token)
    }

    fn max_segment_size(&self) -> usize {
        self.inner.max_segment_size()
    }
}

/// A small person-shaped entity shared by tests across crates.
pub mod person {
    use crate::entity::TableEntity;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct PersonEntity {
        pub partition_key: Option<String>,
        pub row_key: Option<String>,
        pub name: Option<String>,
        pub city: Option<String>,
        pub age: Option<i64>,
    }

    impl TableEntity for PersonEntity {
        const TABLE: &'static str = "people";

        fn partition_key(&self) -> Option<&str> {
            self.partition_key.as_deref()
        }

        fn row_key(&self) -> Option<&str> {
            self.row_key.as_deref()
        }
    }

    /// An entity with identity set and every other field unset.
    pub fn person(partition_key: &str, row_key: &str) -> PersonEntity {
        PersonEntity {
            partition_key: Some(partition_key.to_string()),
            row_key: Some(row_key.to_string()),
            name: None,
            city: None,
            age: None,
        }
    }
}
