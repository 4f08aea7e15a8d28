//! Embedded in-memory backend.
//!
//! `MemoryBackend` is the reference `TableBackend` implementation: a
//! `RwLock`-guarded map of tables, each a `BTreeMap` keyed by the
//! composite `(partition_key, row_key)` pair, so scan order is key order.
//! It honors the full segmented-query contract, including continuation
//! tokens, filter evaluation, column projection, and take caps, which
//! makes it suitable both for tests and for running the access layer
//! without a remote store.
//!
//! The segment size is configurable so that scans can be forced through
//! many small segments; production-shaped callers keep the default cap.
//! Etags are assigned from a process-local counter and enforced as an
//! if-match precondition on delete only. Optimistic concurrency on
//! upserts is not implemented.

use gridtable_commons::Record;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::backend::{
    ContinuationToken, RecordSegment, Result, StoreError, TableBackend, TableQuery, UpsertMode,
    MAX_SEGMENT_SIZE,
};
use gridtable_commons::{PARTITION_KEY, ROW_KEY};

/// Separator between the partition and row key inside a continuation
/// token. Tokens name the last key already returned.
const TOKEN_SEPARATOR: char = '\u{1}';

type TableRows = BTreeMap<(String, String), Record>;

pub struct MemoryBackend {
    tables: RwLock<HashMap<String, TableRows>>,
    segment_size: usize,
    etag_counter: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_segment_size(MAX_SEGMENT_SIZE)
    }

    /// A backend returning at most `segment_size` records per segment.
    pub fn with_segment_size(segment_size: usize) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            segment_size: segment_size.max(1),
            etag_counter: AtomicU64::new(1),
        }
    }

    fn stamp(&self, record: &Record) -> Record {
        let mut stored = record.clone();
        stored.set_etag(self.etag_counter.fetch_add(1, Ordering::Relaxed).to_string());
        stored.set_timestamp(now_millis());
        stored
    }

    fn read_tables(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, TableRows>>> {
        self.tables
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_tables(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, TableRows>>> {
        self.tables
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBackend for MemoryBackend {
    fn ensure_table(&self, table: &str) -> Result<()> {
        self.write_tables()?.entry(table.to_string()).or_default();
        Ok(())
    }

    fn retrieve(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<Record>> {
        let tables = self.read_tables()?;
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(rows
            .get(&(partition_key.to_string(), row_key.to_string()))
            .cloned())
    }

    fn upsert(&self, table: &str, record: &Record, mode: UpsertMode) -> Result<()> {
        let key = record_key(record)?;
        let stamped = self.stamp(record);

        let mut tables = self.write_tables()?;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        match (mode, rows.get_mut(&key)) {
            (UpsertMode::Merge, Some(existing)) => merge_into(existing, stamped),
            _ => {
                rows.insert(key, stamped);
            }
        }
        Ok(())
    }

    fn batch_upsert(&self, table: &str, records: &[Record], mode: UpsertMode) -> Result<()> {
        let mut keys = Vec::with_capacity(records.len());
        let mut partition: Option<&str> = None;
        for record in records {
            let key = record_key(record)?;
            match partition {
                None => partition = record.partition_key(),
                Some(pk) if pk == key.0 => {}
                Some(_) => {
                    return Err(StoreError::InvalidArgument(
                        "batch records must share one partition key".into(),
                    ))
                }
            }
            keys.push(key);
        }

        // All checks passed; apply the whole batch under one write guard.
        let mut tables = self.write_tables()?;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        for (key, record) in keys.into_iter().zip(records) {
            let stamped = self.stamp(record);
            match (mode, rows.get_mut(&key)) {
                (UpsertMode::Merge, Some(existing)) => merge_into(existing, stamped),
                _ => {
                    rows.insert(key, stamped);
                }
            }
        }
        Ok(())
    }

    fn delete(&self, table: &str, record: &Record) -> Result<()> {
        let key = record_key(record)?;
        let mut tables = self.write_tables()?;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        if let (Some(expected), Some(stored)) = (record.etag(), rows.get(&key)) {
            if stored.etag() != Some(expected) {
                return Err(StoreError::PreconditionFailed(format!(
                    "etag mismatch for {}/{}",
                    key.0, key.1
                )));
            }
        }
        rows.remove(&key);
        Ok(())
    }

    fn query_segment(
        &self,
        query: &TableQuery,
        token: Option<&ContinuationToken>,
    ) -> Result<RecordSegment> {
        let tables = self.read_tables()?;
        let rows = tables
            .get(query.table())
            .ok_or_else(|| StoreError::TableNotFound(query.table().to_string()))?;

        let resume_after = token.map(parse_token).transpose()?;
        let limit = query
            .take_count()
            .map_or(self.segment_size, |take| take.min(self.segment_size));

        let mut records = Vec::new();
        let mut last_key = None;
        let mut truncated = false;
        for (key, record) in rows.iter() {
            if let Some(after) = &resume_after {
                if key <= after {
                    continue;
                }
            }
            if let Some(filter) = query.filter() {
                if !filter.matches(record) {
                    continue;
                }
            }
            if records.len() == limit {
                // At least one more match exists past the cap.
                truncated = true;
                break;
            }
            records.push(project(record, query.selected()));
            last_key = Some(key.clone());
        }

        // The token names the last record included, not the first excluded.
        let continuation = match (truncated, last_key) {
            (true, Some((pk, rk))) => {
                Some(ContinuationToken::new(format!("{pk}{TOKEN_SEPARATOR}{rk}")))
            }
            _ => None,
        };

        Ok(RecordSegment {
            records,
            continuation,
        })
    }

    fn max_segment_size(&self) -> usize {
        self.segment_size
    }
}

fn record_key(record: &Record) -> Result<(String, String)> {
    let partition_key = record
        .partition_key()
        .ok_or(StoreError::MissingKey(PARTITION_KEY))?;
    let row_key = record.row_key().ok_or(StoreError::MissingKey(ROW_KEY))?;
    Ok((partition_key.to_string(), row_key.to_string()))
}

/// Folds the non-null properties of `incoming` into `existing`. Null
/// properties mean "not supplied" in merge mode and leave the stored
/// value untouched.
fn merge_into(existing: &mut Record, incoming: Record) {
    if let Some(etag) = incoming.etag() {
        existing.set_etag(etag.to_string());
    }
    if let Some(timestamp) = incoming.timestamp() {
        existing.set_timestamp(timestamp);
    }
    for (name, value) in incoming.properties() {
        if !value.is_null() {
            existing.set(name.clone(), value.clone());
        }
    }
}

fn project(record: &Record, columns: Option<&[String]>) -> Record {
    match columns {
        None => record.clone(),
        Some(columns) => {
            let mut projected = Record::from_properties(
                record
                    .properties()
                    .iter()
                    .filter(|(name, _)| columns.iter().any(|c| c == *name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            );
            if let Some(etag) = record.etag() {
                projected.set_etag(etag.to_string());
            }
            if let Some(timestamp) = record.timestamp() {
                projected.set_timestamp(timestamp);
            }
            projected
        }
    }
}

fn parse_token(token: &ContinuationToken) -> Result<(String, String)> {
    token
        .as_str()
        .split_once(TOKEN_SEPARATOR)
        .map(|(pk, rk)| (pk.to_string(), rk.to_string()))
        .ok_or_else(|| StoreError::Backend("malformed continuation token".into()))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
