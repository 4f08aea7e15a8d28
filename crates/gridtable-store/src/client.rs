//! Generic typed client over a table store backend.
//!
//! `TableClient<E>` binds one entity type to one backend table and
//! exposes the whole operation set: single and batch upserts in replace
//! and merge mode, point lookups, fetch-then-delete, full and filtered
//! scans, page-windowed browsing, top-N retrieval, and a key-only count.
//! Every method returns `Result` with an explicit [`StoreError`]; callers
//! that want the legacy sentinel behavior wrap the client in
//! [`CompatClient`](crate::compat::CompatClient).
//!
//! ## Pagination
//!
//! `query_page` runs the same full filtered scan as `query` and windows
//! the in-memory result list afterwards. It is not a backend-side
//! limit/offset: correctness is bounded but I/O cost is not, and the
//! window arithmetic (including clamping past-the-end requests to the
//! last non-empty page) is part of the compatibility surface.

use gridtable_commons::{PageResponse, Record, PARTITION_KEY, ROW_KEY};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::backend::{Result, StoreError, TableBackend, TableQuery, UpsertMode};
use crate::entity::TableEntity;
use crate::filter::Filter;
use crate::scanner;

/// Generic per-entity-type client.
///
/// The client owns nothing but an `Arc` handle to the backend and is
/// itself cheap to clone. It keeps no state between calls; concurrency
/// safety is entirely the backend's concern.
pub struct TableClient<E> {
    backend: Arc<dyn TableBackend>,
    table: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for TableClient<E> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: TableEntity> TableClient<E> {
    /// Builds a client for the entity's own table, creating the table on
    /// the backend when it does not exist yet.
    pub fn new(backend: Arc<dyn TableBackend>) -> Result<Self> {
        Self::with_table(backend, E::TABLE)
    }

    /// Builds a client bound to an explicit table name.
    pub fn with_table(backend: Arc<dyn TableBackend>, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        backend.ensure_table(&table)?;
        Ok(Self {
            backend,
            table,
            _entity: PhantomData,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn backend(&self) -> &Arc<dyn TableBackend> {
        &self.backend
    }

    /// Inserts or fully replaces a single entity.
    pub fn upsert_replace(&self, entity: &E) -> Result<()> {
        self.upsert(entity, UpsertMode::Replace)
    }

    /// Inserts or merges a single entity; null properties leave the
    /// stored values untouched.
    pub fn upsert_merge(&self, entity: &E) -> Result<()> {
        self.upsert(entity, UpsertMode::Merge)
    }

    fn upsert(&self, entity: &E, mode: UpsertMode) -> Result<()> {
        let record = checked_record(entity)?;
        self.backend.upsert(&self.table, &record, mode)
    }

    /// Submits all entities as one all-or-nothing replace batch.
    pub fn upsert_replace_batch(&self, entities: &[E]) -> Result<()> {
        self.upsert_batch(entities, UpsertMode::Replace)
    }

    /// Submits all entities as one all-or-nothing merge batch.
    pub fn upsert_merge_batch(&self, entities: &[E]) -> Result<()> {
        self.upsert_batch(entities, UpsertMode::Merge)
    }

    fn upsert_batch(&self, entities: &[E], mode: UpsertMode) -> Result<()> {
        let records = entities
            .iter()
            .map(checked_record)
            .collect::<Result<Vec<_>>>()?;
        self.backend.batch_upsert(&self.table, &records, mode)
    }

    /// Deletes the entity with the given identity.
    ///
    /// The record is first re-fetched and it is the fetched record, with
    /// its current etag, that is deleted and returned. `Ok(None)` when no
    /// record exists under that identity.
    pub fn delete(&self, entity: &E) -> Result<Option<E>> {
        let (partition_key, row_key) = identity(entity)?;
        let Some(current) = self.backend.retrieve(&self.table, partition_key, row_key)? else {
            return Ok(None);
        };
        self.backend.delete(&self.table, &current)?;
        E::from_record(&current).map(Some)
    }

    /// Point lookup by composite key.
    pub fn get(&self, partition_key: &str, row_key: &str) -> Result<Option<E>> {
        match self.backend.retrieve(&self.table, partition_key, row_key)? {
            Some(record) => E::from_record(&record).map(Some),
            None => Ok(None),
        }
    }

    /// Lookup by row key alone, via a full filtered scan.
    ///
    /// Precondition: the caller guarantees row keys are unique across the
    /// whole table. When that is violated the first record in scan order
    /// wins, and scan order is otherwise unspecified.
    pub fn get_by_row_key(&self, row_key: &str) -> Result<Option<E>> {
        let query = TableQuery::new(&self.table)
            .with_filter(Some(Filter::equal(ROW_KEY, row_key)));
        let records = scanner::scan_all(self.backend.as_ref(), &query)?;
        match records.into_iter().next() {
            Some(record) => E::from_record(&record).map(Some),
            None => Ok(None),
        }
    }

    /// Precondition dispatch on whichever identity parts the entity has:
    /// both keys run a point lookup, a lone row key runs the row-key
    /// scan, anything else is `None`.
    pub fn get_entity(&self, entity: &E) -> Result<Option<E>> {
        match (entity.partition_key(), entity.row_key()) {
            (Some(partition_key), Some(row_key)) => self.get(partition_key, row_key),
            (None, Some(row_key)) => self.get_by_row_key(row_key),
            _ => Ok(None),
        }
    }

    /// Full unfiltered scan of the table.
    pub fn query_all(&self) -> Result<Vec<E>> {
        self.query(None, None)
    }

    /// Full scan filtered by partition key and/or an extra filter.
    pub fn query(&self, partition_key: Option<&str>, extra: Option<Filter>) -> Result<Vec<E>> {
        let query = self.build_query(partition_key, extra);
        let records = scanner::scan_all(self.backend.as_ref(), &query)?;
        records.iter().map(E::from_record).collect()
    }

    /// Runs the filtered full scan and windows the result list.
    ///
    /// `rows_per_page` and `page_number` are 1-based and must be
    /// positive. Requests pointing entirely past the data are clamped to
    /// the last non-empty page and the response reports the effective
    /// page number actually returned. A scan matching nothing yields the
    /// empty failure-shaped page.
    pub fn query_page(
        &self,
        rows_per_page: usize,
        page_number: usize,
        partition_key: Option<&str>,
        extra: Option<Filter>,
    ) -> Result<PageResponse<E>> {
        if rows_per_page == 0 {
            return Err(StoreError::InvalidArgument("rows_per_page must be positive".into()));
        }
        if page_number == 0 {
            return Err(StoreError::InvalidArgument("page_number is 1-based".into()));
        }

        let query = self.build_query(partition_key, extra);
        let records = scanner::scan_all(self.backend.as_ref(), &query)?;
        let total = records.len();
        if total == 0 {
            return Ok(PageResponse::empty());
        }

        let (effective_page, window) = page_window(records, rows_per_page, page_number);
        let rows = window.iter().map(E::from_record).collect::<Result<Vec<_>>>()?;
        Ok(PageResponse::new(effective_page, rows_per_page, total, rows))
    }

    /// Retrieves at most `count` matching entities via the scanner's
    /// bounded top-N scan.
    pub fn query_top(
        &self,
        count: usize,
        partition_key: Option<&str>,
        extra: Option<Filter>,
    ) -> Result<Vec<E>> {
        let query = self.build_query(partition_key, extra);
        let records = scanner::scan_top(self.backend.as_ref(), &query, count)?;
        records.iter().map(E::from_record).collect()
    }

    /// Counts the table's records with a key-only projection scan.
    pub fn count(&self) -> Result<usize> {
        let query = TableQuery::new(&self.table).select(vec![PARTITION_KEY.to_string()]);
        let records = scanner::scan_all(self.backend.as_ref(), &query)?;
        Ok(records.len())
    }

    fn build_query(&self, partition_key: Option<&str>, extra: Option<Filter>) -> TableQuery {
        let partition_filter = partition_key.map(|pk| Filter::equal(PARTITION_KEY, pk));
        TableQuery::new(&self.table).with_filter(Filter::combine([partition_filter, extra]))
    }
}

fn checked_record<E: TableEntity>(entity: &E) -> Result<Record> {
    identity(entity)?;
    entity.to_record()
}

fn identity<E: TableEntity>(entity: &E) -> Result<(&str, &str)> {
    let partition_key = entity.partition_key().ok_or(StoreError::MissingKey(PARTITION_KEY))?;
    let row_key = entity.row_key().ok_or(StoreError::MissingKey(ROW_KEY))?;
    Ok((partition_key, row_key))
}

/// Slices `rows` down to the requested 1-based window.
///
/// Returns the effective page number together with the window. A request
/// past the end of the data is clamped to the last non-empty page: the
/// last page index is `total / rows_per_page`, minus one when the data
/// divides evenly, and the reported page number is that index plus one.
/// A request whose tail merely hangs past the end keeps its requested
/// page number and returns the partial window.
///
/// Callers guarantee `rows` is non-empty and both arguments are positive.
fn page_window(mut rows: Vec<Record>, rows_per_page: usize, page_number: usize) -> (usize, Vec<Record>) {
    let total = rows.len();
    let start = (page_number - 1).saturating_mul(rows_per_page);
    let end_inclusive = page_number.saturating_mul(rows_per_page) - 1;

    if start > total - 1 {
        let mut last_page = total / rows_per_page;
        if total % rows_per_page == 0 {
            last_page -= 1;
        }
        let start = last_page * rows_per_page;
        (last_page + 1, rows.split_off(start))
    } else if end_inclusive > total - 1 {
        (page_number, rows.split_off(start))
    } else {
        rows.truncate(end_inclusive + 1);
        (page_number, rows.split_off(start))
    }
}
