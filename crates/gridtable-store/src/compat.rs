//! Legacy sentinel-valued client surface.
//!
//! Consumers that predate the explicit `Result` API observe failures as
//! sentinel values: `false`, `None`, an empty vector, a zero count, or
//! the empty page. `CompatClient` preserves exactly that contract on top
//! of [`TableClient`]: every failure is logged and degraded, and callers
//! cannot distinguish an empty result from a transient backend failure.
//! New code should use `TableClient` directly.

use gridtable_commons::PageResponse;

use crate::client::TableClient;
use crate::entity::TableEntity;
use crate::filter::Filter;

pub struct CompatClient<E> {
    inner: TableClient<E>,
}

impl<E: TableEntity> CompatClient<E> {
    pub fn new(inner: TableClient<E>) -> Self {
        Self { inner }
    }

    /// The underlying result-typed client.
    pub fn inner(&self) -> &TableClient<E> {
        &self.inner
    }

    pub fn upsert_replace(&self, entity: &E) -> bool {
        log_ok("upsert_replace", self.inner.upsert_replace(entity)).is_some()
    }

    pub fn upsert_merge(&self, entity: &E) -> bool {
        log_ok("upsert_merge", self.inner.upsert_merge(entity)).is_some()
    }

    pub fn upsert_replace_batch(&self, entities: &[E]) -> bool {
        log_ok("upsert_replace_batch", self.inner.upsert_replace_batch(entities)).is_some()
    }

    pub fn upsert_merge_batch(&self, entities: &[E]) -> bool {
        log_ok("upsert_merge_batch", self.inner.upsert_merge_batch(entities)).is_some()
    }

    pub fn delete(&self, entity: &E) -> Option<E> {
        log_ok("delete", self.inner.delete(entity)).flatten()
    }

    /// Point lookup; `None` when either key is absent, the record does
    /// not exist, or the backend failed.
    pub fn get(&self, partition_key: Option<&str>, row_key: Option<&str>) -> Option<E> {
        match (partition_key, row_key) {
            (Some(pk), Some(rk)) => log_ok("get", self.inner.get(pk, rk)).flatten(),
            _ => None,
        }
    }

    pub fn get_by_row_key(&self, row_key: &str) -> Option<E> {
        log_ok("get_by_row_key", self.inner.get_by_row_key(row_key)).flatten()
    }

    pub fn get_entity(&self, entity: &E) -> Option<E> {
        log_ok("get_entity", self.inner.get_entity(entity)).flatten()
    }

    pub fn query_all(&self) -> Vec<E> {
        log_ok("query_all", self.inner.query_all()).unwrap_or_default()
    }

    pub fn query(&self, partition_key: Option<&str>, extra: Option<Filter>) -> Vec<E> {
        log_ok("query", self.inner.query(partition_key, extra)).unwrap_or_default()
    }

    pub fn query_page(
        &self,
        rows_per_page: usize,
        page_number: usize,
        partition_key: Option<&str>,
        extra: Option<Filter>,
    ) -> PageResponse<E> {
        log_ok(
            "query_page",
            self.inner.query_page(rows_per_page, page_number, partition_key, extra),
        )
        .unwrap_or_else(PageResponse::empty)
    }

    pub fn query_top(
        &self,
        count: usize,
        partition_key: Option<&str>,
        extra: Option<Filter>,
    ) -> Vec<E> {
        log_ok("query_top", self.inner.query_top(count, partition_key, extra)).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        log_ok("count", self.inner.count()).unwrap_or(0)
    }
}

fn log_ok<T>(operation: &str, result: crate::backend::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("table operation {operation} failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TableClient;
    use crate::memory::MemoryBackend;
    use crate::test_utils::person::{person, PersonEntity};
    use crate::test_utils::FailingBackend;
    use std::sync::Arc;

    fn failing_client(fail_on_call: usize, rows: usize) -> CompatClient<PersonEntity> {
        let backend = Arc::new(MemoryBackend::with_segment_size(3));
        let seed = TableClient::<PersonEntity>::new(backend.clone()).unwrap();
        for i in 0..rows {
            seed.upsert_replace(&person("p1", &format!("r{:03}", i))).unwrap();
        }
        let flaky = Arc::new(FailingBackend::new(backend, fail_on_call));
        CompatClient::new(TableClient::new(flaky).unwrap())
    }

    #[test]
    fn test_scan_failure_degrades_to_empty_not_partial() {
        // Segments fall as 3, 3, 2; the second one dies.
        let client = failing_client(2, 8);
        assert!(client.query_all().is_empty());
    }

    #[test]
    fn test_page_failure_degrades_to_empty_page() {
        let client = failing_client(1, 8);
        let page = client.query_page(10, 1, None, None);
        assert_eq!(page, PageResponse::empty());
    }

    #[test]
    fn test_count_failure_degrades_to_zero() {
        let client = failing_client(1, 8);
        assert_eq!(client.count(), 0);
    }

    #[test]
    fn test_get_with_absent_keys_is_none() {
        let client = failing_client(usize::MAX, 1);
        assert!(client.get(Some("p1"), None).is_none());
        assert!(client.get(None, Some("r000")).is_none());
        assert!(client.get(Some("p1"), Some("r000")).is_some());
    }

    #[test]
    fn test_successful_operations_pass_through() {
        let client = failing_client(usize::MAX, 5);
        assert!(client.upsert_replace(&person("p1", "x")));
        assert_eq!(client.query_all().len(), 6);
        assert_eq!(client.count(), 6);
        assert_eq!(client.query_top(4, Some("p1"), None).len(), 4);
        assert!(client.delete(&person("p1", "x")).is_some());
    }
}
