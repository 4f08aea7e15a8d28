//! Continuation-token-driven scans over the segmented query primitive.
//!
//! The scanner owns the two scan shapes everything above it is built on:
//! a full drain of every segment, and a bounded top-N retrieval that
//! stops early. Both operate on whole `Record`s; typed conversion happens
//! in the client.

use gridtable_commons::Record;

use crate::backend::{ContinuationToken, Result, TableBackend, TableQuery};

/// Full scans past this many records log a warning; the scan itself is
/// unbounded and runs until the backend stops handing out tokens.
const FULL_SCAN_WARN_THRESHOLD: usize = 100_000;

/// Drains every segment of `query`, in backend order.
///
/// Any backend failure aborts the scan; partial progress is discarded by
/// propagating the error instead of the records gathered so far.
pub fn scan_all(backend: &dyn TableBackend, query: &TableQuery) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut token: Option<ContinuationToken> = None;
    let mut warned = false;

    loop {
        let segment = backend.query_segment(query, token.as_ref())?;
        records.extend(segment.records);
        token = segment.continuation;

        if !warned && records.len() > FULL_SCAN_WARN_THRESHOLD {
            log::warn!(
                "full scan of table {} passed {} records and is still going",
                query.table(),
                FULL_SCAN_WARN_THRESHOLD
            );
            warned = true;
        }

        if token.is_none() {
            return Ok(records);
        }
    }
}

/// Retrieves at most `count` records matching `query`.
///
/// A zero count returns nothing without touching the backend. A count
/// within the backend's segment cap is served by a single capped call
/// whose continuation token is deliberately not followed. Larger counts
/// drain full segments first, decrementing the remaining count by the
/// cap per segment (not by the segment's actual size), and keep going
/// while the remainder still exceeds the cap and a token remains; the
/// leftover is then fetched with one final capped call if a token
/// survived the loop. The remainder is compared against the cap rather
/// than zero, so the final partial segment is always a separate capped
/// request; this shape is what fixes the exact item counts near cap
/// boundaries.
pub fn scan_top(backend: &dyn TableBackend, query: &TableQuery, count: usize) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    if count == 0 {
        return Ok(records);
    }

    let cap = backend.max_segment_size();
    if count <= cap {
        let capped = query.clone().take(count);
        let segment = backend.query_segment(&capped, None)?;
        records.extend(segment.records);
        return Ok(records);
    }

    let mut token: Option<ContinuationToken> = None;
    let mut remaining = count;
    loop {
        let segment = backend.query_segment(query, token.as_ref())?;
        records.extend(segment.records);
        token = segment.continuation;
        remaining -= cap;
        if remaining <= cap || token.is_none() {
            break;
        }
    }

    if let Some(token) = token {
        let capped = query.clone().take(remaining);
        let segment = backend.query_segment(&capped, Some(&token))?;
        records.extend(segment.records);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{TableQuery, UpsertMode};
    use crate::memory::MemoryBackend;
    use crate::test_utils::{CountingBackend, FailingBackend};
    use gridtable_commons::Record;
    use std::sync::Arc;

    fn seeded_backend(segment_size: usize, rows: usize) -> Arc<MemoryBackend> {
        let backend = MemoryBackend::with_segment_size(segment_size);
        backend.ensure_table("items").unwrap();
        for i in 0..rows {
            let record = Record::new("p1", format!("r{:03}", i));
            backend.upsert("items", &record, UpsertMode::Replace).unwrap();
        }
        Arc::new(backend)
    }

    #[test]
    fn test_scan_all_drains_every_segment_in_order() {
        // 8 rows at segment size 3 come back as segments of 3, 3, 2
        let backend = seeded_backend(3, 8);
        let records = scan_all(backend.as_ref(), &TableQuery::new("items")).unwrap();

        assert_eq!(records.len(), 8);
        let row_keys: Vec<&str> = records.iter().filter_map(Record::row_key).collect();
        let mut sorted = row_keys.clone();
        sorted.sort();
        assert_eq!(row_keys, sorted);
    }

    #[test]
    fn test_scan_all_discards_partial_progress_on_error() {
        let backend = seeded_backend(3, 8);
        let flaky = FailingBackend::new(backend, 2);

        let result = scan_all(&flaky, &TableQuery::new("items"));
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_top_zero_count_is_empty() {
        let counting = CountingBackend::new(seeded_backend(3, 8));
        let records = scan_top(&counting, &TableQuery::new("items"), 0).unwrap();
        assert!(records.is_empty());
        assert_eq!(counting.segment_calls(), 0);
    }

    #[test]
    fn test_scan_top_within_cap_is_one_capped_call() {
        let counting = CountingBackend::new(seeded_backend(3, 8));
        let records = scan_top(&counting, &TableQuery::new("items"), 2).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(counting.segment_calls(), 1);
    }

    #[test]
    fn test_scan_top_spanning_caps_returns_exact_count() {
        // cap 3, count 7: two full segments then one capped call for 1
        let counting = CountingBackend::new(seeded_backend(3, 10));
        let records = scan_top(&counting, &TableQuery::new("items"), 7).unwrap();

        assert_eq!(records.len(), 7);
        assert_eq!(counting.segment_calls(), 3);
    }

    #[test]
    fn test_scan_top_stops_when_data_runs_out() {
        let backend = seeded_backend(3, 5);
        let records = scan_top(backend.as_ref(), &TableQuery::new("items"), 9).unwrap();
        assert_eq!(records.len(), 5);
    }
}
