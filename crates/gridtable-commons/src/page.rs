//! Page envelope for page-windowed browsing.

use serde::{Deserialize, Serialize};

/// One page of an ordered result set, in the Bootgrid wire shape.
///
/// `current` is the effective 1-indexed page number actually returned,
/// which differs from the requested page when the request pointed beyond
/// the data and got clamped to the last non-empty page. `total` is the
/// full matching row count, not the page length. The failure shape is
/// `current == 0, row_count == 0, total == 0, rows == []`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub current: usize,
    pub row_count: usize,
    pub total: usize,
    pub rows: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn new(current: usize, row_count: usize, total: usize, rows: Vec<T>) -> Self {
        Self {
            current,
            row_count,
            total,
            rows,
        }
    }

    /// The empty failure-shaped page.
    pub fn empty() -> Self {
        Self {
            current: 0,
            row_count: 0,
            total: 0,
            rows: Vec::new(),
        }
    }

    /// Converts the row type while keeping the window bookkeeping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            current: self.current,
            row_count: self.row_count,
            total: self.total,
            rows: self.rows.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_window_bookkeeping() {
        let page = PageResponse::new(3, 10, 23, vec![1, 2, 3]);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.current, 3);
        assert_eq!(mapped.row_count, 10);
        assert_eq!(mapped.total, 23);
        assert_eq!(mapped.rows, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_wire_field_names() {
        let page: PageResponse<u8> = PageResponse::new(1, 5, 12, vec![7]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["current"], 1);
        assert_eq!(json["rowCount"], 5);
        assert_eq!(json["total"], 12);
    }

    #[test]
    fn test_empty_shape() {
        let page: PageResponse<u8> = PageResponse::empty();
        assert_eq!(page.current, 0);
        assert_eq!(page.row_count, 0);
        assert_eq!(page.total, 0);
        assert!(page.rows.is_empty());
    }
}
