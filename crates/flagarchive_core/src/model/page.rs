//! Paginated result envelope returned by list operations.

use serde::Serialize;

/// One zero-based page of an `id ASC` ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page index as requested.
    pub page: u32,
    /// Effective page size after defaulting and clamping.
    pub size: u32,
    /// Total number of records across all pages at query time.
    pub total: u64,
}

impl<T> Page<T> {
    /// Whether a following page may hold more rows.
    pub fn has_next(&self) -> bool {
        let seen = u64::from(self.page) * u64::from(self.size) + self.items.len() as u64;
        seen < self.total
    }
}
