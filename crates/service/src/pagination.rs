//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs,
//! plus the `PageResult` envelope returned by paged queries.

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of results with the overall count.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PageResult<T> {
    pub total: u64,
    pub pages: u64,
    pub list: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn new(list: Vec<T>, total: u64, per_page: u64) -> Self {
        let pages = if per_page == 0 { 0 } else { total.div_ceil(per_page) };
        Self { total, pages, list }
    }
}
