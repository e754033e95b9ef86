//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::Booking;

/// Pagination query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// 1-based page number; pages outside the result set are empty
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size, capped at 100
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Calculate offset for database query; saturates for huge page numbers
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit())
    }

    /// Page size; zero falls back to the default, large values are capped
    pub fn limit(&self) -> u64 {
        match self.per_page {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        }
    }

    /// Page 0 can never hold rows.
    pub fn is_empty_page(&self) -> bool {
        self.page == 0
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[aliases(PaginatedBookings = Paginated<Booking>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        let total_pages = (total + per_page - 1) / per_page;

        Self {
            data,
            meta: PaginationMeta {
                page: params.page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        let page: Paginated<()> = Paginated::new(vec![], PaginationParams::new(1, 20), 41);
        assert_eq!(page.meta.total_pages, 3);

        let page: Paginated<()> = Paginated::new(vec![], PaginationParams::new(1, 20), 0);
        assert_eq!(page.meta.total_pages, 0);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(PaginationParams::new(1, 1000).limit(), 100);
        assert_eq!(PaginationParams::new(1, 0).limit(), 20);
        assert_eq!(PaginationParams::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_page_zero_is_empty() {
        assert!(PaginationParams::new(0, 10).is_empty_page());
        assert_eq!(PaginationParams::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        assert_eq!(PaginationParams::new(u64::MAX, 100).offset(), u64::MAX);
    }
}
