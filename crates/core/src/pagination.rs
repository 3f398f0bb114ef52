//! Pagination contract shared by both listing endpoints.

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated page request: `page >= 1`, `1 <= page_size <= 100`.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Build a page request from optional query values, applying defaults
    /// and bounds. Out-of-range values are validation errors.
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> DomainResult<Self> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let mut errors = Vec::new();
        if page < 1 {
            errors.push("page must be at least 1".to_string());
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            errors.push(format!("pageSize must be between 1 and {MAX_PAGE_SIZE}"));
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus totals: `total_pages = ceil(total / page_size)`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: total.div_ceil(u64::from(request.page_size())),
        }
    }
}
