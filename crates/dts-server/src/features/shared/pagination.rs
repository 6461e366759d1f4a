//! Page/size pagination
//!
//! Both list endpoints take one-based `page` and `size` query parameters
//! and report totals back through the response `meta` block.

use serde::{Deserialize, Serialize};

/// Page used when the client sends none.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client sends none.
pub const DEFAULT_SIZE: i64 = 10;

/// Upper bound on the page size a client may request.
pub const MAX_SIZE: i64 = 100;

/// Raw pagination query parameters. Absent values fall back to defaults;
/// explicitly out-of-range values are rejected by [`validate`](Self::validate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_SIZE).clamp(1, MAX_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.size()
    }

    /// Reject parameters the client sent out of range. Defaults are never
    /// rejected.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.page.is_some_and(|p| p < 1) {
            return Err("Page must be greater than 0");
        }
        if self.size.is_some_and(|s| !(1..=MAX_SIZE).contains(&s)) {
            return Err("Size must be between 1 and 100");
        }
        Ok(())
    }
}

/// Pagination block reported in response `meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(page: i64, size: i64, total: i64) -> Self {
        // Signed `div_ceil` is unstable; this is the same round-toward-
        // positive-infinity division.
        let pages = {
            let (quotient, remainder) = (total / size, total % size);
            if (remainder > 0 && size > 0) || (remainder < 0 && size < 0) {
                quotient + 1
            } else {
                quotient
            }
        };
        Self {
            page,
            size,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        Self::new(params.page(), params.size(), total)
    }
}
