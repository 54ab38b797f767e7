//! Page-number pagination for listing queries.
//!
//! The read side speaks `?page=N` (1-based) and maps it to a
//! `LIMIT`/`OFFSET` range for the repository layer.

/// Listings per page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on a caller-requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a user-provided page size to `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Row offset of the first item on `page`.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size)
}
