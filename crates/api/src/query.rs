//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination (`?page=&page_size=`).
///
/// Values are clamped with `sokoni_core::pagination` before they reach the
/// repository layer.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}
