//! Response shapes as the API serializes them.

use serde::Deserialize;
use sokoni_core::types::{DbId, ListingId, MediaRef, Timestamp};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub location: String,
    pub condition: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<MediaRef>,
    #[serde(default)]
    pub videos: Vec<MediaRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
}

/// One page of `GET /listings`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub data: Vec<Listing>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// `{ "data": T }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// `{ "error": .. }` body of a failed call.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
