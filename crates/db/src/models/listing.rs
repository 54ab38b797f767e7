//! Listing entity model.
//!
//! Listings are created from a validated
//! [`NewListing`](sokoni_core::listing::NewListing); there is no separate
//! create DTO here.

use serde::Serialize;
use sokoni_core::types::{DbId, MediaRef, Timestamp};
use sqlx::FromRow;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub owner_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub location: String,
    pub condition: String,
    pub tags: Vec<String>,
    pub images: Vec<MediaRef>,
    pub videos: Vec<MediaRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
