//! Repository for the `listings` table.

use sokoni_core::listing::NewListing;
use sokoni_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::Listing;

/// Column list for `listings` queries.
const COLUMNS: &str = "id, owner_id, title, description, price, location, condition, \
     tags, images, videos, created_at, updated_at";

/// Provides create and read operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a listing built from a validated payload.
    pub async fn create(
        pool: &PgPool,
        owner_id: Option<DbId>,
        input: &NewListing,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings \
             (owner_id, title, description, price, location, condition, tags, images, videos) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.location)
            .bind(&input.condition)
            .bind(&input.tags)
            .bind(&input.images)
            .bind(&input.videos)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of listings, newest first.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all listings.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM listings")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
