//! Handlers for published listings.
//!
//! Reads are public. Creating a listing is the HTTP face of the submission
//! gateway: the payload is checked against the listing constraints before it
//! reaches the database.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sokoni_core::error::CoreError;
use sokoni_core::listing::NewListing;
use sokoni_core::pagination::{clamp_page, clamp_page_size, page_offset};
use sokoni_core::types::DbId;
use sokoni_db::models::listing::Listing;
use sokoni_db::repositories::ListingRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a listing or fail with 404.
pub(crate) async fn ensure_listing_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Listing> {
    ListingRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        })
    })
}

// ---------------------------------------------------------------------------
// GET /listings
// ---------------------------------------------------------------------------

/// One page of listings, newest first.
pub async fn list_listings(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);

    let data = ListingRepo::list_page(&state.pool, page_size, page_offset(page, page_size)).await?;
    let total = ListingRepo::count(&state.pool).await?;

    Ok(Json(PageResponse {
        data,
        total,
        page,
        page_size,
    }))
}

// ---------------------------------------------------------------------------
// GET /listings/{id}
// ---------------------------------------------------------------------------

pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = ensure_listing_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: listing }))
}

// ---------------------------------------------------------------------------
// POST /listings
// ---------------------------------------------------------------------------

/// Publish a listing for the authenticated user.
///
/// Text fields are trimmed and `condition` lowercased before the constraint
/// check, the same normalisation the wizard applies to its drafts.
pub async fn create_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<NewListing>,
) -> AppResult<impl IntoResponse> {
    let input = body.normalized();
    input.check()?;

    let listing = ListingRepo::create(&state.pool, Some(auth.user_id), &input).await?;

    tracing::info!(
        listing_id = listing.id,
        user_id = auth.user_id,
        "Listing created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}
