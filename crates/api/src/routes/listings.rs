//! Listing routes, mounted at `/listings`.
//!
//! ```text
//! GET    /          list_listings (?page, page_size)
//! POST   /          create_listing
//! GET    /{id}      get_listing
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/{id}", get(listings::get_listing))
}
