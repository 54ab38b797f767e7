pub mod categories;
pub mod drafts;
pub mod health;
pub mod listings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /listings                     list (?page, page_size), create (auth)
/// /listings/{id}                get
///
/// /categories                   list
///
/// /drafts                       create (auth)
/// /drafts/{id}                  get, abandon (auth)
/// /drafts/{id}/fields           replace fields (auth)
/// /drafts/{id}/step-input       current step's form input (auth)
/// /drafts/{id}/advance          next step (auth)
/// /drafts/{id}/go-back          previous step (auth)
/// /drafts/{id}/submit           publish (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/listings", listings::router())
        .nest("/categories", categories::router())
        .nest("/drafts", drafts::router())
}
