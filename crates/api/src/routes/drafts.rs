//! Draft session routes, mounted at `/drafts`.
//!
//! ```text
//! POST   /                    create_draft
//! GET    /{id}                get_draft
//! DELETE /{id}                abandon
//! PUT    /{id}/fields         update_fields
//! PUT    /{id}/step-input     update_step_input
//! POST   /{id}/advance        advance
//! POST   /{id}/go-back        go_back
//! POST   /{id}/submit         submit
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(drafts::create_draft))
        .route("/{id}", get(drafts::get_draft).delete(drafts::abandon))
        .route("/{id}/fields", put(drafts::update_fields))
        .route("/{id}/step-input", put(drafts::update_step_input))
        .route("/{id}/advance", post(drafts::advance))
        .route("/{id}/go-back", post(drafts::go_back))
        .route("/{id}/submit", post(drafts::submit))
}
