//! Handlers for server-hosted post-ad wizard sessions.
//!
//! Every endpoint acts for the authenticated user and only sees that user's
//! sessions; anyone else's draft id answers 404.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sokoni_core::wizard::Navigation;
use uuid::Uuid;

use crate::drafts::{DraftFieldsUpdate, RepoSubmissionGateway};
use crate::error::AppResult;
use crate::handlers::listings::ensure_listing_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PUT /drafts/{id}/step-input`.
#[derive(Debug, Deserialize)]
pub struct StepInputBody {
    pub value: String,
}

// ---------------------------------------------------------------------------
// POST /drafts
// ---------------------------------------------------------------------------

/// Open a new wizard session on step 1 with an empty draft.
pub async fn create_draft(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let view = state.drafts.create(auth.user_id).await;

    tracing::info!(draft_id = %view.id, user_id = auth.user_id, "Draft session created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /drafts/{id}
// ---------------------------------------------------------------------------

pub async fn get_draft(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let view = state.drafts.view(id, auth.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /drafts/{id}/fields
// ---------------------------------------------------------------------------

/// Replace any subset of draft fields. Nothing is validated here.
pub async fn update_fields(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<DraftFieldsUpdate>,
) -> AppResult<impl IntoResponse> {
    let (result, view) = state
        .drafts
        .with_session(id, auth.user_id, |s| {
            s.wizard.draft_mut().map(|draft| body.apply(draft))
        })
        .await?;
    result?;

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /drafts/{id}/step-input
// ---------------------------------------------------------------------------

/// Submit text from the current step's form.
pub async fn update_step_input(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StepInputBody>,
) -> AppResult<impl IntoResponse> {
    let (result, view) = state
        .drafts
        .with_session(id, auth.user_id, |s| s.wizard.edit_current(body.value))
        .await?;
    result?;

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /drafts/{id}/advance
// ---------------------------------------------------------------------------

/// Move to the next step. Refused with the failing fields while the current
/// step's own fields are invalid.
pub async fn advance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (result, view) = state
        .drafts
        .with_session(id, auth.user_id, |s| s.wizard.next())
        .await?;
    let step = result?;

    tracing::info!(draft_id = %id, to_step = step.to_number(), "Draft advanced");

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /drafts/{id}/go-back
// ---------------------------------------------------------------------------

/// Move to the previous step. From step 1 this abandons the session; the
/// returned view then reports phase `abandoned`.
pub async fn go_back(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (result, view) = state
        .drafts
        .with_session(id, auth.user_id, |s| s.wizard.back())
        .await?;

    match result? {
        Navigation::Moved(step) => {
            tracing::info!(draft_id = %id, to_step = step.to_number(), "Draft went back");
        }
        Navigation::Exited => {
            tracing::info!(draft_id = %id, user_id = auth.user_id, "Draft abandoned from step 1");
        }
    }

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /drafts/{id}/submit
// ---------------------------------------------------------------------------

/// Validate the whole draft and publish it. The session is removed on
/// success; on failure it stays on the preview step for a retry.
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let gateway = Arc::new(RepoSubmissionGateway::new(state.pool.clone(), Some(auth.user_id)));
    let listing_id = state.drafts.submit(id, auth.user_id, gateway).await?;
    let listing = ensure_listing_exists(&state.pool, listing_id).await?;

    tracing::info!(
        draft_id = %id,
        listing_id,
        user_id = auth.user_id,
        "Draft submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

// ---------------------------------------------------------------------------
// DELETE /drafts/{id}
// ---------------------------------------------------------------------------

/// Abandon the session and discard its draft.
pub async fn abandon(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.drafts.abandon(id, auth.user_id).await?;

    tracing::info!(draft_id = %id, user_id = auth.user_id, "Draft abandoned");

    Ok(StatusCode::NO_CONTENT)
}
