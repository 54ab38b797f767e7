use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sokoni_core::error::CoreError;
use sokoni_core::gateway::GatewayError;
use sokoni_core::listing::ListingValidationError;
use sokoni_core::wizard::WizardError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the wizard and validation errors
/// from the posting flow, and database errors. Implements
/// [`IntoResponse`] to produce `{ "error": .., "code": .. }` bodies; field
/// validation failures also carry a `fields` array.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `sokoni_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A listing payload failed its constraint set.
    #[error(transparent)]
    InvalidListing(#[from] ListingValidationError),

    /// A wizard action was refused.
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::InvalidListing(err) => return validation_response(err),

            AppError::Wizard(wizard) => match wizard {
                WizardError::Validation(err) => return validation_response(err),
                WizardError::Gateway(err) => classify_gateway_error(err),
                WizardError::WrongStep { .. } => {
                    (StatusCode::BAD_REQUEST, "WRONG_STEP", wizard.to_string())
                }
                WizardError::InvalidTransition { .. }
                | WizardError::SubmissionInFlight
                | WizardError::Closed => (StatusCode::CONFLICT, "CONFLICT", wizard.to_string()),
            },

            AppError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::NotFoundByKey { entity, key } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} '{key}' not found"),
        ),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
    }
}

/// Map a listing-store failure to a status.
///
/// - `Rejected` maps to 422 with the store's message.
/// - `Network` maps to 503; the client may retry.
/// - `Unexpected` maps to 502 with a sanitized message.
fn classify_gateway_error(err: &GatewayError) -> (StatusCode, &'static str, String) {
    match err {
        GatewayError::Rejected { message, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "LISTING_REJECTED",
            message.clone(),
        ),
        GatewayError::Network(msg) => {
            tracing::warn!(error = %msg, "Listing store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "GATEWAY_UNAVAILABLE",
                "The listing service is unavailable; try again".to_string(),
            )
        }
        GatewayError::Unexpected(msg) => {
            tracing::error!(error = %msg, "Unexpected listing store response");
            (
                StatusCode::BAD_GATEWAY,
                "GATEWAY_ERROR",
                "The listing service returned an unexpected response".to_string(),
            )
        }
    }
}

fn validation_response(err: &ListingValidationError) -> Response {
    let body = json!({
        "error": err.to_string(),
        "code": "VALIDATION_ERROR",
        "fields": err.fields,
    });
    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Check constraint violations (`23514`) map to 400.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23514") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
