//! Domain error type shared by the API and repository layers.
//!
//! Listing constraint failures and wizard refusals have their own types in
//! [`crate::listing`] and [`crate::wizard`].

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A lookup by a non-numeric key (e.g. a draft session UUID) missed.
    #[error("Entity not found: {entity} '{key}'")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
