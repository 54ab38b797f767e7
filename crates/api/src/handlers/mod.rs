//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to `sokoni_db` repositories or the draft registry and
//! map errors via [`AppError`](crate::error::AppError).

pub mod categories;
pub mod drafts;
pub mod listings;
