//! Submission gateway backed directly by the listings table.

use async_trait::async_trait;
use sokoni_core::gateway::{GatewayError, SubmissionGateway};
use sokoni_core::listing::NewListing;
use sokoni_core::types::{DbId, ListingId};
use sokoni_db::repositories::ListingRepo;
use sqlx::PgPool;

/// Persists wizard submissions through [`ListingRepo`] on behalf of one user.
pub struct RepoSubmissionGateway {
    pool: PgPool,
    owner_id: Option<DbId>,
}

impl RepoSubmissionGateway {
    pub fn new(pool: PgPool, owner_id: Option<DbId>) -> Self {
        Self { pool, owner_id }
    }
}

#[async_trait]
impl SubmissionGateway for RepoSubmissionGateway {
    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, GatewayError> {
        let created = ListingRepo::create(&self.pool, self.owner_id, listing)
            .await
            .map_err(gateway_error)?;
        Ok(created.id)
    }
}

/// Classify a sqlx error as seen from the wizard.
///
/// Constraint violations are rejections of this listing; pool and I/O
/// failures mean the store is unreachable; anything else is unexpected.
fn gateway_error(err: sqlx::Error) -> GatewayError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c.starts_with("23")) => {
            GatewayError::Rejected {
                status: None,
                message: format!(
                    "Listing violates constraint {}",
                    db_err.constraint().unwrap_or("unknown")
                ),
            }
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            GatewayError::Network(err.to_string())
        }
        _ => GatewayError::Unexpected(err.to_string()),
    }
}
