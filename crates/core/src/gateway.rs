//! The persistence boundary that turns a finished draft into a listing.

use async_trait::async_trait;

use crate::listing::NewListing;
use crate::types::ListingId;

/// Persists a validated listing and returns its identifier.
///
/// The wizard only calls this from its terminal step, with a payload that
/// has already passed [`NewListing::check`].
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, GatewayError>;
}

/// Failures reported by a [`SubmissionGateway`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The backing service refused the listing.
    #[error("Listing rejected: {message}")]
    Rejected {
        /// HTTP status, when the gateway speaks HTTP.
        status: Option<u16>,
        message: String,
    },

    /// The backing service could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backing service answered with something unreadable.
    #[error("Unexpected gateway response: {0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: None,
            message: message.into(),
        }
    }

    /// Whether retrying the same payload could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Rejected { status, .. } => status.is_some_and(|s| s >= 500),
            Self::Unexpected(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_retryable() {
        assert!(GatewayError::Network("timeout".into()).is_retryable());
    }

    #[test]
    fn client_rejections_are_not_retryable() {
        let err = GatewayError::Rejected {
            status: Some(400),
            message: "bad".into(),
        };
        assert!(!err.is_retryable());
        assert!(!GatewayError::rejected("bad").is_retryable());
    }

    #[test]
    fn server_rejections_are_retryable() {
        let err = GatewayError::Rejected {
            status: Some(503),
            message: "down".into(),
        };
        assert!(err.is_retryable());
    }
}
