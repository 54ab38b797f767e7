//! Marketplace REST client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sokoni_core::gateway::{GatewayError, SubmissionGateway};
use sokoni_core::listing::NewListing;
use sokoni_core::types::ListingId;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{Category, DataEnvelope, ErrorBody, Listing, ListingPage};

/// HTTP client for one marketplace API server.
pub struct MarketplaceClient {
    client: reqwest::Client,
    config: ClientConfig,
}

/// The part of a created listing the gateway needs.
#[derive(Debug, Deserialize)]
struct Created {
    id: ListingId,
}

impl MarketplaceClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /listings?page=N`. `None` asks for the first page.
    pub async fn fetch_listings(&self, page: Option<i64>) -> Result<ListingPage, ClientError> {
        let mut request = self.client.get(self.config.api_url("/listings"));
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        let response = request.send().await?;
        parse_json(response).await
    }

    /// `GET /listings/{id}`. A 404 is `Ok(None)`.
    pub async fn fetch_listing(&self, id: ListingId) -> Result<Option<Listing>, ClientError> {
        let response = self
            .client
            .get(self.config.api_url(&format!("/listings/{id}")))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: DataEnvelope<Listing> = parse_json(response).await?;
        Ok(Some(envelope.data))
    }

    /// `GET /categories`.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ClientError> {
        let response = self
            .client
            .get(self.config.api_url("/categories"))
            .send()
            .await?;
        let envelope: DataEnvelope<Vec<Category>> = parse_json(response).await?;
        Ok(envelope.data)
    }

    /// `POST /listings`, returning the stored listing.
    pub async fn publish(&self, listing: &NewListing) -> Result<Listing, ClientError> {
        let envelope: DataEnvelope<Listing> = self.post_listing(listing).await?;
        Ok(envelope.data)
    }

    async fn post_listing<T: DeserializeOwned>(&self, listing: &NewListing) -> Result<T, ClientError> {
        let mut request = self
            .client
            .post(self.config.api_url("/listings"))
            .json(listing);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        parse_json(response).await
    }
}

#[async_trait]
impl SubmissionGateway for MarketplaceClient {
    async fn create_listing(&self, listing: &NewListing) -> Result<ListingId, GatewayError> {
        match self.post_listing::<DataEnvelope<Created>>(listing).await {
            Ok(envelope) => {
                tracing::info!(listing_id = envelope.data.id, "Listing published");
                Ok(envelope.data.id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Listing publish failed");
                Err(e.into())
            }
        }
    }
}

// ---- private helpers ----

/// Decode a 2xx body as `T`, or turn a non-2xx answer into
/// [`ClientError::Api`] carrying the server's `error` message.
async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
