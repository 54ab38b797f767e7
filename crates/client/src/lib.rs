//! HTTP client for the Sokoni marketplace API.
//!
//! [`MarketplaceClient`] reads listings and categories and implements
//! [`SubmissionGateway`](sokoni_core::gateway::SubmissionGateway), so a
//! [`WizardController`](sokoni_core::wizard::WizardController) running on a
//! device can publish through it.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::MarketplaceClient;
pub use config::ClientConfig;
pub use error::ClientError;
