//! Domain layer for the Sokoni marketplace.
//!
//! Holds the ad-posting workflow (draft store, step forms, wizard
//! controller), the listing submission contract, and the small helpers the
//! API and client crates share. Nothing in here performs I/O.

pub mod draft;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod listing;
pub mod pagination;
pub mod types;
pub mod wizard;
