//! Authentication primitives.
//!
//! Sessions are owned by the hosted auth service; this server only verifies
//! the access tokens it issues.
//!
//! - [`jwt`] -- JWT access-token validation (and issuance, for tests and tooling).

pub mod jwt;
