/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier handed back by the submission gateway for a created listing.
pub type ListingId = DbId;

/// A reference to an uploaded image or video (storage URI).
pub type MediaRef = String;
