//! Row structs for the database tables.

pub mod category;
pub mod listing;
