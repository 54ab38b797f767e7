//! Listing submission payload and its constraint set.
//!
//! [`NewListing`] is what the submission gateway receives. It is built from a
//! [`Draft`] by [`NewListing::from_draft`], which trims the free-text fields
//! and runs every field constraint, returning a [`ListingValidationError`]
//! that lists each failing field.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::draft::{Draft, DraftField};
use crate::types::MediaRef;

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Maximum location length in characters.
pub const LOCATION_MAX_CHARS: usize = 120;

/// Upper bound for an asking price.
pub const PRICE_MAX: f64 = 1_000_000_000.0;

/// Maximum number of tags on a listing.
pub const MAX_TAGS: usize = 10;

/// Maximum length of a single tag in characters.
pub const TAG_MAX_CHARS: usize = 30;

/// Maximum number of images on a listing.
pub const MAX_IMAGES: usize = 10;

/// Maximum number of videos on a listing.
pub const MAX_VIDEOS: usize = 3;

/// Accepted values for `condition`.
pub const VALID_CONDITIONS: &[&str] = &["new", "used"];

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// The body of a create-listing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewListing {
    #[validate(length(min = 1, max = 100, code = "length", message = "must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, code = "length", message = "must be 1-1000 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, max = 1_000_000_000.0, code = "range", message = "must be between 0 and 1000000000"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 120, code = "length", message = "must be 1-120 characters"))]
    pub location: String,
    pub condition: String,
    #[serde(default)]
    #[validate(length(max = 10, code = "too_many", message = "at most 10 tags"))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 10, code = "too_many", message = "at most 10 images"))]
    pub images: Vec<MediaRef>,
    #[serde(default)]
    #[validate(length(max = 3, code = "too_many", message = "at most 3 videos"))]
    pub videos: Vec<MediaRef>,
}

impl NewListing {
    /// Build a payload from a draft without checking any constraint.
    ///
    /// Free-text fields are trimmed; lists are copied as-is.
    pub fn from_draft_unchecked(draft: &Draft) -> Self {
        Self {
            title: draft.title().trim().to_string(),
            description: draft.description().trim().to_string(),
            price: draft.price(),
            location: draft.location().trim().to_string(),
            condition: draft.condition().trim().to_lowercase(),
            tags: draft.tags().to_vec(),
            images: draft.images().to_vec(),
            videos: draft.videos().to_vec(),
        }
    }

    /// Apply the same normalisation a draft gets: trimmed text, lowercase
    /// condition, duplicate tags dropped.
    pub fn normalized(self) -> Self {
        let mut draft = Draft::new();
        draft.set_title(self.title);
        draft.set_description(self.description);
        draft.set_price(self.price);
        draft.set_location(self.location);
        draft.set_condition(self.condition);
        draft.set_tags(self.tags);
        draft.set_images(self.images);
        draft.set_videos(self.videos);
        Self::from_draft_unchecked(&draft)
    }

    /// Build a payload from a draft, rejecting it if any constraint fails.
    pub fn from_draft(draft: &Draft) -> Result<Self, ListingValidationError> {
        let listing = Self::from_draft_unchecked(draft);
        listing.check()?;
        Ok(listing)
    }

    /// Run the full constraint set.
    pub fn check(&self) -> Result<(), ListingValidationError> {
        let fields = self.violations();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ListingValidationError { fields })
        }
    }

    /// Every constraint violation, ordered by field.
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut out = Vec::new();

        if let Err(errors) = self.validate() {
            for (name, errs) in errors.field_errors() {
                let Some(field) = DraftField::from_name(&name) else {
                    continue;
                };
                for err in errs.iter() {
                    out.push(FieldViolation {
                        field,
                        code: required_or(field, self, &err.code),
                        message: err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{field} is invalid")),
                    });
                }
            }
        }

        if let Some(price) = self.price {
            if !price.is_finite() {
                out.push(FieldViolation::new(
                    DraftField::Price,
                    "not_finite",
                    "must be a finite number",
                ));
            }
        }

        if self.condition.is_empty() {
            out.push(FieldViolation::new(
                DraftField::Condition,
                "required",
                "is required",
            ));
        } else if !VALID_CONDITIONS.contains(&self.condition.as_str()) {
            out.push(FieldViolation::new(
                DraftField::Condition,
                "invalid_choice",
                format!("must be one of: {}", VALID_CONDITIONS.join(", ")),
            ));
        }

        if self.tags.iter().any(|t| t.trim().is_empty()) {
            out.push(FieldViolation::new(
                DraftField::Tags,
                "blank",
                "tags must not be blank",
            ));
        }
        if self.tags.iter().any(|t| t.chars().count() > TAG_MAX_CHARS) {
            out.push(FieldViolation::new(
                DraftField::Tags,
                "length",
                format!("each tag must be at most {TAG_MAX_CHARS} characters"),
            ));
        }

        for (field, refs) in [
            (DraftField::Images, &self.images),
            (DraftField::Videos, &self.videos),
        ] {
            if refs.iter().any(|r| r.trim().is_empty()) {
                out.push(FieldViolation::new(
                    field,
                    "blank",
                    "media references must not be blank",
                ));
            }
        }

        out.sort_by_key(|v| v.field);
        out
    }
}

/// Report an empty required text field as `required` rather than `length`.
fn required_or(field: DraftField, listing: &NewListing, code: &str) -> String {
    let empty = match field {
        DraftField::Title => listing.title.is_empty(),
        DraftField::Description => listing.description.is_empty(),
        DraftField::Location => listing.location.is_empty(),
        _ => false,
    };
    if empty {
        "required".to_string()
    } else {
        code.to_string()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: DraftField,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: DraftField, code: &str, message: impl Into<String>) -> Self {
        Self {
            field,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// The draft failed one or more constraints; `fields` lists each failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Listing is invalid: {}", summarize(.fields))]
pub struct ListingValidationError {
    pub fields: Vec<FieldViolation>,
}

impl ListingValidationError {
    /// The distinct fields that failed, in order.
    pub fn failing_fields(&self) -> Vec<DraftField> {
        let mut fields: Vec<DraftField> = self.fields.iter().map(|v| v.field).collect();
        fields.dedup();
        fields
    }

    /// Keep only the violations for the given fields.
    pub fn restricted_to(&self, fields: &[DraftField]) -> Option<Self> {
        let kept: Vec<FieldViolation> = self
            .fields
            .iter()
            .filter(|v| fields.contains(&v.field))
            .cloned()
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(Self { fields: kept })
        }
    }
}

fn summarize(fields: &[FieldViolation]) -> String {
    fields
        .iter()
        .map(|v| format!("{} {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
