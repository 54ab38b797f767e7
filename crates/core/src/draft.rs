//! The draft store for the ad-posting wizard.
//!
//! A [`Draft`] is the in-progress, not-yet-submitted ad. It exposes one
//! getter/setter pair per field. Setters replace the whole field and never
//! reject a value: constraint checking happens at step transitions and at
//! submission (see [`crate::listing`]). The only normalization a setter
//! applies is dropping duplicate tags.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::MediaRef;

// ---------------------------------------------------------------------------
// Field identifiers
// ---------------------------------------------------------------------------

/// Names every field of a [`Draft`].
///
/// Used to attribute validation failures and to describe which fields a
/// wizard step owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Title,
    Description,
    Price,
    Location,
    Condition,
    Tags,
    Images,
    Videos,
}

impl DraftField {
    /// Every field, in display order.
    pub const ALL: [DraftField; 8] = [
        Self::Title,
        Self::Description,
        Self::Price,
        Self::Location,
        Self::Condition,
        Self::Tags,
        Self::Images,
        Self::Videos,
    ];

    /// The wire name of the field (matches the JSON payload key).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Price => "price",
            Self::Location => "location",
            Self::Condition => "condition",
            Self::Tags => "tags",
            Self::Images => "images",
            Self::Videos => "videos",
        }
    }

    /// Look a field up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// The in-progress ad record.
///
/// A fresh draft has every field empty (`price` is `None`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Draft {
    title: String,
    description: String,
    price: Option<f64>,
    location: String,
    condition: String,
    tags: Vec<String>,
    images: Vec<MediaRef>,
    videos: Vec<MediaRef>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    /// Replace the price. Negative or non-finite values are accepted here
    /// and only rejected at submission.
    pub fn set_price(&mut self, price: Option<f64>) {
        self.price = price;
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn set_condition(&mut self, condition: impl Into<String>) {
        self.condition = condition.into();
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Replace the tag list, keeping the first occurrence of each tag.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_preserving_order(tags.into_iter().map(Into::into));
    }

    pub fn images(&self) -> &[MediaRef] {
        &self.images
    }

    pub fn set_images<I, S>(&mut self, images: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<MediaRef>,
    {
        self.images = images.into_iter().map(Into::into).collect();
    }

    pub fn videos(&self) -> &[MediaRef] {
        &self.videos
    }

    pub fn set_videos<I, S>(&mut self, videos: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<MediaRef>,
    {
        self.videos = videos.into_iter().map(Into::into).collect();
    }

    /// Whether every field still holds its initial empty value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn dedup_preserving_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_is_empty() {
        let draft = Draft::new();
        assert!(draft.is_empty());
        assert_eq!(draft.title(), "");
        assert_eq!(draft.price(), None);
        assert!(draft.tags().is_empty());
    }

    #[test]
    fn last_write_wins_per_field() {
        let mut draft = Draft::new();
        draft.set_title("Bike");
        draft.set_price(Some(10.0));
        draft.set_title("Red bike");
        draft.set_location("Mombasa");
        draft.set_price(None);
        draft.set_price(Some(120.0));
        draft.set_location("Nairobi");

        assert_eq!(draft.title(), "Red bike");
        assert_eq!(draft.price(), Some(120.0));
        assert_eq!(draft.location(), "Nairobi");
        assert_eq!(draft.description(), "");
    }

    #[test]
    fn list_setters_replace_whole_field() {
        let mut draft = Draft::new();
        draft.set_images(["a.jpg", "b.jpg"]);
        draft.set_images(["c.jpg"]);
        assert_eq!(draft.images(), ["c.jpg".to_string()]);

        draft.set_videos(Vec::<String>::new());
        assert!(draft.videos().is_empty());
    }

    #[test]
    fn setters_accept_values_that_fail_submission() {
        let mut draft = Draft::new();
        draft.set_price(Some(-5.0));
        draft.set_condition("broken");
        assert_eq!(draft.price(), Some(-5.0));
        assert_eq!(draft.condition(), "broken");
    }

    #[test]
    fn duplicate_tags_are_dropped() {
        let mut draft = Draft::new();
        draft.set_tags(["a", "a", "b"]);
        assert_eq!(draft.tags(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn tag_dedup_keeps_first_occurrence_order() {
        let mut draft = Draft::new();
        draft.set_tags(["sports", "bike", "sports", "outdoor", "bike"]);
        assert_eq!(draft.tags(), ["sports", "bike", "outdoor"]);
    }

    #[test]
    fn clear_resets_every_field() {
        let mut draft = Draft::new();
        draft.set_title("Bike");
        draft.set_tags(["bike"]);
        draft.set_price(Some(1.0));
        assert!(!draft.is_empty());

        draft.clear();
        assert!(draft.is_empty());
    }

    #[test]
    fn field_names_round_trip() {
        for field in DraftField::ALL {
            assert_eq!(DraftField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(DraftField::from_name("category"), None);
    }
}
