//! Step forms for the ad-posting wizard.
//!
//! A form is stateless: it reads the current value of the one draft field it
//! edits and writes user input back through the draft setter. Only `title`
//! (step 1) and `description` (step 2) have forms; the remaining fields are
//! edited through the [`Draft`] setters directly.

use serde::Serialize;

use crate::draft::{Draft, DraftField};
use crate::listing::{DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};

/// Describes the editable control a wizard step renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepForm {
    pub field: DraftField,
    pub label: &'static str,
    pub multiline: bool,
    /// Input beyond this many characters is dropped, like a bounded text box.
    pub max_chars: usize,
}

pub const TITLE_FORM: StepForm = StepForm {
    field: DraftField::Title,
    label: "Title",
    multiline: false,
    max_chars: TITLE_MAX_CHARS,
};

pub const DESCRIPTION_FORM: StepForm = StepForm {
    field: DraftField::Description,
    label: "Description",
    multiline: true,
    max_chars: DESCRIPTION_MAX_CHARS,
};

impl StepForm {
    /// The value the control should display.
    pub fn current_value<'a>(&self, draft: &'a Draft) -> &'a str {
        match self.field {
            DraftField::Title => draft.title(),
            DraftField::Description => draft.description(),
            // Forms only exist for text fields.
            _ => "",
        }
    }

    /// Write user input back into the draft.
    pub fn apply(&self, draft: &mut Draft, input: &str) {
        let value = truncate_chars(input, self.max_chars);
        match self.field {
            DraftField::Title => draft.set_title(value),
            DraftField::Description => draft.set_description(value),
            _ => {}
        }
    }
}

/// Input produced by a step form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    Title(String),
    Description(String),
}

impl StepInput {
    pub fn form(&self) -> &'static StepForm {
        match self {
            Self::Title(_) => &TITLE_FORM,
            Self::Description(_) => &DESCRIPTION_FORM,
        }
    }

    pub fn field(&self) -> DraftField {
        self.form().field
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Title(v) | Self::Description(v) => v,
        }
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_form_reads_and_writes_title() {
        let mut draft = Draft::new();
        TITLE_FORM.apply(&mut draft, "Bike");
        assert_eq!(TITLE_FORM.current_value(&draft), "Bike");
        assert_eq!(draft.description(), "");
    }

    #[test]
    fn description_form_is_multiline_and_bounded() {
        assert!(DESCRIPTION_FORM.multiline);

        let mut draft = Draft::new();
        let long = "a".repeat(DESCRIPTION_MAX_CHARS + 50);
        DESCRIPTION_FORM.apply(&mut draft, &long);
        assert_eq!(draft.description().chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 5), "ab");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn step_input_maps_to_its_form() {
        let input = StepInput::Description("line one\nline two".into());
        assert_eq!(input.field(), DraftField::Description);
        assert_eq!(input.value(), "line one\nline two");
    }
}
