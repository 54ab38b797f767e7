//! The post-ad wizard controller.
//!
//! [`WizardController`] owns one [`Draft`] for the lifetime of an authoring
//! session and sequences it through the steps:
//!
//! ```text
//! Title (1) -> Description (2) -> Preview (3) -> Submitting -> Submitted
//!     \______________ back from step 1 / abandon ______________> Abandoned
//! ```
//!
//! `next` is gated by the constraints of the fields the current step owns.
//! Submission is split into [`begin_submission`](WizardController::begin_submission)
//! and [`complete_submission`](WizardController::complete_submission) so a
//! caller can release its lock on the controller while the gateway call is in
//! flight; the `Submitting` phase rejects a second submit until the first
//! resolves.

use serde::Serialize;

use crate::draft::{Draft, DraftField};
use crate::forms::{StepForm, StepInput, DESCRIPTION_FORM, TITLE_FORM};
use crate::gateway::{GatewayError, SubmissionGateway};
use crate::listing::{FieldViolation, ListingValidationError, NewListing};
use crate::types::ListingId;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The editing steps of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Title,
    Description,
    Preview,
}

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based). Submission happens here.
pub const MAX_STEP: u8 = 3;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Title),
            2 => Some(Self::Description),
            3 => Some(Self::Preview),
            _ => None,
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Title => 1,
            Self::Description => 2,
            Self::Preview => 3,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Preview => "Preview",
        }
    }

    /// The form this step renders, if it edits a field.
    pub fn form(self) -> Option<&'static StepForm> {
        match self {
            Self::Title => Some(&TITLE_FORM),
            Self::Description => Some(&DESCRIPTION_FORM),
            Self::Preview => None,
        }
    }

    /// Fields whose constraints gate leaving this step forward.
    pub fn owned_fields(self) -> &'static [DraftField] {
        match self {
            Self::Title => &[DraftField::Title],
            Self::Description => &[DraftField::Description],
            Self::Preview => &[],
        }
    }

    /// Wrap raw form text as this step's input. `None` on the preview step.
    pub fn input(self, value: impl Into<String>) -> Option<StepInput> {
        match self {
            Self::Title => Some(StepInput::Title(value.into())),
            Self::Description => Some(StepInput::Description(value.into())),
            Self::Preview => None,
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.to_number() + 1)
    }

    fn prev(self) -> Option<Self> {
        Self::from_number(self.to_number() - 1)
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a wizard session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum WizardPhase {
    Editing { step: WizardStep },
    Submitting,
    Submitted { listing_id: ListingId },
    Abandoned,
}

impl WizardPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editing { .. } => "editing",
            Self::Submitting => "submitting",
            Self::Submitted { .. } => "submitted",
            Self::Abandoned => "abandoned",
        }
    }

    /// Whether the session has ended (submitted or abandoned).
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Submitted { .. } | Self::Abandoned)
    }
}

/// Result of navigating backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Moved to the given step.
    Moved(WizardStep),
    /// Went back past the first step; the draft was discarded.
    Exited,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ListingValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("Step {step} does not edit '{field}'")]
    WrongStep { step: u8, field: DraftField },

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("The wizard session has ended")]
    Closed,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives one draft through the wizard. Owns the draft exclusively.
#[derive(Debug, Clone)]
pub struct WizardController {
    draft: Draft,
    phase: WizardPhase,
    last_error: Option<String>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Enter the wizard with an empty draft on step 1.
    pub fn new() -> Self {
        Self::with_draft(Draft::new())
    }

    /// Enter the wizard on step 1 with an existing draft.
    pub fn with_draft(draft: Draft) -> Self {
        Self {
            draft,
            phase: WizardPhase::Editing {
                step: WizardStep::Title,
            },
            last_error: None,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// The step being edited, or `None` outside the editing phase.
    pub fn current_step(&self) -> Option<WizardStep> {
        match self.phase {
            WizardPhase::Editing { step } => Some(step),
            _ => None,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Mutable access to the draft for fields without a step form.
    pub fn draft_mut(&mut self) -> Result<&mut Draft, WizardError> {
        self.ensure_editing("edit the draft")?;
        Ok(&mut self.draft)
    }

    /// The message from the most recent failed submission.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current constraint failures across the whole draft.
    pub fn issues(&self) -> Vec<FieldViolation> {
        NewListing::from_draft_unchecked(&self.draft).violations()
    }

    /// Apply input from the current step's form.
    pub fn edit(&mut self, input: StepInput) -> Result<(), WizardError> {
        let step = self.ensure_editing("edit the draft")?;
        let form = input.form();
        if step.form().map(|f| f.field) != Some(form.field) {
            return Err(WizardError::WrongStep {
                step: step.to_number(),
                field: form.field,
            });
        }
        form.apply(&mut self.draft, input.value());
        Ok(())
    }

    /// Apply raw text to whichever form the current step shows.
    pub fn edit_current(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let step = self.ensure_editing("edit the draft")?;
        let input = step.input(value).ok_or(WizardError::InvalidTransition {
            action: "edit the draft",
            phase: "on the preview step",
        })?;
        self.edit(input)
    }

    /// Advance one step, if the current step's fields pass their constraints.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.ensure_editing("advance")?;
        let next = step.next().ok_or(WizardError::InvalidTransition {
            action: "advance",
            phase: "on the preview step",
        })?;

        if let Err(err) = NewListing::from_draft(&self.draft) {
            if let Some(blocking) = err.restricted_to(step.owned_fields()) {
                tracing::debug!(
                    step = step.to_number(),
                    fields = ?blocking.failing_fields(),
                    "Wizard advance blocked by validation"
                );
                return Err(blocking.into());
            }
        }

        self.phase = WizardPhase::Editing { step: next };
        tracing::debug!(
            from_step = step.to_number(),
            to_step = next.to_number(),
            "Wizard advanced"
        );
        Ok(next)
    }

    /// Go back one step. Going back from step 1 abandons the wizard.
    pub fn back(&mut self) -> Result<Navigation, WizardError> {
        let step = self.ensure_editing("go back")?;
        match step.prev() {
            Some(prev) => {
                self.phase = WizardPhase::Editing { step: prev };
                tracing::debug!(
                    from_step = step.to_number(),
                    to_step = prev.to_number(),
                    "Wizard went back"
                );
                Ok(Navigation::Moved(prev))
            }
            None => {
                self.discard();
                Ok(Navigation::Exited)
            }
        }
    }

    /// Leave the wizard, discarding the draft.
    pub fn abandon(&mut self) -> Result<(), WizardError> {
        self.ensure_editing("abandon")?;
        self.discard();
        Ok(())
    }

    /// Validate the whole draft and enter the `Submitting` phase.
    ///
    /// Returns the payload to hand to the gateway. On validation failure the
    /// wizard stays on the preview step and the gateway must not be called.
    pub fn begin_submission(&mut self) -> Result<NewListing, WizardError> {
        let step = self.ensure_editing("submit")?;
        if step != WizardStep::Preview {
            return Err(WizardError::InvalidTransition {
                action: "submit",
                phase: "before the preview step",
            });
        }

        let listing = NewListing::from_draft(&self.draft)?;
        self.last_error = None;
        self.phase = WizardPhase::Submitting;
        tracing::debug!("Wizard submission started");
        Ok(listing)
    }

    /// Record the gateway's answer to the in-flight submission.
    ///
    /// Success resets the draft and closes the session. Failure returns to
    /// the preview step with the draft untouched so the user can retry.
    pub fn complete_submission(
        &mut self,
        result: Result<ListingId, GatewayError>,
    ) -> Result<ListingId, WizardError> {
        if self.phase != WizardPhase::Submitting {
            return Err(WizardError::InvalidTransition {
                action: "complete a submission",
                phase: "no submission is in flight",
            });
        }

        match result {
            Ok(listing_id) => {
                self.draft.clear();
                self.phase = WizardPhase::Submitted { listing_id };
                tracing::info!(listing_id, "Wizard submission succeeded");
                Ok(listing_id)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.phase = WizardPhase::Editing {
                    step: WizardStep::Preview,
                };
                tracing::warn!(error = %err, "Wizard submission failed; draft kept for retry");
                Err(err.into())
            }
        }
    }

    /// Validate, call the gateway, and record the outcome.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<ListingId, WizardError>
    where
        G: SubmissionGateway + ?Sized,
    {
        let listing = self.begin_submission()?;
        let result = gateway.create_listing(&listing).await;
        self.complete_submission(result)
    }

    fn ensure_editing(&self, action: &'static str) -> Result<WizardStep, WizardError> {
        match self.phase {
            WizardPhase::Editing { step } => Ok(step),
            WizardPhase::Submitting => Err(WizardError::SubmissionInFlight),
            WizardPhase::Submitted { .. } | WizardPhase::Abandoned => {
                tracing::debug!(action, "Wizard action on closed session");
                Err(WizardError::Closed)
            }
        }
    }

    fn discard(&mut self) {
        self.draft.clear();
        self.phase = WizardPhase::Abandoned;
        tracing::debug!("Wizard abandoned; draft discarded");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;

    /// Gateway stub that counts calls and returns a fixed result.
    struct StubGateway {
        result: Result<ListingId, GatewayError>,
        calls: AtomicUsize,
    }

    impl StubGateway {
        fn ok(id: ListingId) -> Self {
            Self {
                result: Ok(id),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(err: GatewayError) -> Self {
            Self {
                result: Err(err),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SubmissionGateway for StubGateway {
        async fn create_listing(&self, _listing: &NewListing) -> Result<ListingId, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn complete_draft() -> Draft {
        let mut draft = Draft::new();
        draft.set_title("Bike");
        draft.set_description("Red mountain bike");
        draft.set_price(Some(120.0));
        draft.set_location("Nairobi");
        draft.set_condition("used");
        draft.set_tags(["bike", "sports"]);
        draft.set_images(Vec::<String>::new());
        draft.set_videos(Vec::<String>::new());
        draft
    }

    /// A controller sitting on the preview step with the given draft.
    fn at_preview(draft: Draft) -> WizardController {
        let mut wizard = WizardController::with_draft(draft);
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.current_step(), Some(WizardStep::Preview));
        wizard
    }

    // -- WizardStep --

    #[test]
    fn step_to_number_roundtrip() {
        for n in MIN_STEP..=MAX_STEP {
            let step = WizardStep::from_number(n).unwrap();
            assert_eq!(step.to_number(), n);
            assert!(!step.label().is_empty());
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(MAX_STEP + 1), None);
    }

    #[test]
    fn only_first_two_steps_have_forms() {
        assert_eq!(WizardStep::Title.form().unwrap().field, DraftField::Title);
        assert_eq!(
            WizardStep::Description.form().unwrap().field,
            DraftField::Description
        );
        assert!(WizardStep::Preview.form().is_none());
    }

    #[test]
    fn step_input_matches_the_step_form() {
        let input = WizardStep::Description.input("Runs well").unwrap();
        assert_eq!(input.field(), DraftField::Description);
        assert!(WizardStep::Preview.input("x").is_none());
    }

    // -- navigation --

    #[test]
    fn starts_on_step_one() {
        let wizard = WizardController::new();
        assert_eq!(wizard.current_step(), Some(WizardStep::Title));
        assert!(wizard.draft().is_empty());
    }

    #[test]
    fn next_then_back_leaves_draft_unchanged() {
        let mut wizard = WizardController::new();
        wizard.edit(StepInput::Title("Bike".into())).unwrap();
        wizard.draft_mut().unwrap().set_price(Some(120.0));
        let before = wizard.draft().clone();

        assert_eq!(wizard.next().unwrap(), WizardStep::Description);
        assert_eq!(
            wizard.back().unwrap(),
            Navigation::Moved(WizardStep::Title)
        );

        assert_eq!(wizard.current_step(), Some(WizardStep::Title));
        assert_eq!(wizard.draft(), &before);
    }

    #[test]
    fn next_is_blocked_by_the_current_steps_fields() {
        let mut wizard = WizardController::new();
        let err = wizard.next().unwrap_err();
        assert_matches!(err, WizardError::Validation(ref v) => {
            assert_eq!(v.failing_fields(), vec![DraftField::Title]);
        });
        assert_eq!(wizard.current_step(), Some(WizardStep::Title));
    }

    #[test]
    fn next_ignores_fields_owned_by_later_steps() {
        let mut wizard = WizardController::new();
        wizard.edit(StepInput::Title("Bike".into())).unwrap();
        // Description, location and condition are still empty.
        assert_eq!(wizard.next().unwrap(), WizardStep::Description);
    }

    #[test]
    fn next_on_preview_is_invalid() {
        let mut wizard = at_preview(complete_draft());
        assert_matches!(wizard.next(), Err(WizardError::InvalidTransition { .. }));
    }

    #[test]
    fn back_from_step_one_abandons() {
        let mut wizard = WizardController::new();
        wizard.edit(StepInput::Title("Bike".into())).unwrap();

        assert_eq!(wizard.back().unwrap(), Navigation::Exited);
        assert_eq!(wizard.phase(), WizardPhase::Abandoned);
        assert!(wizard.draft().is_empty());
        assert_matches!(wizard.next(), Err(WizardError::Closed));
    }

    #[test]
    fn abandon_discards_the_draft() {
        let mut wizard = at_preview(complete_draft());
        wizard.abandon().unwrap();
        assert_eq!(wizard.phase(), WizardPhase::Abandoned);
        assert!(wizard.draft().is_empty());
        assert_matches!(wizard.draft_mut(), Err(WizardError::Closed));
    }

    // -- editing --

    #[test]
    fn edit_requires_the_matching_step() {
        let mut wizard = WizardController::new();
        let err = wizard
            .edit(StepInput::Description("too early".into()))
            .unwrap_err();
        assert_matches!(
            err,
            WizardError::WrongStep {
                step: 1,
                field: DraftField::Description
            }
        );
        assert_eq!(wizard.draft().description(), "");
    }

    #[test]
    fn edit_current_targets_the_current_form() {
        let mut wizard = WizardController::new();
        wizard.edit_current("Bike").unwrap();
        wizard.next().unwrap();
        wizard.edit_current("Red bike").unwrap();
        assert_eq!(wizard.draft().title(), "Bike");
        assert_eq!(wizard.draft().description(), "Red bike");

        wizard.next().unwrap();
        assert_matches!(
            wizard.edit_current("x"),
            Err(WizardError::InvalidTransition { .. })
        );
    }

    #[test]
    fn description_form_truncates_input() {
        let mut wizard = WizardController::new();
        wizard.edit(StepInput::Title("Bike".into())).unwrap();
        wizard.next().unwrap();
        wizard
            .edit(StepInput::Description("x".repeat(5000)))
            .unwrap();
        assert_eq!(
            wizard.draft().description().chars().count(),
            crate::listing::DESCRIPTION_MAX_CHARS
        );
    }

    #[test]
    fn issues_reflect_the_whole_draft() {
        let wizard = WizardController::new();
        let fields: Vec<DraftField> = wizard.issues().iter().map(|v| v.field).collect();
        assert!(fields.contains(&DraftField::Title));
        assert!(fields.contains(&DraftField::Condition));

        let wizard = WizardController::with_draft(complete_draft());
        assert!(wizard.issues().is_empty());
    }

    // -- submission --

    #[tokio::test]
    async fn complete_draft_submits_and_resets() {
        let gateway = StubGateway::ok(42);
        let mut wizard = at_preview(complete_draft());

        let id = wizard.submit(&gateway).await.unwrap();

        assert_eq!(id, 42);
        assert_eq!(wizard.phase(), WizardPhase::Submitted { listing_id: 42 });
        assert!(wizard.draft().is_empty());
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn empty_title_never_reaches_the_gateway() {
        let gateway = StubGateway::ok(1);
        let mut wizard = at_preview(complete_draft());
        wizard.draft_mut().unwrap().set_title("");

        let err = wizard.submit(&gateway).await.unwrap_err();

        assert_matches!(err, WizardError::Validation(ref v) => {
            assert_eq!(v.failing_fields(), vec![DraftField::Title]);
        });
        assert_eq!(gateway.calls(), 0);
        assert_eq!(wizard.current_step(), Some(WizardStep::Preview));
    }

    #[tokio::test]
    async fn gateway_failure_keeps_draft_for_retry() {
        let gateway = StubGateway::failing(GatewayError::Network("offline".into()));
        let mut wizard = at_preview(complete_draft());

        let err = wizard.submit(&gateway).await.unwrap_err();

        assert_matches!(err, WizardError::Gateway(GatewayError::Network(_)));
        assert_eq!(wizard.current_step(), Some(WizardStep::Preview));
        assert_eq!(wizard.draft(), &complete_draft());
        assert_eq!(wizard.last_error(), Some("Network error: offline"));

        // Retry succeeds and clears the error.
        let retry = StubGateway::ok(7);
        assert_eq!(wizard.submit(&retry).await.unwrap(), 7);
        assert_eq!(wizard.last_error(), None);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut wizard = at_preview(complete_draft());
        let payload = wizard.begin_submission().unwrap();
        assert_eq!(payload.title, "Bike");
        assert_eq!(wizard.phase(), WizardPhase::Submitting);

        assert_matches!(
            wizard.begin_submission(),
            Err(WizardError::SubmissionInFlight)
        );
        assert_matches!(wizard.draft_mut(), Err(WizardError::SubmissionInFlight));
        assert_matches!(wizard.back(), Err(WizardError::SubmissionInFlight));

        assert_eq!(wizard.complete_submission(Ok(3)).unwrap(), 3);
    }

    #[test]
    fn submit_before_preview_is_invalid() {
        let mut wizard = WizardController::with_draft(complete_draft());
        assert_matches!(
            wizard.begin_submission(),
            Err(WizardError::InvalidTransition { .. })
        );
    }

    #[test]
    fn complete_without_begin_is_invalid() {
        let mut wizard = at_preview(complete_draft());
        assert_matches!(
            wizard.complete_submission(Ok(1)),
            Err(WizardError::InvalidTransition { .. })
        );
    }

    #[tokio::test]
    async fn submitted_session_is_closed() {
        let gateway = StubGateway::ok(5);
        let mut wizard = at_preview(complete_draft());
        wizard.submit(&gateway).await.unwrap();

        assert_matches!(wizard.submit(&gateway).await, Err(WizardError::Closed));
        assert_matches!(wizard.abandon(), Err(WizardError::Closed));
        assert_eq!(gateway.calls(), 1);
    }
}
