//! Server-hosted post-ad wizard sessions.
//!
//! Each session owns one [`WizardController`] and belongs to the user who
//! created it. Sessions live only in memory: they are removed on successful
//! submission, on abandonment, or by the idle sweeper in
//! [`crate::background::draft_expiry`].
//!
//! The registry lock is never held across a gateway call. Submission takes
//! the lock to enter the `Submitting` phase, releases it for the insert, and
//! takes it again to record the outcome, so a concurrent second submit sees
//! `Submitting` and is refused. The insert and the outcome run in their own
//! task under a timeout, so a dropped request cannot strand a session in
//! `Submitting`.

pub mod gateway;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use sokoni_core::draft::Draft;
use sokoni_core::error::CoreError;
use sokoni_core::forms::StepForm;
use sokoni_core::gateway::{GatewayError, SubmissionGateway};
use sokoni_core::listing::FieldViolation;
use sokoni_core::types::{DbId, ListingId, MediaRef, Timestamp};
use sokoni_core::wizard::{WizardController, WizardError};
use tokio::sync::RwLock;
use uuid::Uuid;

pub use gateway::RepoSubmissionGateway;

/// Entity name used in not-found errors.
const ENTITY: &str = "DraftSession";

/// Default bound on a single submission's gateway call.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's in-progress ad.
#[derive(Debug)]
pub struct DraftSession {
    pub id: Uuid,
    pub owner_id: DbId,
    pub wizard: WizardController,
    pub created_at: Timestamp,
    /// Last time the owner touched the session; drives idle expiry.
    pub touched_at: Timestamp,
}

impl DraftSession {
    fn new(owner_id: DbId) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            wizard: WizardController::new(),
            created_at: now,
            touched_at: now,
        }
    }

    pub fn view(&self) -> DraftView {
        let step = self.wizard.current_step();
        DraftView {
            id: self.id,
            phase: self.wizard.phase().as_str(),
            step: step.map(|s| s.to_number()),
            step_label: step.map(|s| s.label()),
            form: step.and_then(|s| s.form()).copied(),
            draft: self.wizard.draft().clone(),
            issues: self.wizard.issues(),
            last_error: self.wizard.last_error().map(str::to_string),
            created_at: self.created_at,
            updated_at: self.touched_at,
        }
    }
}

/// Serialized snapshot of a session returned by the draft endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DraftView {
    pub id: Uuid,
    pub phase: &'static str,
    pub step: Option<u8>,
    pub step_label: Option<&'static str>,
    pub form: Option<StepForm>,
    pub draft: Draft,
    pub issues: Vec<FieldViolation>,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Field updates
// ---------------------------------------------------------------------------

/// Whole-field replacements for any subset of draft fields.
///
/// Absent keys are left alone; `"price": null` clears the price.
#[derive(Debug, Default, Deserialize)]
pub struct DraftFieldsUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<MediaRef>>,
    pub videos: Option<Vec<MediaRef>>,
}

impl DraftFieldsUpdate {
    pub fn apply(self, draft: &mut Draft) {
        if let Some(title) = self.title {
            draft.set_title(title);
        }
        if let Some(description) = self.description {
            draft.set_description(description);
        }
        if let Some(price) = self.price {
            draft.set_price(price);
        }
        if let Some(location) = self.location {
            draft.set_location(location);
        }
        if let Some(condition) = self.condition {
            draft.set_condition(condition);
        }
        if let Some(tags) = self.tags {
            draft.set_tags(tags);
        }
        if let Some(images) = self.images {
            draft.set_images(images);
        }
        if let Some(videos) = self.videos {
            draft.set_videos(videos);
        }
    }
}

/// Distinguish a present `null` from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All live draft sessions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct DraftRegistry {
    sessions: RwLock<HashMap<Uuid, DraftSession>>,
    /// Upper bound on one gateway call made by [`submit`](Self::submit).
    submit_timeout: Duration,
}

impl Default for DraftRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::with_submit_timeout(DEFAULT_SUBMIT_TIMEOUT)
    }

    pub fn with_submit_timeout(submit_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            submit_timeout,
        }
    }

    /// Start a new wizard session for `owner_id`.
    pub async fn create(&self, owner_id: DbId) -> DraftView {
        let session = DraftSession::new(owner_id);
        let view = session.view();
        self.sessions.write().await.insert(session.id, session);
        view
    }

    /// Snapshot a session owned by `owner_id`.
    pub async fn view(&self, id: Uuid, owner_id: DbId) -> Result<DraftView, CoreError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|s| s.owner_id == owner_id)
            .map(DraftSession::view)
            .ok_or_else(|| not_found(id))
    }

    /// Run `f` against a session owned by `owner_id`, marking it as touched.
    ///
    /// Sessions that end up closed (abandoned) are removed.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        owner_id: DbId,
        f: impl FnOnce(&mut DraftSession) -> R,
    ) -> Result<(R, DraftView), CoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.owner_id == owner_id)
            .ok_or_else(|| not_found(id))?;

        session.touched_at = chrono::Utc::now();
        let out = f(session);
        let view = session.view();

        if session.wizard.phase().is_closed() {
            sessions.remove(&id);
            tracing::debug!(draft_id = %id, phase = view.phase, "Draft session closed");
        }
        Ok((out, view))
    }

    /// Submit a session's draft through `gateway`.
    ///
    /// The gateway call and the recording of its outcome run in a spawned
    /// task bounded by the submit timeout, so the session always leaves
    /// `Submitting` even if the caller is dropped mid-request.
    ///
    /// On success the session is removed and the new listing id returned.
    /// On failure the session stays on the preview step with its draft.
    pub async fn submit<G>(
        self: &Arc<Self>,
        id: Uuid,
        owner_id: DbId,
        gateway: Arc<G>,
    ) -> Result<ListingId, SubmitError>
    where
        G: SubmissionGateway + 'static,
    {
        let (payload, _) = self
            .with_session(id, owner_id, |s| s.wizard.begin_submission())
            .await?;
        let payload = payload?;

        let registry = Arc::clone(self);
        let task = tokio::spawn(async move {
            let call = gateway.create_listing(&payload);
            let result = tokio::time::timeout(registry.submit_timeout, call)
                .await
                .unwrap_or_else(|_| {
                    Err(GatewayError::Network(
                        "The listing service did not answer in time".to_string(),
                    ))
                });
            registry.finish_submission(id, result).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(draft_id = %id, error = %e, "Submission task failed");
                self.finish_submission(id, Err(GatewayError::Unexpected(e.to_string())))
                    .await
            }
        }
    }

    /// Record a gateway answer on the session that is waiting for it.
    async fn finish_submission(
        &self,
        id: Uuid,
        result: Result<ListingId, GatewayError>,
    ) -> Result<ListingId, SubmitError> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(&id) else {
            // Swept by idle expiry while the gateway call was outstanding.
            tracing::warn!(draft_id = %id, "Draft session expired during submission");
            return result.map_err(|e| SubmitError::Wizard(e.into()));
        };

        session.touched_at = chrono::Utc::now();
        let outcome = session.wizard.complete_submission(result);
        if outcome.is_ok() {
            sessions.remove(&id);
        }
        outcome.map_err(SubmitError::Wizard)
    }

    /// Drop a session owned by `owner_id`, abandoning its draft.
    pub async fn abandon(&self, id: Uuid, owner_id: DbId) -> Result<(), SubmitError> {
        let (result, _) = self
            .with_session(id, owner_id, |s| s.wizard.abandon())
            .await?;
        result.map_err(SubmitError::Wizard)
    }

    /// Remove sessions untouched since `cutoff`, whatever their phase.
    ///
    /// Returns the number of sessions removed.
    pub async fn expire_idle(&self, cutoff: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.touched_at >= cutoff);
        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Failure from a registry operation that can hit either layer.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}

impl From<SubmitError> for crate::error::AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Core(e) => e.into(),
            SubmitError::Wizard(e) => e.into(),
        }
    }
}

fn not_found(id: Uuid) -> CoreError {
    CoreError::NotFoundByKey {
        entity: ENTITY,
        key: id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
