//! The cinematic studio: one observable generation session at a time.
//!
//! [`StudioController`] runs submit → poll → resolve for the current
//! session and publishes every step through a `tokio::sync::watch`
//! channel. Each session owns a [`CancellationToken`]; closing the studio
//! or starting a new generation cancels it, and updates from any session
//! other than the current one are dropped.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::poller::JobPoller;
use crate::provider::{CredentialProvider, GenerationProvider};
use crate::resolver::resolve;
use crate::submitter::JobSubmitter;
use crate::types::{ArtifactRef, GenerationRequest, JobStatus};

const STATUS_INITIALIZING: &str = "Initializing Cinematic Studio...";
const STATUS_UPLOADING: &str = "Uploading assets to Veo...";
const STATUS_PROCESSING: &str = "Processing final video...";
const STATUS_READY: &str = "Your cinematic video is ready.";

/// Where the current session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudioPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Resolving,
    Completed,
    Failed,
}

/// Coarse failure category exposed to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Authentication,
    Credential,
    Provider,
    NoArtifact,
    Generation,
}

impl From<&StudioError> for FailureKind {
    fn from(err: &StudioError) -> Self {
        match err {
            StudioError::Validation(_) => FailureKind::Validation,
            StudioError::Authentication(_) => FailureKind::Authentication,
            StudioError::NoArtifact => FailureKind::NoArtifact,
            e if e.is_entity_not_found() => FailureKind::Credential,
            e if e.is_provider_fault() => FailureKind::Provider,
            _ => FailureKind::Generation,
        }
    }
}

/// Observable snapshot of the studio.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudioState {
    /// Id of the session that produced this state. `0` when idle.
    pub session: u64,
    pub phase: StudioPhase,
    pub status_message: String,
    pub job: Option<JobStatus>,
    /// Number of progress ticks emitted so far in this session.
    pub ticks: u64,
    pub artifact: Option<ArtifactRef>,
    pub failure: Option<FailureKind>,
    pub error_detail: Option<String>,
}

impl StudioState {
    /// Whether a session is between start and a terminal phase.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            StudioPhase::Submitting | StudioPhase::Polling | StudioPhase::Resolving
        )
    }
}

/// The single active generation attempt.
#[derive(Debug)]
pub struct StudioSession {
    pub id: u64,
    pub request: Arc<GenerationRequest>,
    cancel: CancellationToken,
}

/// What a freshly begun session needs to run.
struct Launch {
    id: u64,
    cancel: CancellationToken,
    request: Arc<GenerationRequest>,
}

#[derive(Debug, Default)]
struct Sessions {
    active: Option<StudioSession>,
    last_id: u64,
}

impl Sessions {
    fn is_current(&self, id: u64) -> bool {
        self.active.as_ref().is_some_and(|s| s.id == id)
    }
}

/// Orchestrates the submitter, poller and resolver for one overlay.
///
/// Cheap to clone; clones share the same session and state channel.
pub struct StudioController<P, C> {
    provider: Arc<P>,
    credentials: Arc<C>,
    submitter: JobSubmitter<P, C>,
    poller: JobPoller,
    sessions: Arc<Mutex<Sessions>>,
    state_tx: Arc<watch::Sender<StudioState>>,
}

impl<P, C> Clone for StudioController<P, C> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            credentials: Arc::clone(&self.credentials),
            submitter: self.submitter.clone(),
            poller: self.poller.clone(),
            sessions: Arc::clone(&self.sessions),
            state_tx: Arc::clone(&self.state_tx),
        }
    }
}

impl<P, C> StudioController<P, C>
where
    P: GenerationProvider,
    C: CredentialProvider,
{
    pub fn new(provider: Arc<P>, credentials: Arc<C>, config: &StudioConfig) -> Self {
        let (state_tx, _) = watch::channel(StudioState::default());
        Self {
            submitter: JobSubmitter::new(Arc::clone(&provider), Arc::clone(&credentials)),
            provider,
            credentials,
            poller: JobPoller::new(config.poll_interval),
            sessions: Arc::new(Mutex::new(Sessions::default())),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Current observable state.
    pub fn state(&self) -> StudioState {
        self.state_tx.borrow().clone()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<StudioState> {
        self.state_tx.subscribe()
    }

    /// Request of the active session, if any.
    pub fn current_request(&self) -> Option<Arc<GenerationRequest>> {
        self.lock_sessions()
            .active
            .as_ref()
            .map(|s| Arc::clone(&s.request))
    }

    /// Run a full generation in the calling task and return the final state.
    ///
    /// Without a source image this is a no-op and the state is unchanged.
    /// Any previous session is cancelled first.
    pub async fn generate(&self, request: GenerationRequest) -> StudioState {
        if let Some(launch) = self.begin(request) {
            self.run(launch).await;
        }
        self.state()
    }

    /// Close the overlay: cancel the active session and reset to `Idle`.
    pub fn close(&self) {
        let mut sessions = self.lock_sessions();
        if let Some(session) = sessions.active.take() {
            tracing::info!(session = session.id, "Closing studio, cancelling session");
            session.cancel.cancel();
        }
        self.state_tx.send_replace(StudioState::default());
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, Sessions> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, request: GenerationRequest) -> Option<Launch> {
        if !request.has_image() {
            tracing::debug!("Generate requested without a source image, ignoring");
            return None;
        }

        let mut sessions = self.lock_sessions();
        if let Some(previous) = sessions.active.take() {
            tracing::info!(session = previous.id, "Abandoning previous session");
            previous.cancel.cancel();
        }
        sessions.last_id += 1;
        let id = sessions.last_id;
        let cancel = CancellationToken::new();
        let request = Arc::new(request);
        sessions.active = Some(StudioSession {
            id,
            request: Arc::clone(&request),
            cancel: cancel.clone(),
        });

        self.state_tx.send_replace(StudioState {
            session: id,
            phase: StudioPhase::Submitting,
            status_message: STATUS_INITIALIZING.to_string(),
            job: Some(JobStatus::Pending),
            ..Default::default()
        });
        tracing::info!(session = id, "Studio session started");
        Some(Launch {
            id,
            cancel,
            request,
        })
    }

    /// Apply `update` only if `id` is still the active session.
    fn publish<F>(&self, id: u64, update: F) -> bool
    where
        F: FnOnce(&mut StudioState),
    {
        let sessions = self.lock_sessions();
        if !sessions.is_current(id) {
            return false;
        }
        self.state_tx.send_modify(update);
        true
    }

    async fn run(&self, launch: Launch) {
        let Launch {
            id,
            cancel,
            request,
        } = launch;
        self.publish(id, |s| s.status_message = STATUS_UPLOADING.to_string());

        let submitted = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = self.submitter.submit(&request) => result,
        };
        let snapshot = match submitted {
            Ok(snapshot) => snapshot,
            Err(e) => return self.fail(id, e).await,
        };
        tracing::info!(session = id, job = %snapshot.name, "Job submitted");

        self.publish(id, |s| s.phase = StudioPhase::Polling);

        let status = self
            .poller
            .poll_until_done(self.provider.as_ref(), snapshot, &cancel, |tick| {
                self.publish(id, |s| {
                    if let JobStatus::Running { progress_message } = tick {
                        s.status_message = progress_message.clone();
                    }
                    s.job = Some(tick.clone());
                    s.ticks += 1;
                });
            })
            .await;

        if matches!(status, JobStatus::Cancelled) || cancel.is_cancelled() {
            tracing::info!(session = id, "Session cancelled");
            return;
        }

        self.publish(id, |s| {
            s.phase = StudioPhase::Resolving;
            s.status_message = STATUS_PROCESSING.to_string();
            s.job = Some(status.clone());
        });

        match resolve(&status) {
            Ok(artifact) => {
                tracing::info!(session = id, uri = %artifact.uri, "Generation completed");
                self.publish(id, |s| {
                    s.phase = StudioPhase::Completed;
                    s.status_message = STATUS_READY.to_string();
                    s.artifact = Some(artifact);
                });
            }
            Err(e) => self.fail(id, e).await,
        }
    }

    async fn fail(&self, id: u64, err: StudioError) {
        if !self.lock_sessions().is_current(id) {
            return;
        }
        tracing::error!(session = id, error = %err, "Generation failed");

        if err.is_entity_not_found() {
            tracing::warn!(session = id, "Provider could not find the entity, re-selecting credential");
            if let Err(e) = self.credentials.request_credential().await {
                tracing::warn!(session = id, error = %e, "Credential selection did not complete");
            }
        }

        let kind = FailureKind::from(&err);
        self.publish(id, |s| {
            s.phase = StudioPhase::Failed;
            s.status_message = err.user_message().to_string();
            s.failure = Some(kind);
            s.error_detail = Some(err.to_string());
        });
    }
}

impl<P, C> StudioController<P, C>
where
    P: GenerationProvider + 'static,
    C: CredentialProvider + 'static,
{
    /// Spawn [`generate`](Self::generate) on the runtime so the caller stays
    /// responsive. Returns `None` when there is no source image.
    pub fn start(&self, request: GenerationRequest) -> Option<JoinHandle<()>> {
        let launch = self.begin(request)?;
        let this = self.clone();
        Some(tokio::spawn(async move {
            this.run(launch).await;
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_mapping() {
        assert_eq!(FailureKind::from(&StudioError::NoArtifact), FailureKind::NoArtifact);
        assert_eq!(
            FailureKind::from(&StudioError::Provider("503".into())),
            FailureKind::Provider
        );
        assert_eq!(
            FailureKind::from(&StudioError::Http {
                status: 404,
                body: "Requested entity was not found.".into()
            }),
            FailureKind::Credential
        );
        assert_eq!(
            FailureKind::from(&StudioError::Generation("blocked".into())),
            FailureKind::Generation
        );
    }

    #[test]
    fn test_default_state_is_idle() {
        let state = StudioState::default();
        assert_eq!(state.phase, StudioPhase::Idle);
        assert_eq!(state.session, 0);
        assert!(!state.is_busy());
    }
}
