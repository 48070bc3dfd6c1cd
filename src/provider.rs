//! Seams to the outside world: the generation provider and the host's
//! credential-selection capability.

use std::future::Future;

use crate::error::{Result, StudioError};
use crate::types::{GenerationRequest, JobSnapshot};

/// A service that runs image-to-video jobs asynchronously.
///
/// [`crate::VeoClient`] talks to the real API; tests script their own.
pub trait GenerationProvider: Send + Sync {
    /// Start a job. Returns the provider's initial snapshot of it.
    fn submit(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<JobSnapshot>> + Send;

    /// Query a job again using the last snapshot seen.
    fn poll(&self, snapshot: &JobSnapshot) -> impl Future<Output = Result<JobSnapshot>> + Send;
}

/// Host-provided capability for checking and (re)selecting an API key.
pub trait CredentialProvider: Send + Sync {
    /// Whether a credential is currently selected.
    fn has_credential(&self) -> impl Future<Output = bool> + Send;

    /// Ask the host to let the user select a credential. Resolves once the
    /// selection flow has finished.
    fn request_credential(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Credential backed by a fixed, optional API key.
///
/// There is no interactive selection flow: requesting a credential only
/// succeeds when a key was configured up front.
#[derive(Clone, Default)]
pub struct StaticCredential {
    api_key: Option<String>,
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredential")
            .field("has_key", &self.api_key.is_some())
            .finish()
    }
}

impl StaticCredential {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl CredentialProvider for StaticCredential {
    async fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request_credential(&self) -> Result<()> {
        if self.api_key.is_some() {
            tracing::warn!("Credential re-selection requested; keeping configured API key");
            Ok(())
        } else {
            tracing::warn!("Credential selection requested but no API key is configured");
            Err(StudioError::Authentication(
                "No API key configured. Set API_KEY or GEMINI_API_KEY.".into(),
            ))
        }
    }
}
