use std::sync::Arc;

use crate::error::Result;
use crate::provider::{CredentialProvider, GenerationProvider};
use crate::types::{GenerationRequest, JobSnapshot};

/// Validates a request, makes sure a credential is selected, and starts
/// the job on the provider.
pub struct JobSubmitter<P, C> {
    provider: Arc<P>,
    credentials: Arc<C>,
}

impl<P, C> Clone for JobSubmitter<P, C> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<P, C> JobSubmitter<P, C>
where
    P: GenerationProvider,
    C: CredentialProvider,
{
    pub fn new(provider: Arc<P>, credentials: Arc<C>) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Start a job and return the provider's first snapshot.
    ///
    /// A missing image fails with `Validation` before anything else is
    /// touched. If the provider rejects the credential, the selection flow
    /// runs once and the submission is retried exactly once.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobSnapshot> {
        request.validate()?;

        if !self.credentials.has_credential().await {
            tracing::warn!("No credential selected, opening selection flow");
            self.credentials.request_credential().await?;
        }

        match self.provider.submit(request).await {
            Err(e) if e.is_authentication() => {
                tracing::warn!(error = %e, "Submission rejected, re-selecting credential and retrying once");
                self.credentials.request_credential().await?;
                self.provider.submit(request).await
            }
            other => other,
        }
    }
}
