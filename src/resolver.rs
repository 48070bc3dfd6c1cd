use crate::error::{Result, StudioError, ENTITY_NOT_FOUND_MARKER};
use crate::types::{ArtifactRef, JobStatus};

/// Turn a terminal [`JobStatus`] into an artifact or a classified error.
///
/// Only the first artifact is considered; a `Succeeded` job whose first
/// artifact has no URI is still a failure. Pure: the same
/// status always resolves the same way.
pub fn resolve(status: &JobStatus) -> Result<ArtifactRef> {
    match status {
        JobStatus::Succeeded { artifacts } => artifacts
            .first()
            .and_then(|a| a.uri.as_deref())
            .filter(|u| !u.is_empty())
            .map(ArtifactRef::new)
            .ok_or(StudioError::NoArtifact),
        JobStatus::Failed { reason } => Err(classify_failure(reason)),
        JobStatus::Faulted { reason } if reason.contains(ENTITY_NOT_FOUND_MARKER) => {
            Err(StudioError::Credential(reason.clone()))
        }
        JobStatus::Faulted { reason } => Err(StudioError::Provider(reason.clone())),
        JobStatus::Cancelled => Err(StudioError::Cancelled),
        JobStatus::Pending | JobStatus::Running { .. } => Err(StudioError::InvalidResponse(
            "Job has not reached a terminal state".into(),
        )),
    }
}

fn classify_failure(reason: &str) -> StudioError {
    if reason.contains(ENTITY_NOT_FOUND_MARKER) {
        StudioError::Credential(reason.to_string())
    } else {
        StudioError::Generation(reason.to_string())
    }
}
