use thiserror::Error;

/// Substring the provider puts in faults when the referenced resource is
/// unknown. Treated as "the selected credential is unusable".
pub const ENTITY_NOT_FOUND_MARKER: &str = "Requested entity was not found";

/// Status text surfaced for any failed generation.
pub const FAILED_STATUS: &str = "Generation failed. Please try again.";

/// Errors returned by studio, provider and stylist operations.
#[derive(Error, Debug)]
pub enum StudioError {
    /// The request is missing required input.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// No usable credential is configured or selectable.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The provider returned a non-success HTTP status.
    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    /// The provider response was missing expected fields.
    #[error("{0}")]
    InvalidResponse(String),

    /// Any other provider-side fault.
    #[error("Provider fault: {0}")]
    Provider(String),

    /// The job reported success but carried no usable artifact.
    #[error("Generation finished without a downloadable artifact")]
    NoArtifact,

    /// The job failed in a way that points at the selected credential.
    #[error("Credential rejected by provider: {0}")]
    Credential(String),

    /// The job failed for any other reason.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The session was closed or replaced before it finished.
    #[error("Generation was cancelled")]
    Cancelled,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudioError {
    /// Whether this error should trigger the credential-selection flow
    /// followed by a single retry.
    pub fn is_authentication(&self) -> bool {
        matches!(self, StudioError::Authentication(_))
    }

    /// Whether the error message carries the provider's entity-not-found
    /// marker. Plain substring match, kept for compatibility.
    pub fn is_entity_not_found(&self) -> bool {
        matches!(self, StudioError::Credential(_))
            || self.to_string().contains(ENTITY_NOT_FOUND_MARKER)
    }

    /// Faults raised by the provider or the transport, as opposed to
    /// local validation or result classification.
    pub fn is_provider_fault(&self) -> bool {
        matches!(
            self,
            StudioError::Http { .. }
                | StudioError::Network { .. }
                | StudioError::InvalidResponse(_)
                | StudioError::Provider(_)
                | StudioError::Json(_)
        )
    }

    /// Short human-readable status text for the view layer.
    pub fn user_message(&self) -> &'static str {
        match self {
            StudioError::Validation(_) => "Upload a source image to start generating.",
            StudioError::Authentication(_) | StudioError::Credential(_) => {
                "Select a valid API key and try again."
            }
            StudioError::NoArtifact => "The studio finished without a video. Please try again.",
            StudioError::Cancelled => "Generation cancelled.",
            _ => FAILED_STATUS,
        }
    }
}

impl From<anyhow::Error> for StudioError {
    fn from(err: anyhow::Error) -> Self {
        StudioError::Provider(err.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StudioError>;
