use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, StudioError};

/// Motion prompt used when the user leaves the prompt empty.
pub const DEFAULT_MOTION_PROMPT: &str =
    "Animate this fashion piece in a cinematic slow motion runway setting";

/// Output frame shape offered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output configuration sent alongside the source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub aspect_ratio: AspectRatio,
    /// Resolution tier, e.g. `720p`.
    pub resolution: String,
    /// Number of videos to generate. The studio always asks for one.
    pub variant_count: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Landscape,
            resolution: "720p".to_string(),
            variant_count: 1,
        }
    }
}

/// Raw image payload plus its mime type.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL as produced by browser
    /// file readers.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::Validation("Not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::Validation("Data URL has no payload".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| StudioError::Validation("Data URL is not base64-encoded".into()))?;
        if !mime_type.starts_with("image/") {
            return Err(StudioError::Validation(format!(
                "Unsupported mime type: {}",
                mime_type
            )));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| StudioError::Validation(format!("Invalid base64 payload: {}", e)))?;
        Ok(Self::new(bytes, mime_type))
    }

    /// Read an image from disk, inferring the mime type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mime_type = mime_from_extension(path).ok_or_else(|| {
            StudioError::Validation(format!("Unsupported image file: {}", path.display()))
        })?;
        let bytes = std::fs::read(path).map_err(|e| {
            StudioError::Validation(format!("Failed to read image {}: {}", path.display(), e))
        })?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Everything needed to start an image-to-video job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub image: Option<SourceImage>,
    pub prompt: String,
    pub output: OutputConfig,
}

impl GenerationRequest {
    pub fn new(image: SourceImage) -> Self {
        Self {
            image: Some(image),
            ..Default::default()
        }
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.output.aspect_ratio = aspect_ratio;
        self
    }

    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.output.resolution = resolution.into();
        self
    }

    pub fn output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|img| !img.is_empty())
    }

    /// The prompt actually sent: the user's text, or the canned default.
    pub fn effective_prompt(&self) -> &str {
        let trimmed = self.prompt.trim();
        if trimmed.is_empty() {
            DEFAULT_MOTION_PROMPT
        } else {
            trimmed
        }
    }

    /// Returns the source image, or a validation error when it is missing.
    pub fn validate(&self) -> Result<&SourceImage> {
        match &self.image {
            Some(img) if !img.is_empty() => Ok(img),
            _ => Err(StudioError::Validation("A source image is required".into())),
        }
    }
}

/// One generated output descriptor. The URI may be absent even on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub uri: Option<String>,
}

impl GeneratedArtifact {
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
        }
    }
}

/// Provider-issued snapshot of a long-running job. Replaced on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Opaque operation name used to query the job again.
    pub name: String,
    pub done: bool,
    #[serde(default)]
    pub artifacts: Vec<GeneratedArtifact>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            artifacts: Vec::new(),
            error: None,
        }
    }

    /// Terminal status for a snapshot that reports `done`.
    pub fn terminal_status(&self) -> JobStatus {
        match &self.error {
            Some(reason) => JobStatus::Failed {
                reason: reason.clone(),
            },
            None => JobStatus::Succeeded {
                artifacts: self.artifacts.clone(),
            },
        }
    }
}

/// Observable status of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running { progress_message: String },
    Succeeded { artifacts: Vec<GeneratedArtifact> },
    Failed { reason: String },
    /// A status query itself failed, so the job's own outcome is unknown.
    Faulted { reason: String },
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded { .. }
                | JobStatus::Failed { .. }
                | JobStatus::Faulted { .. }
                | JobStatus::Cancelled
        )
    }
}

/// Retrievable locator for a generated video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub uri: String,
}

impl ArtifactRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// The URI with the credential attached as a `key` query parameter.
    pub fn authorized_url(&self, api_key: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.uri)
            .map_err(|e| StudioError::InvalidResponse(format!("Bad artifact URI: {}", e)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> SourceImage {
        SourceImage::new(vec![0x89, b'P', b'N', b'G'], "image/png")
    }

    #[test]
    fn test_effective_prompt_defaults_when_blank() {
        let req = GenerationRequest::new(png());
        assert_eq!(req.effective_prompt(), DEFAULT_MOTION_PROMPT);

        let req = GenerationRequest::new(png()).prompt("   ");
        assert_eq!(req.effective_prompt(), DEFAULT_MOTION_PROMPT);

        let req = GenerationRequest::new(png()).prompt("Swaying in a breeze");
        assert_eq!(req.effective_prompt(), "Swaying in a breeze");
    }

    #[test]
    fn test_validate_requires_image() {
        assert!(matches!(
            GenerationRequest::default().validate(),
            Err(StudioError::Validation(_))
        ));
        let empty = GenerationRequest::new(SourceImage::new(Vec::new(), "image/png"));
        assert!(!empty.has_image());
        assert!(GenerationRequest::new(png()).validate().is_ok());
    }

    #[test]
    fn test_default_output_config() {
        let cfg = OutputConfig::default();
        assert_eq!(cfg.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(cfg.resolution, "720p");
        assert_eq!(cfg.variant_count, 1);
    }

    #[test]
    fn test_request_owns_its_output() {
        let request = GenerationRequest::new(png());
        assert_eq!(request.output, OutputConfig::default());

        let request = request.aspect_ratio(AspectRatio::Portrait).resolution("1080p");
        assert_eq!(request.output.aspect_ratio, AspectRatio::Portrait);
        assert_eq!(request.output.resolution, "1080p");
        assert_eq!(request.output.variant_count, 1);
    }

    #[test]
    fn test_aspect_ratio_serialization() {
        assert_eq!(serde_json::to_string(&AspectRatio::Portrait).unwrap(), "\"9:16\"");
        let parsed: AspectRatio = serde_json::from_str("\"16:9\"").unwrap();
        assert_eq!(parsed, AspectRatio::Landscape);
    }

    #[test]
    fn test_from_data_url() {
        let img = SourceImage::from_data_url("data:image/jpeg;base64,/9j/4A==").unwrap();
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.bytes, vec![0xff, 0xd8, 0xff, 0xe0]);

        assert!(SourceImage::from_data_url("image/png;base64,AAAA").is_err());
        assert!(SourceImage::from_data_url("data:image/png,AAAA").is_err());
        assert!(SourceImage::from_data_url("data:text/plain;base64,AAAA").is_err());
    }

    #[test]
    fn test_from_path_infers_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.WEBP");
        std::fs::write(&path, b"RIFF").unwrap();
        let img = SourceImage::from_path(&path).unwrap();
        assert_eq!(img.mime_type, "image/webp");
        assert_eq!(img.bytes, b"RIFF");

        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, b"hi").unwrap();
        assert!(SourceImage::from_path(&txt).is_err());
    }

    #[test]
    fn test_terminal_status_from_snapshot() {
        let mut snap = JobSnapshot::pending("operations/1");
        snap.done = true;
        snap.artifacts.push(GeneratedArtifact::with_uri("https://x/v.mp4"));
        assert!(matches!(snap.terminal_status(), JobStatus::Succeeded { ref artifacts } if artifacts.len() == 1));

        snap.error = Some("blocked".into());
        assert_eq!(
            snap.terminal_status(),
            JobStatus::Failed {
                reason: "blocked".into()
            }
        );
    }

    #[test]
    fn test_authorized_url_appends_key() {
        let artifact = ArtifactRef::new("https://files.example/v1/files/abc:download?alt=media");
        let url = artifact.authorized_url("secret").unwrap();
        assert_eq!(
            url.as_str(),
            "https://files.example/v1/files/abc:download?alt=media&key=secret"
        );

        assert!(ArtifactRef::new("not a url").authorized_url("k").is_err());
    }
}
