use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::StudioConfig;
use crate::error::{Result, StudioError};
use crate::provider::GenerationProvider;
use crate::types::*;

/// Async client for the Veo long-running video generation API.
///
/// Implements [`GenerationProvider`]: `submit` starts a
/// `predictLongRunning` operation and `poll` re-reads it by name.
///
/// # Example
/// ```no_run
/// use storefront_studio::{GenerationProvider, GenerationRequest, SourceImage, StudioConfig, VeoClient};
///
/// # async fn example() -> storefront_studio::Result<()> {
/// let client = VeoClient::new(StudioConfig::from_env());
/// let image = SourceImage::from_path(std::path::Path::new("coat.png"))?;
/// let snapshot = client.submit(&GenerationRequest::new(image)).await?;
/// println!("Started {}", snapshot.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VeoClient {
    http: Client,
    config: StudioConfig,
}

impl VeoClient {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Use a custom `reqwest::Client` (for connection pooling, proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StudioError::Authentication("No API key configured".into()))
    }

    // ── Jobs ────────────────────────────────────────────────────────

    async fn start_operation(&self, request: &GenerationRequest) -> Result<JobSnapshot> {
        let image = request.validate()?;
        let key = self.api_key()?;
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.config.endpoint, self.config.video_model
        );
        let body = build_submit_body(request, image);

        tracing::info!(
            model = %self.config.video_model,
            aspect_ratio = %request.output.aspect_ratio,
            resolution = %request.output.resolution,
            "Submitting video generation job"
        );

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .timeout(self.config.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| StudioError::Network {
                context: format!("Cannot reach generation provider at {}", self.config.endpoint),
                source: e,
            })?;

        let json = read_json(resp, "Failed to parse job submission response").await?;
        parse_operation(&json)
    }

    async fn fetch_operation(&self, snapshot: &JobSnapshot) -> Result<JobSnapshot> {
        let key = self.api_key()?;
        let url = format!("{}/{}", self.config.endpoint, snapshot.name);

        let resp = self
            .http
            .get(&url)
            .header("x-goog-api-key", key)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| StudioError::Network {
                context: format!("Failed to query job {}", snapshot.name),
                source: e,
            })?;

        let json = read_json(resp, "Failed to parse job status response").await?;
        parse_operation(&json)
    }

    // ── Artifact download ───────────────────────────────────────────

    /// Download a generated video. Returns raw bytes.
    pub async fn download(&self, artifact: &ArtifactRef) -> Result<Vec<u8>> {
        let url = artifact.authorized_url(self.api_key()?)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StudioError::Network {
                context: "Failed to fetch generated video".into(),
                source: e,
            })?;

        let resp = check_status(resp).await?;
        let bytes = resp.bytes().await.map_err(|e| StudioError::Network {
            context: "Failed to read video bytes".into(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}

impl GenerationProvider for VeoClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<JobSnapshot> {
        self.start_operation(request).await
    }

    async fn poll(&self, snapshot: &JobSnapshot) -> Result<JobSnapshot> {
        self.fetch_operation(snapshot).await
    }
}

fn build_submit_body(request: &GenerationRequest, image: &SourceImage) -> Value {
    json!({
        "instances": [{
            "prompt": request.effective_prompt(),
            "image": {
                "bytesBase64Encoded": image.to_base64(),
                "mimeType": image.mime_type,
            },
        }],
        "parameters": {
            "aspectRatio": request.output.aspect_ratio.as_str(),
            "resolution": request.output.resolution,
            "sampleCount": request.output.variant_count,
        },
    })
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StudioError::Authentication(format!(
            "Provider rejected credential (HTTP {}): {}",
            status.as_u16(),
            body
        )));
    }
    Err(StudioError::Http {
        status: status.as_u16(),
        body,
    })
}

async fn read_json(resp: reqwest::Response, context: &str) -> Result<Value> {
    let resp = check_status(resp).await?;
    resp.json().await.map_err(|e| StudioError::Network {
        context: context.to_string(),
        source: e,
    })
}

/// Turn a long-running operation resource into a [`JobSnapshot`].
fn parse_operation(json: &Value) -> Result<JobSnapshot> {
    let name = json
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| StudioError::InvalidResponse("Operation missing name".into()))?;

    let done = json.get("done").and_then(|v| v.as_bool()).unwrap_or(false);

    let error = json.get("error").map(|e| {
        e.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| e.to_string())
    });

    let artifacts = json
        .pointer("/response/generateVideoResponse/generatedSamples")
        .and_then(|v| v.as_array())
        .map(|samples| {
            samples
                .iter()
                .map(|s| GeneratedArtifact {
                    uri: s
                        .pointer("/video/uri")
                        .and_then(|u| u.as_str())
                        .map(String::from),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(JobSnapshot {
        name: name.to_string(),
        done,
        artifacts,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pending_operation() {
        let json: Value = serde_json::from_str(
            r#"{"name": "models/veo-3.1-fast-generate-preview/operations/abc123"}"#,
        )
        .unwrap();
        let snap = parse_operation(&json).unwrap();
        assert_eq!(snap.name, "models/veo-3.1-fast-generate-preview/operations/abc123");
        assert!(!snap.done);
        assert!(snap.artifacts.is_empty());
        assert!(snap.error.is_none());
    }

    #[test]
    fn test_parse_completed_operation() {
        let json: Value = serde_json::from_str(
            r#"{
            "name": "models/veo/operations/abc123",
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://generativelanguage.googleapis.com/v1beta/files/f1:download?alt=media"}}
                    ]
                }
            }
        }"#,
        )
        .unwrap();
        let snap = parse_operation(&json).unwrap();
        assert!(snap.done);
        assert_eq!(snap.artifacts.len(), 1);
        assert_eq!(
            snap.artifacts[0].uri.as_deref(),
            Some("https://generativelanguage.googleapis.com/v1beta/files/f1:download?alt=media")
        );
    }

    #[test]
    fn test_parse_sample_without_uri() {
        let json: Value = serde_json::from_str(
            r#"{
            "name": "operations/x",
            "done": true,
            "response": {"generateVideoResponse": {"generatedSamples": [{"video": {}}]}}
        }"#,
        )
        .unwrap();
        let snap = parse_operation(&json).unwrap();
        assert_eq!(snap.artifacts, vec![GeneratedArtifact { uri: None }]);
    }

    #[test]
    fn test_parse_failed_operation() {
        let json: Value = serde_json::from_str(
            r#"{
            "name": "operations/x",
            "done": true,
            "error": {"code": 3, "message": "Image violates usage guidelines"}
        }"#,
        )
        .unwrap();
        let snap = parse_operation(&json).unwrap();
        assert_eq!(snap.error.as_deref(), Some("Image violates usage guidelines"));
        assert!(matches!(snap.terminal_status(), JobStatus::Failed { .. }));
    }

    #[test]
    fn test_parse_operation_missing_name() {
        let json: Value = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(matches!(
            parse_operation(&json),
            Err(StudioError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_submit_body_shape() {
        let image = SourceImage::new(vec![1, 2, 3], "image/jpeg");
        let request = GenerationRequest::new(image)
            .aspect_ratio(AspectRatio::Portrait);
        let body = build_submit_body(&request, request.image.as_ref().unwrap());

        assert_eq!(body["instances"][0]["prompt"], DEFAULT_MOTION_PROMPT);
        assert_eq!(body["instances"][0]["image"]["bytesBase64Encoded"], "AQID");
        assert_eq!(body["instances"][0]["image"]["mimeType"], "image/jpeg");
        assert_eq!(body["parameters"]["aspectRatio"], "9:16");
        assert_eq!(body["parameters"]["resolution"], "720p");
        assert_eq!(body["parameters"]["sampleCount"], 1);
    }

    #[tokio::test]
    async fn test_submit_without_key_fails_before_network() {
        let client = VeoClient::new(StudioConfig::builder().with_endpoint("http://127.0.0.1:9").build());
        let request = GenerationRequest::new(SourceImage::new(vec![1], "image/png"));
        let err = client.submit(&request).await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_submit_without_image_is_validation_error() {
        let client = VeoClient::new(StudioConfig::builder().with_api_key("k").build());
        let err = client.submit(&GenerationRequest::default()).await.unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
    }

    #[test]
    fn test_client_builder() {
        let client = VeoClient::new(
            StudioConfig::builder()
                .with_endpoint("http://localhost:8080/v1beta/")
                .build(),
        );
        assert_eq!(client.endpoint(), "http://localhost:8080/v1beta");
    }
}
