use std::time::Duration;

/// Default Gemini API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration shared by the video client, the studio and the stylist.
///
/// Use [`StudioConfig::builder()`] for ergonomic construction, or
/// [`StudioConfig::from_env()`] to pick the API key up from the environment.
#[derive(Clone)]
pub struct StudioConfig {
    /// Provider API base URL.
    pub endpoint: String,

    /// Model used for image-to-video jobs.
    pub video_model: String,

    /// Model used for the styling assistant.
    pub chat_model: String,

    /// API key. `None` means no credential has been configured.
    pub api_key: Option<String>,

    /// Wait between job status queries.
    pub poll_interval: Duration,

    /// Timeout applied to each individual HTTP request.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioConfig")
            .field("endpoint", &self.endpoint)
            .field("video_model", &self.video_model)
            .field("chat_model", &self.chat_model)
            .field("has_api_key", &self.api_key.is_some())
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            chat_model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl StudioConfig {
    /// Start building a config with the builder pattern.
    pub fn builder() -> StudioConfigBuilder {
        StudioConfigBuilder::default()
    }

    /// Defaults plus `API_KEY` (or `GEMINI_API_KEY`) and an optional
    /// `STUDIO_ENDPOINT` override.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        config.api_key = non_empty("API_KEY").or_else(|| non_empty("GEMINI_API_KEY"));
        if let Some(endpoint) = non_empty("STUDIO_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        config
    }
}

/// Builder for [`StudioConfig`].
#[derive(Default)]
pub struct StudioConfigBuilder {
    config: StudioConfig,
}

impl StudioConfigBuilder {
    /// Set the provider base URL. Trailing slashes are dropped.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_video_model(mut self, model: impl Into<String>) -> Self {
        self.config.video_model = model.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the wait between job status queries.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the final [`StudioConfig`].
    pub fn build(self) -> StudioConfig {
        self.config
    }
}
