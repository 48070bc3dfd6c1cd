//! Conversational styling assistant backed by a Gemini chat model.
//!
//! [`StylistClient::advise`] never fails: provider trouble is logged and
//! turned into one of a few fixed replies so the chat overlay always has
//! something to show.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::StudioConfig;
use crate::error::{Result, StudioError};

const SYSTEM_INSTRUCTION: &str = "You are a world-class luxury fashion stylist for 'VOGUE AI'.
Your tone is sophisticated, helpful, and trendy.
You give personalized fashion advice based on current trends and the user's wardrobe questions.
Keep your responses concise but professional.
When suggesting items, focus on classic silhouettes and modern color palettes.";

pub const GREETING: &str =
    "Hello! I am your VOGUE AI Personal Stylist. How can I elevate your look today?";
pub const MISSING_KEY_REPLY: &str = "API Key is missing. Please configure your environment.";
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a styling tip right now.";
pub const BUSY_REPLY: &str =
    "The fashion studio is currently busy. Please try asking for advice again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylingMessage {
    pub role: Role,
    pub text: String,
}

impl StylingMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Sampling settings sent with every stylist request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StylistGenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for StylistGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StylistClient {
    http: Client,
    config: StudioConfig,
    generation: StylistGenerationConfig,
}

impl StylistClient {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            generation: StylistGenerationConfig::default(),
        }
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn with_generation_config(mut self, generation: StylistGenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Ask for advice given the transcript so far and the new user prompt.
    pub async fn advise(&self, history: &[StylingMessage], prompt: &str) -> String {
        let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return MISSING_KEY_REPLY.to_string();
        };

        match self.generate(key, history, prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_REPLY.to_string(),
            Err(e) => {
                tracing::error!(error = %e, model = %self.config.chat_model, "Stylist request failed");
                BUSY_REPLY.to_string()
            }
        }
    }

    async fn generate(
        &self,
        key: &str,
        history: &[StylingMessage],
        prompt: &str,
    ) -> Result<Option<String>> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint, self.config.chat_model
        );
        let body = build_chat_body(history, prompt, &self.generation);

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .timeout(self.config.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| StudioError::Network {
                context: format!("Failed to reach stylist model at {}", self.config.endpoint),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StudioError::Http { status, body });
        }

        let json: Value = resp.json().await.map_err(|e| StudioError::Network {
            context: "Failed to parse stylist response".into(),
            source: e,
        })?;
        Ok(extract_reply(&json))
    }
}

fn build_chat_body(
    history: &[StylingMessage],
    prompt: &str,
    generation: &StylistGenerationConfig,
) -> Value {
    let contents: Vec<Value> = history
        .iter()
        .chain(std::iter::once(&StylingMessage::user(prompt)))
        .map(|m| json!({"role": m.role, "parts": [{"text": m.text}]}))
        .collect();

    json!({
        "systemInstruction": {"parts": [{"text": SYSTEM_INSTRUCTION}]},
        "contents": contents,
        "generationConfig": generation,
    })
}

/// Concatenate the text parts of the first candidate. `None` when empty.
fn extract_reply(json: &Value) -> Option<String> {
    let text: String = json
        .pointer("/candidates/0/content/parts")
        .and_then(|v| v.as_array())?
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Chat transcript for the stylist overlay, seeded with the greeting.
///
/// `send` borrows the session mutably, so at most one reply is ever in
/// flight. The transcript only changes once the reply is in hand; a send
/// that is dropped midway leaves it untouched.
#[derive(Debug, Clone)]
pub struct StylistSession {
    messages: Vec<StylingMessage>,
}

impl Default for StylistSession {
    fn default() -> Self {
        Self {
            messages: vec![StylingMessage::model(GREETING)],
        }
    }
}

impl StylistSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[StylingMessage] {
        &self.messages
    }

    /// Send `input` and append both turns. Blank input is ignored and
    /// returns `None`.
    pub async fn send(&mut self, client: &StylistClient, input: &str) -> Option<&StylingMessage> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }

        let reply = client.advise(&self.messages, prompt).await;
        self.messages.push(StylingMessage::user(prompt));
        self.messages.push(StylingMessage::model(reply));
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_body_appends_prompt() {
        let history = vec![StylingMessage::model(GREETING)];
        let body = build_chat_body(&history, "What goes with a camel coat?", &Default::default());

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[1]["role"], "user");
        assert_eq!(contents[1]["parts"][0]["text"], "What goes with a camel coat?");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["topP"], 0.8);
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("VOGUE AI"));
    }

    #[test]
    fn test_extract_reply() {
        let json: Value = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "Try "}, {"text": "navy."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_reply(&json).as_deref(), Some("Try navy."));

        let empty: Value = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_reply(&empty).is_none());

        let blank: Value =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#)
                .unwrap();
        assert!(extract_reply(&blank).is_none());
    }

    #[tokio::test]
    async fn test_advise_without_key() {
        let client = StylistClient::new(StudioConfig::default());
        assert_eq!(client.advise(&[], "hi").await, MISSING_KEY_REPLY);
    }

    #[tokio::test]
    async fn test_advise_unreachable_endpoint_is_busy() {
        let config = StudioConfig::builder()
            .with_endpoint("http://127.0.0.1:9")
            .with_api_key("k")
            .build();
        let client = StylistClient::new(config);
        assert_eq!(client.advise(&[], "hi").await, BUSY_REPLY);
    }

    #[tokio::test]
    async fn test_session_ignores_blank_input() {
        let client = StylistClient::new(StudioConfig::default());
        let mut session = StylistSession::new();
        assert!(session.send(&client, "   ").await.is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_session_appends_both_turns() {
        let client = StylistClient::new(StudioConfig::default());
        let mut session = StylistSession::new();
        let reply = session.send(&client, "  Need a gala look ").await.cloned();
        assert_eq!(reply, Some(StylingMessage::model(MISSING_KEY_REPLY)));

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], StylingMessage::user("Need a gala look"));
    }

    #[tokio::test]
    async fn test_dropped_send_leaves_session_usable() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let stalled = StylistClient::new(
            StudioConfig::builder()
                .with_endpoint(format!("http://{}", addr))
                .with_api_key("k")
                .build(),
        );
        let mut session = StylistSession::new();
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            session.send(&stalled, "first"),
        )
        .await;
        assert!(outcome.is_err());
        assert_eq!(session.messages().len(), 1);

        let quick = StylistClient::new(StudioConfig::default());
        let reply = session.send(&quick, "second").await.cloned();
        assert_eq!(reply, Some(StylingMessage::model(MISSING_KEY_REPLY)));
        assert_eq!(session.messages()[1], StylingMessage::user("second"));
        assert_eq!(session.messages().len(), 3);

        server.abort();
    }
}
