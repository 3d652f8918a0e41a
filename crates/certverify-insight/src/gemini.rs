//! Client for the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InsightError, Result};
use crate::prompt::InsightRequest;
use crate::service::InsightService;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
pub const MODEL_VAR: &str = "CERTVERIFY_INSIGHT_MODEL";

/// Configuration for the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl InsightConfig {
    /// Read the API key and model from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: API_KEY_VARS.iter().find_map(|name| non_empty(*name)),
            model: non_empty(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text of the first candidate.
fn response_text(body: &str) -> Result<String> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| InsightError::InvalidResponse(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(InsightError::EmptyResponse);
    }
    Ok(text.to_string())
}

pub struct GeminiClient {
    config: InsightConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: InsightConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { config, http })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl InsightService for GeminiClient {
    async fn generate(&self, request: &InsightRequest) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(InsightError::MissingApiKey)?;

        let prompt = request.prompt();
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        debug!(model = %self.config.model, cert_id = %request.cert_id, "requesting insight");
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(InsightError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        response_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Secure " }, { "text": "and final." } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;
        assert_eq!(response_text(body).unwrap(), "Secure and final.");
    }

    #[test]
    fn test_response_without_text_is_empty() {
        assert!(matches!(
            response_text(r#"{ "candidates": [] }"#),
            Err(InsightError::EmptyResponse)
        ));
        assert!(matches!(
            response_text(r#"{ "candidates": [ { "content": { "parts": [ { "text": "  " } ] } } ] }"#),
            Err(InsightError::EmptyResponse)
        ));
    }

    #[test]
    fn test_malformed_response() {
        assert!(matches!(
            response_text("not json"),
            Err(InsightError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = InsightConfig::from_lookup(|name| match name {
            "GEMINI_API_KEY" => Some(String::new()),
            "API_KEY" => Some("secret".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, DEFAULT_MODEL);

        let empty = InsightConfig::from_lookup(|_| None);
        assert!(!empty.has_credentials());
    }

    #[test]
    fn test_url() {
        let client = GeminiClient::new(InsightConfig {
            endpoint: "https://example.test/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = GeminiClient::new(InsightConfig::default()).unwrap();
        let err = client
            .generate(&InsightRequest::new("Alice", "1", "0x0"))
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::MissingApiKey));
    }
}
