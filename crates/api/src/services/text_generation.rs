//! Text generation client for the AI assist endpoints.
//!
//! Thin wrapper around the Gemini `generateContent` REST API. The client
//! is optional: when no API key is configured every call returns
//! `Disabled` and the routes answer 503 instead of failing mid-request.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum TextGenerationError {
    #[error("Text generation is not configured")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation API error: {0}")]
    Api(String),

    #[error("Generation API returned no text")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct TextGenerationClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl TextGenerationClient {
    pub fn new(config: &AiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let api_key = if config.enabled && !config.api_key.is_empty() {
            Some(config.api_key.clone())
        } else {
            None
        };

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a prompt and return the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, TextGenerationError> {
        let api_key = self.api_key.as_deref().ok_or(TextGenerationError::Disabled)?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        debug!(model = %self.model, "Sending text generation request");

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Text generation request failed");
            return Err(TextGenerationError::Api(format!(
                "status {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(TextGenerationError::EmptyResponse);
        }

        Ok(text)
    }
}

/// Strip a markdown code fence from generated output, if present.
///
/// Models frequently wrap JSON answers in ```json fences even when asked
/// not to.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled_config() -> AiConfig {
        AiConfig {
            enabled: false,
            api_key: "key".to_string(),
            ..AiConfig::default()
        }
    }

    #[tokio::test]
    async fn test_generate_disabled_without_key() {
        let client = TextGenerationClient::new(&AiConfig::default()).unwrap();
        assert!(!client.is_enabled());
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, TextGenerationError::Disabled));
    }

    #[tokio::test]
    async fn test_generate_disabled_ignores_key() {
        let client = TextGenerationClient::new(&disabled_config()).unwrap();
        assert!(!client.is_enabled());
    }

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json("[{\"field\":\"totalSpend\"}]"), "[{\"field\":\"totalSpend\"}]");
    }

    #[test]
    fn test_extract_json_fenced() {
        let fenced = "```json\n[{\"field\":\"totalSpend\"}]\n```";
        assert_eq!(extract_json(fenced), "[{\"field\":\"totalSpend\"}]");
    }

    #[test]
    fn test_extract_json_fence_without_language() {
        let fenced = "```\n[1,2]\n```";
        assert_eq!(extract_json(fenced), "[1,2]");
    }

    #[test]
    fn test_candidate_response_parsing() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Hi {{name}}!" } ] } }
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "Hi {{name}}!");
    }
}
