//! [`TextGenerator`] backed by the Gemini `generateContent` API.
//!
//! The prompt is sent as a single user part and the credential as the `key`
//! query parameter. Only `candidates[0].content.parts[0].text` of the answer
//! is used; any other shape is reported as
//! [`GenerationError::UnexpectedShape`].

use crate::server::config::ServerConfig;
use async_trait::async_trait;
use bfhl_core::{GenerationError, TextGenerator};
use serde::{Deserialize, Serialize};

pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.ai_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint(&config.gemini_base_url, &config.gemini_model),
            api_key: config.gemini_api_key.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GenerationError::Transport(Box::new(e.without_url())))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Transport(Box::new(e.without_url())))?;

        let text = serde_json::from_slice::<GenerateResponse>(&body)
            .ok()
            .and_then(GenerateResponse::into_first_text)
            .ok_or(GenerationError::UnexpectedShape)?;

        tracing::debug!(text_len = text.len(), "generation complete");
        Ok(text)
    }
}

fn endpoint(base_url: &str, model: &str) -> String {
    format!("{base_url}/models/{model}:generateContent")
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    const fn new(prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
