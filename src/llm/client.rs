//! Feedback from a remote language model (Google Gemini `generateContent`)

use crate::config::FeedbackConfig;
use crate::error::{Result, ScreenerError};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Free-text commentary on a resume/job pair.
///
/// Every failure is reported as `ScreenerError::FeedbackUnavailable`, except an
/// empty question, which is `InvalidInput`.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    async fn generate_feedback(&self, resume_text: &str, job_text: &str) -> Result<String>;

    async fn answer_question(&self, resume_text: &str, job_text: &str, question: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    templates: PromptTemplates,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            templates: PromptTemplates::default(),
        })
    }

    /// Build from configuration, reading the API key from the environment
    pub fn from_config(config: &FeedbackConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ScreenerError::FeedbackUnavailable(format!("{} is not set", config.api_key_env))
            })?;

        Self::new(
            config.endpoint.as_str(),
            config.model.as_str(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("Requesting feedback from {} ({} prompt chars)", self.model, prompt.len());
        let response = self
            .client
            .post(self.url())
            // Never in the query string; reqwest errors print the URL
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Prefer the API's own error message over the raw body
        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ScreenerError::FeedbackUnavailable(format!(
                "API error (status {}): {}",
                status.as_u16(),
                message
            )));
        }

        extract_text(&body)
    }
}

/// Concatenated text of the first candidate, trimmed
fn extract_text(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ScreenerError::FeedbackUnavailable(format!("Malformed response: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(ScreenerError::FeedbackUnavailable("Empty response".to_string()));
    }
    Ok(text.to_string())
}

#[async_trait]
impl FeedbackProvider for GeminiClient {
    async fn generate_feedback(&self, resume_text: &str, job_text: &str) -> Result<String> {
        let params = PromptParams {
            resume_content: resume_text.to_string(),
            job_content: job_text.to_string(),
        };
        self.generate(&self.templates.render_feedback(&params)).await
    }

    async fn answer_question(&self, resume_text: &str, job_text: &str, question: &str) -> Result<String> {
        // Reject blank questions before any network call
        let question = question.trim();
        if question.is_empty() {
            return Err(ScreenerError::InvalidInput("Please type a question.".to_string()));
        }
        let params = PromptParams {
            resume_content: resume_text.to_string(),
            job_content: job_text.to_string(),
        };
        self.generate(&self.templates.render_question(&params, question)).await
    }
}
