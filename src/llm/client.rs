// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! OpenAI chat completion client.

use crate::config::LlmConfig;
use crate::error::{ConfigError, LlmError, PrCheckError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::evaluation::{build_prompt, QualityEvaluation};
use super::review::{review_prompt, FileReview};

/// Anything that can score a PR description.
pub trait QualityScorer {
    /// Evaluate a PR title and body.
    fn evaluate(&self, title: &str, body: &str) -> std::result::Result<QualityEvaluation, LlmError>;
}

/// Anything that can review one file's diff.
pub trait CodeReviewer {
    fn review_file(&self, filename: &str, patch: &str)
        -> std::result::Result<FileReview, LlmError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Scores PRs with an OpenAI-compatible chat completion endpoint.
pub struct OpenAiClient {
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    http_client: Client,
}

impl OpenAiClient {
    /// Create a client. The API key is required.
    pub fn new(config: &LlmConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                PrCheckError::Config(ConfigError::MissingRequired {
                    key: "llm.api_key (OPENAI_API_KEY)".to_string(),
                })
            })?;

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            api_key,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            http_client,
        })
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user prompt and return the content of the first choice.
    fn complete(&self, prompt: String) -> std::result::Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json()?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))
    }
}

fn log_unparseable(content: &str, err: LlmError) -> LlmError {
    let preview: String = content.chars().take(200).collect();
    tracing::debug!("Unparseable model content: {}", preview);
    err
}

impl QualityScorer for OpenAiClient {
    fn evaluate(&self, title: &str, body: &str) -> std::result::Result<QualityEvaluation, LlmError> {
        tracing::info!("Evaluating PR with {}", self.model);
        let content = self.complete(build_prompt(title, body))?;
        QualityEvaluation::parse(&content).map_err(|e| log_unparseable(&content, e))
    }
}

impl CodeReviewer for OpenAiClient {
    fn review_file(
        &self,
        filename: &str,
        patch: &str,
    ) -> std::result::Result<FileReview, LlmError> {
        let content = self.complete(review_prompt(filename, patch))?;
        FileReview::parse(&content).map_err(|e| log_unparseable(&content, e))
    }
}
