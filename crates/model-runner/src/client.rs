//! Anthropic Messages API client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use eval_core::{Position, Prediction, Usage};

use crate::config::RunnerConfig;
use crate::error::RunnerError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const SYSTEM_PROMPT: &str = "You are a chess expert. Analyze the given chess position and provide the best next move in Standard Algebraic Notation (SAN).
Your response must be in this format:
Explanation: {your brief analysis}
Move: {best move in SAN}
Confidence: {0-100}";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub fn user_prompt(position: &Position) -> String {
    format!(
        "Given this chess position: {}\nWhat is the best next move?",
        position.question
    )
}

/// Client for one model; holds the HTTP connection pool and settings.
pub struct AnthropicClient {
    client: Client,
    config: RunnerConfig,
}

impl AnthropicClient {
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let client = Client::builder()
            .user_agent("ChessEval/1.0")
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn request_body<'a>(&'a self, position: &Position) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model.model,
            max_tokens: self.config.model.max_tokens,
            temperature: self.config.model.temperature,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: user_prompt(position),
            }],
        }
    }

    /// Ask the model for its move on `position`.
    pub async fn query(&self, position: &Position) -> Result<Prediction, RunnerError> {
        let url = format!("{}/v1/messages", self.config.api_url);
        debug!(id = %position.id, "Querying model");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(position))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RunnerError::Api { status, body });
        }

        let decoded: MessagesResponse = resp.json().await?;
        into_prediction(decoded, &self.config.model.model, &position.id)
    }
}

fn into_prediction(resp: MessagesResponse, model: &str, id: &str) -> Result<Prediction, RunnerError> {
    let text: String = resp
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();

    if text.is_empty() {
        return Err(RunnerError::EmptyResponse(id.to_string()));
    }

    Ok(Prediction {
        model: Some(model.to_string()),
        response: Some(text),
        usage: Some(resp.usage),
        ..Default::default()
    })
}
