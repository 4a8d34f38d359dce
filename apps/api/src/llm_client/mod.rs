//! LLM Client — the single point of entry for the hosted text-generation API.
//!
//! Talks to the Hugging Face Inference API. Exactly one attempt per call: there
//! is no retry loop here, callers decide what a failure means.
//!
//! Sampling parameters are fixed constants and not exposed to callers.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const MAX_LENGTH: u32 = 200;
const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.8;
const REPETITION_PENALTY: f32 = 1.2;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM response contained no generated text")]
    EmptyContent,
}

/// Anything that turns a prompt into continuation text.
///
/// The production implementation is [`HfClient`]; tests substitute their own.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
    repetition_penalty: f32,
}

impl Default for InferenceParameters {
    fn default() -> Self {
        Self {
            max_length: MAX_LENGTH,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            do_sample: true,
            return_full_text: false,
            repetition_penalty: REPETITION_PENALTY,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    generated_text: Option<String>,
}

/// Pulls the generated text out of a raw inference response body.
///
/// The API answers with a JSON array of generations; only the first one is
/// used. Error payloads are JSON objects and fail to parse here.
fn extract_generated_text(body: &str) -> Result<String, LlmError> {
    let outputs: Vec<InferenceOutput> = serde_json::from_str(body)?;
    outputs
        .into_iter()
        .next()
        .and_then(|o| o.generated_text)
        .ok_or(LlmError::EmptyContent)
}

/// Hugging Face Inference API client.
#[derive(Clone)]
pub struct HfClient {
    client: Client,
    api_token: String,
    endpoint: String,
}

impl HfClient {
    pub fn new(
        api_token: String,
        api_base: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_token,
            endpoint: format!("{}/{}", api_base.trim_end_matches('/'), model),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for HfClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters::default(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Only a plain 200 carries generations; any other status falls back.
        if status != StatusCode::OK {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let text = extract_generated_text(&body)?;
        debug!("Inference call succeeded: {} chars generated", text.len());
        Ok(text)
    }
}
