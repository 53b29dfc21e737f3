// src/providers/gemini.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Instant;

use crate::config::GeminiConfig;
use crate::errors::{GenError, Result};
use crate::providers::{error_from_response, Completion, CompletionClient, Sampling, LLM_LOG_TARGET};

/// A provider for interacting with Google's Gemini models.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionClient for GeminiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    /// Calls the Gemini API with a given prompt and returns the model's response text and latency.
    async fn complete(&self, prompt: &str, sampling: &Sampling) -> Result<Completion> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );

        log::info!("📡 Calling Gemini: {} (temperature {})", url, sampling.temperature);
        log::debug!(target: LLM_LOG_TARGET, "prompt:\n{}", prompt);

        let body = GeminiRequest {
            contents: [GeminiContent { parts: [GeminiPart { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: sampling.temperature,
                max_output_tokens: sampling.max_output_tokens,
            },
        };

        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Gemini response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            return Err(error_from_response(resp).await);
        }

        let response_json: serde_json::Value = resp.json().await?;
        let text = extract_text(&response_json)?;

        log::debug!(target: LLM_LOG_TARGET, "response:\n{}", text);

        Ok(Completion { text, latency_ms })
    }
}

/// Joins the text parts of the first candidate.
fn extract_text(response_json: &serde_json::Value) -> Result<String> {
    if let Some(error) = response_json.get("error") {
        return Err(GenError::UpstreamError { status: None, message: error.to_string() });
    }

    if let Some(reason) = response_json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(GenError::UpstreamError {
            status: None,
            message: format!("prompt blocked: {reason}"),
        });
    }

    let parts = response_json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| GenError::UpstreamError {
            status: None,
            message: format!("unexpected response structure: {response_json}"),
        })?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(GenError::UpstreamError {
            status: None,
            message: "received empty text response from model".to_string(),
        });
    }

    Ok(text)
}
