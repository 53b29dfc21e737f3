// src/providers/ollama.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::OllamaConfig;
use crate::errors::{GenError, Result};
use crate::providers::{error_from_response, Completion, CompletionClient, Sampling, LLM_LOG_TARGET};

/// A provider for interacting with local Ollama models.
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

impl OllamaProvider {
    /// Creates a new `OllamaProvider`.
    pub fn new(client: Client, config: OllamaConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionClient for OllamaProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str, sampling: &Sampling) -> Result<Completion> {
        let url = format!("{}/api/generate", self.config.api_base.trim_end_matches('/'));

        log::info!("📡 Calling Ollama: {} with model: {}", url, self.config.model);
        log::debug!(target: LLM_LOG_TARGET, "prompt:\n{}", prompt);

        let body = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: sampling.temperature,
                num_predict: sampling.max_output_tokens,
            },
        };

        let start = Instant::now();

        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Ollama response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            return Err(error_from_response(resp).await);
        }

        let ollama_resp: OllamaResponse = resp.json().await?;
        if let Some(error) = ollama_resp.error {
            return Err(GenError::UpstreamError { status: None, message: error });
        }
        if ollama_resp.response.is_empty() {
            return Err(GenError::UpstreamError {
                status: None,
                message: "received empty text response from model".to_string(),
            });
        }

        log::debug!(target: LLM_LOG_TARGET, "response:\n{}", ollama_resp.response);

        Ok(Completion { text: ollama_resp.response, latency_ms })
    }
}
