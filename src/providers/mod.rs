// src/providers/mod.rs

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::config::{AppConfig, ProviderConfig};
use crate::errors::{GenError, Result};

pub mod gemini;
pub mod ollama;

use gemini::GeminiProvider;
use ollama::OllamaProvider;

/// Log target for prompt and response bodies, so model traffic can be enabled on its own.
pub const LLM_LOG_TARGET: &str = "testgen::llm";

/// Sampling settings for a single completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub max_output_tokens: Option<u32>,
}

impl Sampling {
    /// Scenario generation favors variety.
    pub const SCENARIOS: Sampling = Sampling { temperature: 0.7, max_output_tokens: None };

    /// Code generation favors stable, well-formed output.
    pub const CODE: Sampling = Sampling { temperature: 0.3, max_output_tokens: None };

    pub fn new(temperature: f64, max_output_tokens: Option<u32>) -> Result<Self> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(GenError::InvalidRequest(format!(
                "temperature must be within [0, 1], got {temperature}"
            )));
        }
        Ok(Self { temperature, max_output_tokens })
    }

    pub fn with_max_output_tokens(self, max_output_tokens: Option<u32>) -> Self {
        Self { max_output_tokens, ..self }
    }
}

/// Text returned by a model along with how long the call took.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub latency_ms: u64,
}

/// A backend that turns a prompt into text.
///
/// Implementations hold only immutable configuration and a pooled HTTP
/// client, so one instance can serve concurrent calls. A call is never
/// retried here; errors go straight back to the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifier every call is made against.
    fn model(&self) -> &str;

    /// Sends `prompt` once and returns the model's top text output.
    async fn complete(&self, prompt: &str, sampling: &Sampling) -> Result<Completion>;
}

/// Builds the HTTP client shared by every provider call.
pub fn build_http_client(config: &AppConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.llm_timeout)
        .build()
        .map_err(|e| GenError::Config(format!("failed to build HTTP client: {e}")))
}

/// Creates the configured provider.
pub fn from_config(config: &AppConfig, client: Client) -> Arc<dyn CompletionClient> {
    match &config.provider {
        ProviderConfig::Gemini(gemini) => Arc::new(GeminiProvider::new(client, gemini.clone())),
        ProviderConfig::Ollama(ollama) => Arc::new(OllamaProvider::new(client, ollama.clone())),
    }
}

/// Reads a non-success response into an [`GenError::UpstreamError`].
pub(crate) async fn error_from_response(resp: reqwest::Response) -> GenError {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error body".to_string());
    GenError::UpstreamError {
        status: Some(status.as_u16()),
        message: body,
    }
}
