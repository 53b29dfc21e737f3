// src/config.rs
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{GenError, Result};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_PROJECT_NAME: &str = "GenAI Test Data Generator";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

/// Configuration for the Ollama provider.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub api_base: String,
    pub model: String,
}

/// The model backend the service generates with.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Gemini(GeminiConfig),
    Ollama(OllamaConfig),
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::Gemini(_) => "gemini",
            ProviderConfig::Ollama(_) => "ollama",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::Gemini(c) => &c.model,
            ProviderConfig::Ollama(c) => &c.model,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Process-wide settings, built once at start-up and handed to constructors.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub project_name: String,
    pub provider: ProviderConfig,
    /// Largest batch the HTTP layer accepts. The generator itself never truncates.
    pub max_batch_size: usize,
    /// Upper bound on a single model call.
    pub llm_timeout: Duration,
    pub max_output_tokens: Option<u32>,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = if let Some(api_key) = var("GEMINI_API_KEY") {
            ProviderConfig::Gemini(GeminiConfig {
                api_base: var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
                api_key,
                model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            })
        } else if let Some(api_base) = var("OLLAMA_API_BASE") {
            ProviderConfig::Ollama(OllamaConfig {
                api_base,
                model: var("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            })
        } else {
            return Err(GenError::Config(
                "No LLM provider configured. Please set either GEMINI_API_KEY or OLLAMA_API_BASE.".to_string(),
            ));
        };

        let max_batch_size: usize = parse_or("MAX_BATCH_SIZE", var("MAX_BATCH_SIZE"), 5)?;
        if max_batch_size == 0 {
            return Err(GenError::Config("MAX_BATCH_SIZE must be at least 1".to_string()));
        }

        let timeout_secs: u64 = parse_or("LLM_TIMEOUT_SECS", var("LLM_TIMEOUT_SECS"), 60)?;
        if timeout_secs == 0 {
            return Err(GenError::Config("LLM_TIMEOUT_SECS must be greater than 0".to_string()));
        }

        let max_output_tokens = var("LLM_MAX_OUTPUT_TOKENS")
            .map(|v| parse_value("LLM_MAX_OUTPUT_TOKENS", &v))
            .transpose()?;

        Ok(AppConfig {
            project_name: var("PROJECT_NAME").unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            provider,
            max_batch_size,
            llm_timeout: Duration::from_secs(timeout_secs),
            max_output_tokens,
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or("PORT", var("PORT"), 8080)?,
            },
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(v) => parse_value(key, &v),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| GenError::Config(format!("{key} has an invalid value: {raw:?}")))
}
