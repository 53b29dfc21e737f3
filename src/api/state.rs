// src/api/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::providers::{self, CompletionClient};
use crate::runner::Generator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub generator: Arc<Generator>,
}

impl AppState {
    /// Builds state backed by the provider named in `config`.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = providers::build_http_client(&config)?;
        let completion = providers::from_config(&config, client);
        Ok(Self::with_client(config, completion))
    }

    /// Builds state around an already constructed completion client.
    pub fn with_client(config: AppConfig, client: Arc<dyn CompletionClient>) -> Self {
        let generator = Generator::from_config(&config, client);
        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
        }
    }
}
