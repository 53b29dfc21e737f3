// src/runner.rs
use futures::future;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::errors::{GenError, Result};
use crate::interpreter;
use crate::models::{
    CodeGenerationRequest, CodeGenerationResult, EndpointDescriptor, EndpointScenarios, ItemOutcome,
    TestScenario,
};
use crate::prompts;
use crate::providers::{CompletionClient, Sampling};

/// Which generation path a request is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Scenarios,
    Code,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Scenarios => write!(f, "scenario"),
            Flow::Code => write!(f, "code"),
        }
    }
}

/// Steps a single generation passes through. Any step may end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    BuildPrompt,
    InvokeModel,
    InterpretResponse,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::BuildPrompt => "build_prompt",
            Stage::InvokeModel => "invoke_model",
            Stage::InterpretResponse => "interpret_response",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Log context for one generation: enough to reproduce a failure.
struct Trace<'a> {
    flow: Flow,
    endpoint: &'a str,
    method: &'a str,
    started: Instant,
}

impl<'a> Trace<'a> {
    fn start(flow: Flow, endpoint: &'a str, method: &'a str) -> Self {
        let trace = Self { flow, endpoint, method, started: Instant::now() };
        trace.enter(Stage::Start);
        trace
    }

    fn enter(&self, stage: Stage) {
        log::info!(
            "🎯 flow={} stage={} endpoint={} method={}",
            self.flow, stage, self.endpoint, self.method
        );
    }

    fn fail(&self, stage: Stage, err: GenError) -> GenError {
        log::error!(
            "❌ flow={} stage={} at={} endpoint={} method={} kind={} elapsed_ms={}: {}",
            self.flow,
            Stage::Failed,
            stage,
            self.endpoint,
            self.method,
            err.kind(),
            self.started.elapsed().as_millis(),
            err
        );
        err
    }

    fn done(&self, detail: fmt::Arguments<'_>) {
        log::info!(
            "✅ flow={} stage={} endpoint={} method={} elapsed_ms={} {}",
            self.flow,
            Stage::Done,
            self.endpoint,
            self.method,
            self.started.elapsed().as_millis(),
            detail
        );
    }
}

/// Runs prompt building, model invocation and interpretation for each request.
///
/// Holds no mutable state, so one instance is shared across all requests.
pub struct Generator {
    client: Arc<dyn CompletionClient>,
    timeout: Duration,
    max_output_tokens: Option<u32>,
}

impl Generator {
    pub fn new(client: Arc<dyn CompletionClient>, timeout: Duration) -> Self {
        Self { client, timeout, max_output_tokens: None }
    }

    pub fn from_config(config: &AppConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self::new(client, config.llm_timeout).with_max_output_tokens(config.max_output_tokens)
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// One bounded model call. Dropping the returned future abandons the call.
    async fn invoke(&self, prompt: &str, sampling: Sampling) -> Result<String> {
        let sampling = sampling.with_max_output_tokens(self.max_output_tokens);
        let completion = tokio::time::timeout(self.timeout, self.client.complete(prompt, &sampling))
            .await
            .map_err(|_| {
                GenError::UpstreamUnavailable(format!(
                    "model call timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        log::info!(
            "📥 model={} returned {} bytes in {}ms",
            self.client.model(),
            completion.text.len(),
            completion.latency_ms
        );
        Ok(completion.text)
    }

    /// Generates scenarios for one endpoint.
    pub async fn generate_scenarios(&self, endpoint: &EndpointDescriptor) -> Result<Vec<TestScenario>> {
        let trace = Trace::start(Flow::Scenarios, &endpoint.path, endpoint.method.as_str());

        trace.enter(Stage::BuildPrompt);
        endpoint.validate().map_err(|e| trace.fail(Stage::BuildPrompt, e))?;
        let prompt = prompts::build_scenario_prompt(
            &endpoint.path,
            endpoint.method,
            &endpoint.description,
            &endpoint.scenario_types,
        );

        trace.enter(Stage::InvokeModel);
        let raw = self
            .invoke(&prompt, Sampling::SCENARIOS)
            .await
            .map_err(|e| trace.fail(Stage::InvokeModel, e))?;

        trace.enter(Stage::InterpretResponse);
        let scenarios =
            interpreter::parse_scenarios(&raw).map_err(|e| trace.fail(Stage::InterpretResponse, e))?;

        for scenario in &scenarios {
            if !endpoint.scenario_types.contains(&scenario.scenario_type()) {
                log::warn!(
                    "⚠️  {} {}: model returned unrequested scenario type {}",
                    endpoint.method,
                    endpoint.path,
                    scenario.scenario_type()
                );
            }
        }

        trace.done(format_args!("scenarios={}", scenarios.len()));
        Ok(scenarios)
    }

    /// Generates scenarios for every endpoint, all or nothing.
    ///
    /// Items run concurrently and come back in request order. The first
    /// failure is returned and the calls still in flight are dropped.
    pub async fn generate_batch(&self, endpoints: &[EndpointDescriptor]) -> Result<Vec<EndpointScenarios>> {
        let batch_start = Instant::now();

        let results = future::try_join_all(endpoints.iter().map(|endpoint| async move {
            let scenarios = self.generate_scenarios(endpoint).await?;
            Ok::<_, GenError>(EndpointScenarios::new(endpoint, scenarios))
        }))
        .await?;

        log::info!(
            "📊 Batch of {} completed in {}ms",
            endpoints.len(),
            batch_start.elapsed().as_millis()
        );
        Ok(results)
    }

    /// Generates scenarios for every endpoint, keeping each item's outcome.
    pub async fn generate_batch_outcomes(&self, endpoints: &[EndpointDescriptor]) -> Vec<ItemOutcome> {
        let batch_start = Instant::now();

        let outcomes: Vec<ItemOutcome> = future::join_all(endpoints.iter().map(|endpoint| async move {
            ItemOutcome::from_result(endpoint, self.generate_scenarios(endpoint).await)
        }))
        .await;

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        log::info!(
            "📊 Batch of {} completed in {}ms ({} succeeded, {} failed)",
            endpoints.len(),
            batch_start.elapsed().as_millis(),
            succeeded,
            endpoints.len() - succeeded
        );
        outcomes
    }

    /// Generates a test file for one endpoint.
    pub async fn generate_test_code(&self, request: &CodeGenerationRequest) -> Result<CodeGenerationResult> {
        let endpoint = request.endpoint.as_deref().unwrap_or_default();
        let trace = Trace::start(Flow::Code, endpoint, request.method.as_str());

        trace.enter(Stage::BuildPrompt);
        let api = &request.api;
        let prompt = prompts::build_code_generation_prompt(
            endpoint,
            request.method,
            &api.base_url,
            &api.headers,
            api.request_body.as_ref(),
            api.success_status_code,
            api.example_response.as_ref(),
        );

        trace.enter(Stage::InvokeModel);
        let raw = self
            .invoke(&prompt, Sampling::CODE)
            .await
            .map_err(|e| trace.fail(Stage::InvokeModel, e))?;

        trace.enter(Stage::InterpretResponse);
        let result = interpreter::interpret_code(&raw, request.endpoint.as_deref());

        trace.done(format_args!(
            "filename={} test_count={}",
            result.filename, result.test_case_count
        ));
        Ok(result)
    }
}
