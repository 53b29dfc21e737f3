// src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::{ErrorKind, GenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of scenario categories a model may be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioType {
    Positive,
    Negative,
    EdgeCase,
    Performance,
    Security,
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 5] = [
        ScenarioType::Positive,
        ScenarioType::Negative,
        ScenarioType::EdgeCase,
        ScenarioType::Performance,
        ScenarioType::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Positive => "POSITIVE",
            ScenarioType::Negative => "NEGATIVE",
            ScenarioType::EdgeCase => "EDGE_CASE",
            ScenarioType::Performance => "PERFORMANCE",
            ScenarioType::Security => "SECURITY",
        }
    }

    /// Exact, case-sensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_scenario_types() -> BTreeSet<ScenarioType> {
    BTreeSet::from([ScenarioType::Positive, ScenarioType::Negative])
}

/// One endpoint to generate scenarios for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    #[serde(rename = "endpoint")]
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
    #[serde(default = "default_scenario_types")]
    pub scenario_types: BTreeSet<ScenarioType>,
}

impl EndpointDescriptor {
    pub fn new(path: impl Into<String>, method: HttpMethod, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            description: description.into(),
            scenario_types: default_scenario_types(),
        }
    }

    pub fn with_scenario_types(mut self, types: impl IntoIterator<Item = ScenarioType>) -> Self {
        self.scenario_types = types.into_iter().collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(GenError::InvalidRequest("endpoint path must not be empty".to_string()));
        }
        if self.scenario_types.is_empty() {
            return Err(GenError::InvalidRequest(format!(
                "{} {}: at least one scenario type is required",
                self.method, self.path
            )));
        }
        Ok(())
    }
}

/// A generated scenario. Only the response interpreter builds these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestScenario {
    #[serde(rename = "type")]
    scenario_type: ScenarioType,
    description: String,
    input: String,
    expected_output: String,
}

impl TestScenario {
    pub(crate) fn new(
        scenario_type: ScenarioType,
        description: String,
        input: String,
        expected_output: String,
    ) -> Self {
        Self { scenario_type, description, input, expected_output }
    }

    pub fn scenario_type(&self) -> ScenarioType {
        self.scenario_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCallDetails {
    pub base_url: String,
    /// Ordered so prompts render identically for identical input.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub request_body: Option<serde_json::Value>,
    #[serde(default = "default_success_status")]
    pub success_status_code: u16,
    #[serde(default)]
    pub example_response: Option<serde_json::Value>,
}

fn default_success_status() -> u16 {
    200
}

impl ApiCallDetails {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: BTreeMap::new(),
            request_body: None,
            success_status_code: default_success_status(),
            example_response: None,
        }
    }
}

/// Everything the code generation flow needs for one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeGenerationRequest {
    pub endpoint: Option<String>,
    pub method: HttpMethod,
    pub api: ApiCallDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeGenerationResult {
    pub code: String,
    pub filename: String,
    #[serde(rename = "test_count")]
    pub test_case_count: usize,
}

/// Scenarios generated for one batch item, echoing the item it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointScenarios {
    pub endpoint: String,
    pub method: HttpMethod,
    pub scenarios: Vec<TestScenario>,
}

impl EndpointScenarios {
    pub fn new(descriptor: &EndpointDescriptor, scenarios: Vec<TestScenario>) -> Self {
        Self {
            endpoint: descriptor.path.clone(),
            method: descriptor.method,
            scenarios,
        }
    }
}

/// Per-item result when a batch is run without all-or-nothing semantics.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Success {
        endpoint: String,
        method: HttpMethod,
        scenarios: Vec<TestScenario>,
    },
    Failure {
        endpoint: String,
        method: HttpMethod,
        kind: ErrorKind,
        error: String,
    },
}

impl ItemOutcome {
    pub fn from_result(descriptor: &EndpointDescriptor, result: Result<Vec<TestScenario>>) -> Self {
        match result {
            Ok(scenarios) => ItemOutcome::Success {
                endpoint: descriptor.path.clone(),
                method: descriptor.method,
                scenarios,
            },
            Err(e) => ItemOutcome::Failure {
                endpoint: descriptor.path.clone(),
                method: descriptor.method,
                kind: e.kind(),
                error: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success { .. })
    }
}
