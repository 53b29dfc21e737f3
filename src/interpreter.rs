// src/interpreter.rs
//! Turns raw model text back into domain objects.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::errors::{GenError, Result};
use crate::models::{CodeGenerationResult, ScenarioType, TestScenario};

/// Keys every scenario object must carry, exactly as written.
pub const SCENARIO_KEYS: [&str; 4] = ["type", "description", "input", "expected_output"];

/// Literal that opens a test function in the generated code.
pub const TEST_FUNCTION_MARKER: &str = "def test_";

pub const TEST_FILE_PREFIX: &str = "test_";
pub const TEST_FILE_EXTENSION: &str = ".py";

/// Stands in for an endpoint path that was never supplied.
pub const UNKNOWN_ENDPOINT: &str = "unknown";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)\r?\n?```\s*$").unwrap()
});

/// Removes one Markdown code fence wrapping the whole text, if present.
pub fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str(),
        None => raw,
    }
}

/// Parses model output into scenarios.
///
/// The text must be a JSON array of objects, each holding the four
/// [`SCENARIO_KEYS`] with string values and a known scenario type. Any
/// violation rejects the whole response; nothing is skipped or coerced.
/// An empty array is a valid, empty result.
pub fn parse_scenarios(raw: &str) -> Result<Vec<TestScenario>> {
    let text = strip_code_fence(raw).trim();

    let value: Value = serde_json::from_str(text)
        .map_err(|e| GenError::MalformedModelOutput(format!("response is not valid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(GenError::MalformedModelOutput(format!(
                "expected a JSON array of scenarios, got {}",
                json_type_name(&other)
            )));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_scenario(index, item))
        .collect()
}

fn parse_scenario(index: usize, item: &Value) -> Result<TestScenario> {
    let object = item.as_object().ok_or_else(|| {
        GenError::MalformedModelOutput(format!(
            "scenario {index} is {}, expected an object",
            json_type_name(item)
        ))
    })?;

    let field = |key: &str| -> Result<String> {
        match object.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(GenError::MalformedModelOutput(format!(
                "scenario {index}: \"{key}\" must be a string, got {}",
                json_type_name(other)
            ))),
            None => Err(GenError::MalformedModelOutput(format!(
                "scenario {index}: missing required key \"{key}\""
            ))),
        }
    };

    let [type_key, description_key, input_key, expected_key] = SCENARIO_KEYS;
    let type_name = field(type_key)?;
    let scenario_type = ScenarioType::from_name(&type_name).ok_or_else(|| {
        GenError::MalformedModelOutput(format!(
            "scenario {index}: unknown scenario type \"{type_name}\""
        ))
    })?;

    Ok(TestScenario::new(
        scenario_type,
        field(description_key)?,
        field(input_key)?,
        field(expected_key)?,
    ))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Wraps generated code with its derived filename and test count.
///
/// The code itself is not checked for syntax.
pub fn interpret_code(raw: &str, endpoint: Option<&str>) -> CodeGenerationResult {
    let code = strip_code_fence(raw).to_string();
    let test_case_count = count_test_cases(&code);

    CodeGenerationResult {
        filename: derive_filename(endpoint),
        test_case_count,
        code,
    }
}

/// Counts test function definitions. A heuristic lower bound, not a guarantee.
pub fn count_test_cases(code: &str) -> usize {
    code.matches(TEST_FUNCTION_MARKER).count()
}

/// `/users/{id}` becomes `test_users_id.py`.
pub fn derive_filename(endpoint: Option<&str>) -> String {
    let endpoint = endpoint
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(UNKNOWN_ENDPOINT);

    let stem: String = endpoint
        .chars()
        .filter(|c| !matches!(c, '{' | '}'))
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { UNKNOWN_ENDPOINT } else { stem };

    format!("{TEST_FILE_PREFIX}{stem}{TEST_FILE_EXTENSION}")
}
