// src/prompts.rs
//! Pure prompt construction. Identical input always yields identical text.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{HttpMethod, ScenarioType};

/// Test framework the generated code targets.
pub const TEST_FRAMEWORK: &str = "pytest";

/// HTTP client library the generated tests must use.
pub const HTTP_CLIENT_LIBRARY: &str = "requests";

/// Marker rendered in place of an absent optional field.
pub const ABSENT_MARKER: &str = "None";

/// Builds the prompt asking for a JSON array of test scenarios.
pub fn build_scenario_prompt(
    endpoint: &str,
    method: HttpMethod,
    description: &str,
    scenario_types: &BTreeSet<ScenarioType>,
) -> String {
    let types = scenario_types
        .iter()
        .map(ScenarioType::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Generate test scenarios for the following API endpoint:
Endpoint: {endpoint}
Method: {method}
Description: {description}
Scenario Types: {types}

For each scenario type, provide:
1. A clear description of the test case
2. Expected input data
3. Expected response/behavior

Format the response as a JSON array of objects with the following structure:
[
    {{
        "type": "SCENARIO_TYPE",
        "description": "Test case description",
        "input": "Expected input data",
        "expected_output": "Expected response/behavior"
    }}
]

The "type" value must be one of: {types}.
Every value must be a string.
Ensure the response is valid JSON and only contains the array of scenarios."#
    )
}

/// Builds the prompt asking for a complete test file for one endpoint.
#[allow(clippy::too_many_arguments)]
pub fn build_code_generation_prompt(
    endpoint: &str,
    method: HttpMethod,
    base_url: &str,
    headers: &BTreeMap<String, String>,
    request_body: Option<&serde_json::Value>,
    success_status_code: u16,
    example_response: Option<&serde_json::Value>,
) -> String {
    let headers = serde_json::to_string_pretty(headers).unwrap_or_else(|_| "{}".to_string());
    let request_body = render_optional(request_body);
    let example_response = render_optional(example_response);

    format!(
        r#"Generate a {TEST_FRAMEWORK} test file for the following API endpoint:
Endpoint: {endpoint}
Method: {method}
Base URL: {base_url}
Headers: {headers}
Request Body: {request_body}
Expected Success Status Code: {success_status_code}
Example Response: {example_response}

Requirements:
1. Use the {HTTP_CLIENT_LIBRARY} library
2. Include appropriate imports
3. Create a fixture for base_url and headers
4. Generate at least one positive test case
5. Generate at least one negative test case
6. Use appropriate {TEST_FRAMEWORK} markers
7. Include clear test case descriptions
8. Add assertions for status codes and response data

Format the response as a Python code string with proper indentation.
The response should only contain the Python code, no explanations."#
    )
}

fn render_optional(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
        None => ABSENT_MARKER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_types() -> BTreeSet<ScenarioType> {
        ScenarioType::ALL.into_iter().collect()
    }

    #[test]
    fn test_scenario_prompt_embeds_inputs() {
        let prompt = build_scenario_prompt(
            "/users/{id}",
            HttpMethod::Delete,
            "Delete a user by id",
            &all_types(),
        );

        assert!(prompt.contains("Endpoint: /users/{id}"));
        assert!(prompt.contains("Method: DELETE"));
        assert!(prompt.contains("Description: Delete a user by id"));
        for t in ScenarioType::ALL {
            assert!(prompt.contains(t.as_str()), "missing {t}");
        }
        for key in ["\"type\"", "\"description\"", "\"input\"", "\"expected_output\""] {
            assert!(prompt.contains(key), "missing key {key}");
        }
        assert!(prompt.contains("only contains the array"));
    }

    #[test]
    fn test_scenario_prompt_lists_only_requested_types() {
        let types = BTreeSet::from([ScenarioType::Security]);
        let prompt = build_scenario_prompt("/login", HttpMethod::Post, "Log in", &types);

        assert!(prompt.contains("Scenario Types: SECURITY\n"));
        assert!(!prompt.contains("PERFORMANCE"));
    }

    #[test]
    fn test_code_prompt_renders_absent_fields_as_none() {
        let prompt = build_code_generation_prompt(
            "/users",
            HttpMethod::Get,
            "https://api.example.com",
            &BTreeMap::new(),
            None,
            200,
            None,
        );

        assert!(prompt.contains("Request Body: None\n"));
        assert!(prompt.contains("Example Response: None\n"));
        assert!(prompt.contains("Headers: {}\n"));
        assert!(prompt.contains("Expected Success Status Code: 200"));
    }

    #[test]
    fn test_code_prompt_embeds_details_and_requirements() {
        let headers = BTreeMap::from([
            ("Authorization".to_string(), "Bearer t".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ]);
        let body = json!({ "name": "Ada" });
        let example = json!({ "id": 7, "name": "Ada" });

        let prompt = build_code_generation_prompt(
            "/users",
            HttpMethod::Post,
            "https://api.example.com",
            &headers,
            Some(&body),
            201,
            Some(&example),
        );

        assert!(prompt.contains("Method: POST"));
        assert!(prompt.contains("Base URL: https://api.example.com"));
        assert!(prompt.contains("\"Authorization\": \"Bearer t\""));
        assert!(prompt.contains("\"name\": \"Ada\""));
        assert!(prompt.contains("\"id\": 7"));
        assert!(prompt.contains("Expected Success Status Code: 201"));
        assert!(prompt.contains("Use the requests library"));
        assert!(prompt.contains("fixture for base_url and headers"));
        assert!(prompt.contains("at least one positive test case"));
        assert!(prompt.contains("at least one negative test case"));
        assert!(prompt.contains("no explanations"));
        assert!(!prompt.contains("Request Body: None"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let types = all_types();
        let a = build_scenario_prompt("/a", HttpMethod::Put, "update", &types);
        let b = build_scenario_prompt("/a", HttpMethod::Put, "update", &types);
        assert_eq!(a, b);

        let headers = BTreeMap::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]);
        let body = json!({ "z": 1, "a": [1, 2] });
        let first = build_code_generation_prompt("/a", HttpMethod::Patch, "http://x", &headers, Some(&body), 200, None);
        let second = build_code_generation_prompt("/a", HttpMethod::Patch, "http://x", &headers, Some(&body), 200, None);
        assert_eq!(first, second);
    }
}
