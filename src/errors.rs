// src/errors.rs
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    /// Network failure or timeout while talking to the model service.
    #[error("Model service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The model service answered, but with an application-level error.
    #[error("Model service returned an error{}: {message}", status_suffix(.status))]
    UpstreamError { status: Option<u16>, message: String },

    /// Text came back but does not have the expected shape.
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`GenError`], stable enough to put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UpstreamUnavailable,
    UpstreamError,
    MalformedModelOutput,
    InvalidRequest,
    Config,
}

impl GenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            GenError::UpstreamError { .. } => ErrorKind::UpstreamError,
            GenError::MalformedModelOutput(_) => ErrorKind::MalformedModelOutput,
            GenError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            GenError::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status the API layer reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GenError::InvalidRequest(_) => 400,
            GenError::UpstreamUnavailable(_) => 503,
            _ => 500,
        }
    }
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            GenError::UpstreamUnavailable(err.to_string())
        } else {
            GenError::UpstreamError {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

/// Uses the wire name, so logs and response bodies agree.
impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.write_str(&name),
            _ => write!(f, "{:?}", self),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message_includes_status() {
        let err = GenError::UpstreamError {
            status: Some(429),
            message: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Model service returned an error (status 429): quota exceeded"
        );

        let err = GenError::UpstreamError {
            status: None,
            message: "blocked".to_string(),
        };
        assert_eq!(err.to_string(), "Model service returned an error: blocked");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GenError::InvalidRequest("x".into()).status_code(), 400);
        assert_eq!(GenError::UpstreamUnavailable("x".into()).status_code(), 503);
        assert_eq!(GenError::MalformedModelOutput("x".into()).status_code(), 500);
        assert_eq!(GenError::Config("x".into()).status_code(), 500);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let kind = GenError::MalformedModelOutput("x".into()).kind();
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"malformed_model_output\"");
        assert_eq!(kind.to_string(), "malformed_model_output");
    }

    #[test]
    fn test_kind_display_matches_wire_name() {
        let kinds = [
            ErrorKind::UpstreamUnavailable,
            ErrorKind::UpstreamError,
            ErrorKind::MalformedModelOutput,
            ErrorKind::InvalidRequest,
            ErrorKind::Config,
        ];
        for kind in kinds {
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{kind}\"")
            );
        }
        assert_eq!(ErrorKind::Config.to_string(), "config");
    }
}
