// src/api/handlers/mod.rs
mod health;
mod scenarios;
mod pytest;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::json;

use crate::errors::GenError;

pub use health::{health_check, root};
pub use pytest::{generate_pytest, IntentData, PytestGenerationRequest};
pub use scenarios::{generate_scenarios, BatchQuery, BatchRequest};

/// Renders a generation error as `{ "detail", "kind" }` with its mapped status.
pub(crate) fn error_response(context: &str, err: &GenError) -> HttpResponse {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({
        "detail": format!("{context}: {err}"),
        "kind": err.kind(),
    }))
}
