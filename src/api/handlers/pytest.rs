// src/api/handlers/pytest.rs
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::handlers::error_response;
use crate::models::{ApiCallDetails, CodeGenerationRequest, HttpMethod};

/// What the caller wants tested, as extracted from a conversation.
#[derive(Deserialize)]
pub struct IntentData {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub method: Option<HttpMethod>,
    #[serde(default)]
    pub requires_details: bool,
}

#[derive(Deserialize)]
pub struct PytestGenerationRequest {
    pub intent_data: IntentData,
    pub api_details: ApiCallDetails,
}

impl From<PytestGenerationRequest> for CodeGenerationRequest {
    fn from(req: PytestGenerationRequest) -> Self {
        CodeGenerationRequest {
            endpoint: req.intent_data.endpoint,
            method: req.intent_data.method.unwrap_or(HttpMethod::Get),
            api: req.api_details,
        }
    }
}

pub async fn generate_pytest(
    state: web::Data<AppState>,
    req: web::Json<PytestGenerationRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    log::info!(
        "📝 pytest generation received: intent={} requires_details={}",
        req.intent_data.intent.as_deref().unwrap_or("<none>"),
        req.intent_data.requires_details
    );

    let request = CodeGenerationRequest::from(req);
    log::info!(
        "📝 generating pytest for {} {}",
        request.method,
        request.endpoint.as_deref().unwrap_or("<none>")
    );

    match state.generator.generate_test_code(&request).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(error_response("Failed to generate pytest code", &e)),
    }
}
