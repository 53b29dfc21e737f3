// src/api/handlers/scenarios.rs
use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::handlers::error_response;
use crate::errors::GenError;
use crate::models::{EndpointDescriptor, EndpointScenarios, ItemOutcome};

#[derive(Deserialize)]
pub struct BatchRequest {
    pub endpoints: Vec<EndpointDescriptor>,
}

#[derive(Deserialize, Default)]
pub struct BatchQuery {
    /// Report each item's outcome instead of failing the whole batch.
    #[serde(default)]
    pub partial: bool,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub batch_id: String,
    pub generated_at: String,
    pub results: Vec<EndpointScenarios>,
}

#[derive(Serialize)]
pub struct PartialBatchResponse {
    pub batch_id: String,
    pub generated_at: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<ItemOutcome>,
}

/// Rejects what the request schema forbids before any model call is made.
fn validate_batch(req: &BatchRequest, max_batch_size: usize) -> Result<(), GenError> {
    if req.endpoints.len() > max_batch_size {
        return Err(GenError::InvalidRequest(format!(
            "batch contains {} endpoints, the maximum is {}",
            req.endpoints.len(),
            max_batch_size
        )));
    }
    req.endpoints.iter().try_for_each(EndpointDescriptor::validate)
}

pub async fn generate_scenarios(
    state: web::Data<AppState>,
    query: web::Query<BatchQuery>,
    req: web::Json<BatchRequest>,
) -> Result<HttpResponse> {
    let batch_id = Uuid::new_v4().to_string();
    let req = req.into_inner();

    log::info!(
        "📝 batch {} received: {} endpoint(s), partial={}",
        batch_id,
        req.endpoints.len(),
        query.partial
    );

    if let Err(e) = validate_batch(&req, state.config.max_batch_size) {
        log::warn!("batch {} rejected: {}", batch_id, e);
        return Ok(error_response("Invalid scenario request", &e));
    }

    if query.partial {
        let results = state.generator.generate_batch_outcomes(&req.endpoints).await;
        let succeeded = results.iter().filter(|o| o.is_success()).count();
        return Ok(HttpResponse::Ok().json(PartialBatchResponse {
            batch_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }));
    }

    match state.generator.generate_batch(&req.endpoints).await {
        Ok(results) => Ok(HttpResponse::Ok().json(BatchResponse {
            batch_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            results,
        })),
        Err(e) => {
            log::error!("batch {} failed: {}", batch_id, e);
            Ok(error_response("Failed to generate test scenarios", &e))
        }
    }
}
