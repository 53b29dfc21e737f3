// src/api/handlers/health.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::api::AppState;

pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "testgen",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

pub async fn root(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "name": state.config.project_name,
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.config.provider.name(),
        "model": state.generator.model(),
        "max_batch_size": state.config.max_batch_size
    })))
}
