// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub const API_V1_PREFIX: &str = "/api/v1";

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::root))
        .route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope(API_V1_PREFIX)
                .service(
                    web::scope("/playground")
                        .route("/generate-scenarios", web::post().to(handlers::generate_scenarios)),
                )
                .service(
                    web::scope("/chatbot")
                        .route("/generate-pytest", web::post().to(handlers::generate_pytest)),
                ),
        );
}
