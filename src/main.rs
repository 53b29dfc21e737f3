use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use testgen::api::{configure_routes, AppState};
use testgen::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
        eprintln!("   Falling back to the process environment");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Using provider {} with model {} (timeout {}s, max batch {})",
        app_config.provider.name(),
        app_config.provider.model(),
        app_config.llm_timeout.as_secs(),
        app_config.max_batch_size
    );

    let bind = (app_config.server.host.clone(), app_config.server.port);
    let state = AppState::new(app_config).map_err(std::io::Error::other)?;

    log::info!("🚀 Starting server on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
