use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use form_filter::config::Settings;
use form_filter::core::PageAggregator;
use form_filter::error::handle_query_payload_error;
use form_filter::routes::{self, AppState};
use form_filter::services::FormsApiClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting form filter service...");

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let forms_api = FormsApiClient::from_settings(&settings.upstream).map_err(|e| {
        error!("Failed to create forms API client: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    info!("Forms API client initialized for {}", settings.upstream.base_url);

    let app_state = AppState {
        forms_api: Arc::new(forms_api),
        aggregator: PageAggregator::new(settings.upstream.page_step),
        default_limit: settings.pagination.default_limit,
        request_timeout: Duration::from_secs(settings.server.request_timeout_secs),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
