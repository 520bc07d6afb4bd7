//! Edge gateway service entrypoint.
//!
//! Accepts `POST /` with a CEP payload, validates it, and forwards the
//! normalized code to the weather-lookup service while injecting the
//! active trace context into the outbound headers.

use actix_web::{middleware, web, App, HttpServer};
use std::time::Duration;
use tracing::{error, info};

use cep_weather::config::Settings;
use cep_weather::routes::gateway::{self, GatewayState};
use cep_weather::services::Fetcher;
use cep_weather::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting CEP gateway service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the tracer provider (process-wide, shut down on exit)
    let tracer_provider = telemetry::init_tracing("cep-gateway", &settings.telemetry)
        .unwrap_or_else(|e| {
            error!("Failed to initialize tracing: {}", e);
            panic!("Telemetry error: {}", e);
        });

    if tracer_provider.is_some() {
        info!(
            "Tracer provider initialized (endpoint: {})",
            settings.telemetry.otlp_endpoint
        );
    }

    // Build application state
    let fetcher = Fetcher::new(Duration::from_secs(settings.http.timeout_secs));
    let app_state = GatewayState {
        fetcher,
        downstream_url: settings.gateway.downstream_url.clone(),
    };

    let host = settings.gateway.host.clone();
    let port = settings.gateway.port;

    info!("Starting HTTP server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(gateway::configure)
    })
    .bind((host, port))?
    .run()
    .await;

    // Flush any spans still batched before the process exits
    telemetry::shutdown_tracing();
    info!("Shutdown complete");

    server
}
