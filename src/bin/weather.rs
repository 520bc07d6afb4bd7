//! Weather-lookup service entrypoint.
//!
//! Accepts `GET /{cep}`, continues the trace propagated by the gateway,
//! resolves the code to a city/state via ViaCEP, and composes the current
//! temperature report from WeatherAPI.

use actix_web::{middleware, web, App, HttpServer};
use std::time::Duration;
use tracing::{error, info};

use cep_weather::config::Settings;
use cep_weather::routes::lookup::{self, LookupState};
use cep_weather::services::{AddressClient, Fetcher, WeatherClient};
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

    info!("Starting weather-lookup service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the tracer provider (process-wide, shut down on exit)
    let tracer_provider = telemetry::init_tracing("cep-weather-service", &settings.telemetry)
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

    // Build application state: one pooled client shared by both resolvers
    let fetcher = Fetcher::new(Duration::from_secs(settings.http.timeout_secs));
    let app_state = LookupState {
        address: AddressClient::new(settings.providers.viacep_url.clone(), fetcher.clone()),
        weather: WeatherClient::new(
            settings.providers.weather_url.clone(),
            settings.providers.weather_api_key.clone(),
            fetcher,
        ),
    };

    let host = settings.lookup.host.clone();
    let port = settings.lookup.port;

    info!("Starting HTTP server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(lookup::configure)
    })
    .bind((host, port))?
    .run()
    .await;

    // Flush any spans still batched before the process exits
    telemetry::shutdown_tracing();
    info!("Shutdown complete");

    server
}
