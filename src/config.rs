use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub lookup: LookupSettings,
    #[serde(default)]
    pub providers: ProviderSettings,
    #[serde(default)]
    pub http: HttpClientSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Edge gateway service settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Base URL of the downstream weather-lookup service
    #[serde(default = "default_downstream_url")]
    pub downstream_url: String,
}

/// Downstream weather-lookup service settings
#[derive(Debug, Clone, Deserialize)]
pub struct LookupSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_lookup_port")]
    pub port: u16,
}

/// External provider endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_viacep_url")]
    pub viacep_url: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default)]
    pub weather_api_key: String,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientSettings {
    /// Total timeout for one outbound call, matching the request deadline
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// OpenTelemetry export settings
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    #[serde(default = "default_sample_ratio")]
    pub sample_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_gateway_port() -> u16 { 8080 }
fn default_lookup_port() -> u16 { 8081 }
fn default_downstream_url() -> String { "http://localhost:8081".to_string() }
fn default_viacep_url() -> String { "https://viacep.com.br".to_string() }
fn default_weather_url() -> String { "https://api.weatherapi.com/v1".to_string() }
fn default_timeout_secs() -> u64 { 60 }
fn default_true() -> bool { true }
fn default_otlp_endpoint() -> String { "http://localhost:4317".to_string() }
fn default_sample_ratio() -> f64 { 1.0 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_gateway_port(),
            downstream_url: default_downstream_url(),
        }
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_lookup_port(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            viacep_url: default_viacep_url(),
            weather_url: default_weather_url(),
            weather_api_key: String::new(),
        }
    }
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            otlp_endpoint: default_otlp_endpoint(),
            sample_ratio: default_sample_ratio(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CEPW__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local config file for development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g. CEPW__GATEWAY__PORT -> gateway.port
            .add_source(
                Environment::with_prefix("CEPW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CEPW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment variables as overrides
///
/// `WEATHER_API_KEY` and `OTLP_ENDPOINT` are honored directly so deployment
/// environments do not need the prefixed form.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let weather_api_key = env::var("WEATHER_API_KEY")
        .or_else(|_| env::var("CEPW__PROVIDERS__WEATHER_API_KEY"))
        .ok();
    let otlp_endpoint = env::var("OTLP_ENDPOINT").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = weather_api_key {
        builder = builder.set_override("providers.weather_api_key", key)?;
    }
    if let Some(endpoint) = otlp_endpoint {
        builder = builder.set_override("telemetry.otlp_endpoint", endpoint)?;
    }

    builder.build()
}
