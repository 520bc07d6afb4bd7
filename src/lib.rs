//! CEP Weather - postal code to city/temperature lookup services
//!
//! Two cooperating HTTP services: an edge gateway that validates a Brazilian
//! postal code (CEP) and forwards it downstream, and a weather-lookup service
//! that resolves the code to a city/state via ViaCEP and fetches the current
//! temperature via WeatherAPI. W3C trace context is propagated across the
//! hop so both sides belong to one logical trace.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;

// Re-export commonly used types
pub use self::core::{celsius_to_fahrenheit, celsius_to_kelvin, normalize_cep, strip_diacritics};
pub use models::{AddressRecord, CepRequest, ErrorBody, WeatherRecord, WeatherReport};
