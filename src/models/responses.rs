use serde::{Deserialize, Serialize};

use crate::core::{celsius_to_fahrenheit, celsius_to_kelvin};

/// Final payload composed by the weather-lookup service
///
/// `city` carries "City/UF" with diacritics already stripped. Fahrenheit and
/// Kelvin are pure functions of the Celsius reading, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherReport {
    /// Compose the report from a normalized city, state and Celsius reading
    pub fn new(city: &str, state: &str, temp_c: f64) -> Self {
        Self {
            city: format!("{}/{}", city, state),
            temp_c,
            temp_f: celsius_to_fahrenheit(temp_c),
            temp_k: celsius_to_kelvin(temp_c),
        }
    }
}

/// Error body returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub statuscode: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(statuscode: u16, message: impl Into<String>) -> Self {
        Self {
            statuscode,
            message: message.into(),
        }
    }
}
