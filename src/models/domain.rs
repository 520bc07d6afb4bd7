use serde::{Deserialize, Serialize};

/// Address record as returned by the ViaCEP provider
///
/// ViaCEP signals "valid format, no such code" with an in-body `erro`
/// sentinel rather than an HTTP status, so the field is part of the record
/// and interpreted by the address resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub erro: String,
}

impl AddressRecord {
    /// Whether the provider actually resolved the code
    pub fn found(&self) -> bool {
        self.erro != "true"
    }
}

/// Current-conditions record as returned by the weather provider
///
/// Only the Celsius reading is consumed; Fahrenheit and Kelvin are derived
/// locally (`core::temperature`) rather than trusted from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
}
