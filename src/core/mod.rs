// Core request-scoped logic exports
pub mod cep;
pub mod temperature;
pub mod text;

pub use cep::{normalize_cep, ValidationError, CEP_LENGTH};
pub use temperature::{celsius_to_fahrenheit, celsius_to_kelvin};
pub use text::strip_diacritics;
