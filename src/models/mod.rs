// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AddressRecord, CurrentConditions, WeatherRecord};
pub use requests::CepRequest;
pub use responses::{ErrorBody, WeatherReport};
