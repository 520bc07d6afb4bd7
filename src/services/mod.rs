// Service exports
pub mod address;
pub mod fetch;
pub mod weather;

pub use address::{AddressClient, AddressError};
pub use fetch::{FetchError, Fetched, Fetcher};
pub use weather::{WeatherClient, WeatherError};
