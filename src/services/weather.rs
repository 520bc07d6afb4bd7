use opentelemetry::Context;
use thiserror::Error;

use crate::models::WeatherRecord;
use crate::services::fetch::{FetchError, Fetcher};

/// Errors that can occur when resolving current weather
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// WeatherAPI current-conditions resolver
///
/// Queries by "city - state - Brazil"; the city must already have its
/// diacritics stripped (`core::text`), as the provider expects ASCII-ish
/// query strings.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    base_url: String,
    api_key: String,
    fetcher: Fetcher,
}

impl WeatherClient {
    /// Create a new resolver against the given WeatherAPI base URL
    pub fn new(base_url: String, api_key: String, fetcher: Fetcher) -> Self {
        Self {
            base_url,
            api_key,
            fetcher,
        }
    }

    /// Look up current conditions for a normalized city and state
    pub async fn resolve(
        &self,
        cx: &Context,
        city: &str,
        state: &str,
    ) -> Result<WeatherRecord, WeatherError> {
        let query = format!("{} - {} - Brazil", city, state);
        let url = format!(
            "{}/current.json?key={}&q={}&aqi=no&tides=no",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            urlencoding::encode(&query),
        );

        tracing::debug!("Fetching weather for: {}/{}", city, state);

        let fetched = self.fetcher.fetch(cx, &url).await?;

        let record: WeatherRecord =
            serde_json::from_slice(&fetched.body).map_err(FetchError::from)?;

        Ok(record)
    }
}
