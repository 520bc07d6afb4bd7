use opentelemetry::Context;
use thiserror::Error;

use crate::models::AddressRecord;
use crate::services::fetch::{FetchError, Fetcher};

/// Errors that can occur when resolving a CEP to an address
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("zipcode not found")]
    NotFound,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// ViaCEP address resolver
///
/// Resolves a normalized CEP to city and state. The provider reports
/// not-found with an in-body sentinel (`"erro": "true"`) on a 200 response,
/// which is surfaced as [`AddressError::NotFound`].
#[derive(Debug, Clone)]
pub struct AddressClient {
    base_url: String,
    fetcher: Fetcher,
}

impl AddressClient {
    /// Create a new resolver against the given ViaCEP base URL
    pub fn new(base_url: String, fetcher: Fetcher) -> Self {
        Self { base_url, fetcher }
    }

    /// Look up the address record for a normalized 8-character CEP
    pub async fn resolve(&self, cx: &Context, cep: &str) -> Result<AddressRecord, AddressError> {
        let url = format!("{}/ws/{}/json", self.base_url.trim_end_matches('/'), cep);

        tracing::debug!("Fetching address from: {}", url);

        let fetched = self.fetcher.fetch(cx, &url).await?;

        let record: AddressRecord =
            serde_json::from_slice(&fetched.body).map_err(FetchError::from)?;

        if !record.found() {
            return Err(AddressError::NotFound);
        }

        Ok(record)
    }
}
