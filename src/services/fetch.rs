use bytes::Bytes;
use opentelemetry::Context;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::telemetry::{self, ClientHeaderInjector};

/// Errors raised by an outbound lookup
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of one outbound GET: wire status plus the fully read body
///
/// The status is carried but never interpreted here. ViaCEP reports
/// not-found in-body, so status interpretation belongs to the resolvers
/// (and, for the gateway, to the verbatim relay).
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Outbound lookup client shared by both resolvers and the gateway forwarder
///
/// One pooled `reqwest::Client` per process; cloning is cheap and the pool is
/// safe for concurrent reuse across requests.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with the given total per-call timeout
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Issue a single GET carrying the active trace context
    ///
    /// The entire body is read before returning; `Response::bytes()` drains
    /// the stream and releases the connection back to the pool on success
    /// and failure alike. Dropping the in-flight future (request deadline)
    /// aborts the transfer and closes the stream.
    pub async fn fetch(&self, cx: &Context, url: &str) -> Result<Fetched, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        telemetry::inject_context(cx, &mut ClientHeaderInjector(&mut headers));

        let response = self.client.get(url).headers(headers).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(Fetched { status, body })
    }
}
