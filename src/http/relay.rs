//! Search relay: `POST /api/search`.
//!
//! # Responsibilities
//! - Forward the client's JSON body, byte for byte, to the configured search endpoint
//! - Attach the credential header the browser never sees
//! - Return the upstream status and JSON body unchanged
//!
//! One attempt per request. No retries, no timeout, no caching.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::IgnoredAny;
use url::Url;

use crate::config::schema::{EndpointError, UpstreamConfig};
use crate::http::request::{request_id, RawJson};
use crate::http::response::{JsonPassthrough, RelayError};
use crate::http::server::AppState;

/// Error building the upstream client from configuration.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamSetupError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("invalid credential header name: {0}")]
    HeaderName(#[from] axum::http::header::InvalidHeaderName),

    #[error("credential is not a valid header value")]
    Credential(#[from] axum::http::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The external search service and the credential used to reach it.
pub struct Upstream {
    client: reqwest::Client,
    endpoint: Url,
    key_header: HeaderName,
    key: HeaderValue,
}

impl Upstream {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamSetupError> {
        let endpoint = config.resolve_endpoint()?;
        let key_header = HeaderName::from_bytes(config.key_header.as_bytes())?;
        let mut key = HeaderValue::from_str(&config.query_key)?;
        key.set_sensitive(true);

        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint,
            key_header,
            key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one search request and return the upstream reply verbatim.
    ///
    /// Neither the request body nor the reply body is re-encoded. The reply
    /// must parse as JSON.
    pub async fn search(&self, body: Bytes) -> Result<JsonPassthrough, RelayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(self.key_header.clone(), self.key.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(RelayError::Transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(RelayError::Body)?;

        serde_json::from_slice::<IgnoredAny>(&bytes)
            .map_err(|source| RelayError::InvalidJson { status, source })?;

        Ok(JsonPassthrough {
            status,
            body: bytes,
        })
    }
}

/// Handler for `POST /api/search`.
///
/// Malformed client JSON is rejected by the `RawJson` extractor before any
/// upstream call is made.
pub async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawJson(body): RawJson,
) -> Result<JsonPassthrough, RelayError> {
    let request_id = request_id(&headers);
    let start_time = Instant::now();

    tracing::debug!(
        request_id = %request_id,
        endpoint = %state.upstream.endpoint().path(),
        bytes = body.len(),
        "Relaying search request"
    );

    match state.upstream.search(body).await {
        Ok(reply) => {
            tracing::info!(
                request_id = %request_id,
                status = %reply.status,
                bytes = reply.body.len(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Upstream responded"
            );
            Ok(reply)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e.describe(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Upstream error"
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_config() -> UpstreamConfig {
        UpstreamConfig {
            endpoint: Some("https://search.example.test/indexes/i/docs/search?api-version=1".into()),
            query_key: "secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_from_valid_config() {
        let upstream = Upstream::from_config(&upstream_config()).unwrap();

        assert_eq!(upstream.endpoint().host_str(), Some("search.example.test"));
        assert_eq!(upstream.key_header.as_str(), "api-key");
        assert!(upstream.key.is_sensitive());
    }

    #[test]
    fn rejects_credential_with_newline() {
        let mut config = upstream_config();
        config.query_key = "bad\nkey".into();

        assert!(matches!(
            Upstream::from_config(&config),
            Err(UpstreamSetupError::Credential(_))
        ));
    }

    #[test]
    fn rejects_missing_endpoint() {
        let mut config = upstream_config();
        config.endpoint = None;

        assert!(matches!(
            Upstream::from_config(&config),
            Err(UpstreamSetupError::Endpoint(EndpointError::Missing))
        ));
    }
}
