//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// API version used when the endpoint is composed from service and index names.
pub const DEFAULT_API_VERSION: &str = "2024-11-01-preview";

/// Root configuration for the search relay.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream search service and its credential.
    pub upstream: UpstreamConfig,

    /// Non-secret values handed to the browser client.
    pub client: ClientConfig,

    /// Static asset locations.
    pub assets: AssetConfig,

    /// Request limits.
    pub limits: LimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind. `0` picks an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// Upstream search service configuration.
///
/// Either `endpoint` is set to the full search URL, or it is composed from
/// `service_name`, `index_name` and `api_version`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Full search URL, including the query string.
    pub endpoint: Option<String>,

    /// Search service name (`{service}.search.windows.net`).
    pub service_name: Option<String>,

    /// Index to query.
    pub index_name: Option<String>,

    /// `api-version` query parameter for composed endpoints.
    pub api_version: String,

    /// Credential injected into every outbound request.
    pub query_key: String,

    /// Header carrying the credential.
    pub key_header: String,

    /// Route outbound calls through `HTTP(S)_PROXY` when set.
    pub use_system_proxy: bool,
}

impl UpstreamConfig {
    /// Resolve the URL every search request is forwarded to.
    pub fn resolve_endpoint(&self) -> Result<Url, EndpointError> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            return Url::parse(endpoint.trim()).map_err(EndpointError::Invalid);
        }

        match (self.service_name.as_deref(), self.index_name.as_deref()) {
            (Some(service), Some(index)) if !service.is_empty() && !index.is_empty() => {
                let composed = format!(
                    "https://{service}.search.windows.net/indexes/{index}/docs/search?api-version={}",
                    self.api_version
                );
                Url::parse(&composed).map_err(EndpointError::Invalid)
            }
            _ => Err(EndpointError::Missing),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            service_name: None,
            index_name: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            query_key: String::new(),
            key_header: "api-key".to_string(),
            use_system_proxy: true,
        }
    }
}

// The credential must never reach logs.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.query_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("UpstreamConfig")
            .field("endpoint", &self.endpoint)
            .field("service_name", &self.service_name)
            .field("index_name", &self.index_name)
            .field("api_version", &self.api_version)
            .field("query_key", &key)
            .field("key_header", &self.key_header)
            .field("use_system_proxy", &self.use_system_proxy)
            .finish()
    }
}

/// Why an upstream endpoint could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("no upstream endpoint configured (set SEARCH_ENDPOINT or SEARCH_SERVICE_NAME and SEARCH_INDEX_NAME)")]
    Missing,

    #[error("invalid upstream endpoint: {0}")]
    Invalid(url::ParseError),
}

/// Values exposed to the browser through `GET /api/config`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Semantic configuration name used by the client's queries.
    pub semantic_configuration: String,

    /// Storage account holding the documents the results point at.
    pub storage_account_url: String,
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory served by path.
    pub root: String,

    /// File under `root` served at `/`.
    pub index_file: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: "public".to_string(),
            index_file: "index.html".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_body_size: 100 * 1024, // 100KB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
