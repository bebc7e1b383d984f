//! Relay responses and error mapping.
//!
//! Upstream bodies are passed back byte-for-byte. Every relay failure
//! becomes `500 {"error": "<description>"}` where the description carries
//! the full cause chain.

use std::error::Error as StdError;

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure of the single outbound call to the search service.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The request could not be sent or no response arrived.
    #[error("upstream request failed")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read upstream response")]
    Body(#[source] reqwest::Error),

    /// The response body was not JSON.
    #[error("upstream returned a non-JSON body (status {status})")]
    InvalidJson {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

impl RelayError {
    /// The error and all of its sources, joined with `": "`.
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let message = self.describe();
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

/// A JSON body returned to the client exactly as received from upstream.
#[derive(Debug, Clone)]
pub struct JsonPassthrough {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for JsonPassthrough {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}
