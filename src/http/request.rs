//! Request identification and body extraction.
//!
//! Every request gets an `x-request-id` as early as possible so the trace
//! span, the relay's upstream logs and the response all carry the same id.
//! A client-supplied id is kept as-is.
//!
//! Search bodies are checked for JSON but kept as the client's exact bytes.

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, FromRequest},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// Read the request id set by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span for the trace layer, tagged with the request id.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id(request.headers()),
        method = %request.method(),
        uri = %request.uri(),
    )
}

/// A request body that is valid JSON, held as the bytes the client sent.
#[derive(Debug, Clone)]
pub struct RawJson(pub Bytes);

/// Why a body was not accepted as [`RawJson`].
#[derive(Debug, thiserror::Error)]
pub enum RawJsonRejection {
    #[error("Expected request with `Content-Type: application/json`")]
    MissingContentType,

    #[error("Failed to parse the request body as JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error(transparent)]
    Body(#[from] BytesRejection),
}

impl IntoResponse for RawJsonRejection {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            RawJsonRejection::Body(rejection) => rejection.into_response(),
            RawJsonRejection::MissingContentType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, message).into_response()
            }
            RawJsonRejection::Syntax(_) => (StatusCode::BAD_REQUEST, message).into_response(),
        }
    }
}

impl<S> FromRequest<S> for RawJson
where
    S: Send + Sync,
{
    type Rejection = RawJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(RawJsonRejection::MissingContentType);
        }

        let bytes = Bytes::from_request(req, state).await?;
        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(RawJsonRejection::Syntax)?;

        Ok(Self(bytes))
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}
