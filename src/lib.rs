//! Search relay library.
//!
//! Forwards browser search requests to a managed search service, attaching
//! a server-held credential, and serves the static client that issues them.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
