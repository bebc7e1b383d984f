//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, trace span)
//!     → /api/search  → relay.rs    → search service → response.rs
//!     → /api/config  → settings.rs
//!     → /, assets    → assets.rs
//! ```

pub mod assets;
pub mod relay;
pub mod request;
pub mod response;
pub mod server;
pub mod settings;

pub use relay::{Upstream, UpstreamSetupError};
pub use request::{MakeRequestUuidV4, RawJson, X_REQUEST_ID};
pub use response::RelayError;
pub use server::{AppState, HttpServer};
pub use settings::ClientSettings;
