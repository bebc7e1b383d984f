//! Observability subsystem.
//!
//! Structured logging only: every request gets a span from the trace layer
//! and an `x-request-id`, and the relay logs upstream outcomes against it.
//! There is no metrics exporter.

pub mod logging;

pub use logging::init_logging;
