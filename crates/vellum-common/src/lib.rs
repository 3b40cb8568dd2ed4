//! Shared error types and telemetry bootstrap for vellum crates.

pub mod error;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use error::{MarkupError, MediaError, VellumError};
