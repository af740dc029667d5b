//! Error types for flashform
//!
//! The session cache itself never fails: missing or expired tokens are
//! reported as absence. These errors cover construction, configuration and
//! the HTTP edge.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlashError {
    /// The background sweeper needs a running Tokio runtime
    #[error("session sweeper requires a Tokio runtime")]
    NoRuntime,

    /// A configuration value is out of range
    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Toml(#[from] basic_toml::Error),
}

impl ResponseError for FlashError {
    fn error_response(&self) -> HttpResponse {
        log::error!("Request failed: {self}");
        HttpResponse::InternalServerError().json("Internal server error")
    }
}
