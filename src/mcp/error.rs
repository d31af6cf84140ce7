//! Error types for the BambooHR MCP implementation.
//!
//! This module contains the custom error type raised by the upstream client.
//! It provides:
//! - `BambooError`: The main error enum that covers all possible error cases
//! - Conversions from the underlying error types (`reqwest`, `serde_json`, `quick_xml`)
//!
//! Tools never surface these as protocol errors; they are rendered into the
//! text envelope by `tools::respond`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BambooError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("BambooHR returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),
}
