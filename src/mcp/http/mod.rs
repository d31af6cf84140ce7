//! HTTP client and API communication layer for BambooHR.
//!
//! This module handles all HTTP communication with BambooHR's REST API,
//! including authentication, request construction, and response decoding
//! (JSON everywhere, XML for the who's-out calendar).

mod calendar;
mod client;

// Re-export client's public API
pub use client::{BambooClient, TimeOffPayload};
