//! MCP tools for interacting with the BambooHR API.
//!
//! Each module implements the tools for one kind of record:
//! - `employees`: List, fetch and update employees
//! - `time_off`: List and create time-off requests
//! - `departments`: List departments, optionally with their employees
//! - `reports`: Run a company report
//! - `custom_fields`: List field metadata
//! - `files`: List an employee's files
//! - `whos_out`: Who is out and which holidays fall in a date range
//!
//! Tools never fail: every upstream error is rendered into the text of a
//! successful envelope by [`respond`].

pub mod custom_fields;
pub mod departments;
pub mod employees;
pub mod files;
pub mod reports;
pub mod time_off;
pub mod whos_out;

use rmcp::model::{CallToolResult, Content};
use tracing::warn;

use crate::mcp::error::BambooError;

/// Wraps a tool outcome in a text envelope; `action` completes the
/// sentence "Error {action}: ...".
pub fn respond(action: &str, outcome: Result<String, BambooError>) -> CallToolResult {
    let text = outcome.unwrap_or_else(|e| {
        warn!(error = %e, "{action} failed");
        format!("Error {action}: {e}")
    });
    CallToolResult::success(vec![Content::text(text)])
}
