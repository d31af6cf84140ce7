//! Process configuration loaded once from the environment.
//!
//! `main` loads a `.env` file (if present) and then calls [`Config::from_env`];
//! the resulting value is handed to the server explicitly instead of living in
//! a global.

use std::{env, net::SocketAddr};

use reqwest::Url;

use crate::mcp::error::BambooError;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub subdomain: String,
    pub api_key: String,
    pub base_url: Url,
    pub transport: Transport,
    pub bind_address: SocketAddr,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Fails when `BAMBOOHR_SUBDOMAIN` or `BAMBOOHR_API_KEY` is missing or
    /// empty, or when an optional variable holds an unusable value.
    pub fn from_env() -> Result<Self, BambooError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a pluggable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BambooError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BambooError::MissingConfig(format!("{key} is required")))
        };
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let subdomain = required("BAMBOOHR_SUBDOMAIN")?;
        let api_key = required("BAMBOOHR_API_KEY")?;

        let raw_base = optional("BAMBOOHR_API_BASE_URL").unwrap_or_else(|| default_base_url(&subdomain));
        let base_url = Url::parse(&raw_base).map_err(|e| {
            BambooError::InvalidParams(format!("BAMBOOHR_API_BASE_URL '{raw_base}' is not a valid URL: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BambooError::InvalidParams(format!(
                "BAMBOOHR_API_BASE_URL '{raw_base}' cannot be used as a base URL"
            )));
        }

        let transport = match optional("MCP_TRANSPORT").as_deref() {
            None | Some("stdio") => Transport::Stdio,
            Some("http") => Transport::Http,
            Some(other) => {
                return Err(BambooError::InvalidParams(format!(
                    "MCP_TRANSPORT must be 'stdio' or 'http', got '{other}'"
                )));
            }
        };

        let raw_bind = optional("MCP_BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = raw_bind.parse().map_err(|e| {
            BambooError::InvalidParams(format!("MCP_BIND_ADDRESS '{raw_bind}' is invalid: {e}"))
        })?;

        let log_format = match optional("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(BambooError::InvalidParams(format!(
                    "LOG_FORMAT must be 'text' or 'json', got '{other}'"
                )));
            }
        };

        Ok(Self {
            subdomain,
            api_key,
            base_url,
            transport,
            bind_address,
            log_format,
        })
    }
}

fn default_base_url(subdomain: &str) -> String {
    format!("https://api.bamboohr.com/api/gateway.php/{subdomain}/v1")
}

/// The log format has to be known before the full configuration is parsed,
/// so that configuration failures themselves are logged in the right shape.
pub fn log_format_from_env() -> LogFormat {
    match env::var("LOG_FORMAT").as_deref().map(str::trim) {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}
