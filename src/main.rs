use std::{io, process::ExitCode};

use anyhow::{Context, Result};
use axum::{Router, serve};
use dotenv::dotenv;
use rmcp::{
    ServiceExt,
    transport::{
        StreamableHttpServerConfig, StreamableHttpService, stdio,
        streamable_http_server::session::local::LocalSessionManager,
    },
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod mcp;
use mcp::{
    BambooHrMcp,
    config::{self, Config, LogFormat, Transport},
};

fn init_tracing(format: LogFormat) {
    // stdout belongs to the stdio transport, logs go to stderr
    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
    });
    let text = (format == LogFormat::Text).then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(json)
        .with(text)
        .init();
}

async fn serve_stdio(server: BambooHrMcp) -> Result<()> {
    info!("Serving MCP over stdio");
    let service = server
        .serve(stdio())
        .await
        .context("failed to start the stdio transport")?;
    service.waiting().await?;
    Ok(())
}

async fn serve_http(server: BambooHrMcp, config: &Config) -> Result<()> {
    // Setting up the Streamable HTTP Service
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    info!("Starting server on {}", config.bind_address);
    let router = Router::new().nest_service("/mcp", service);
    let tcp_listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;

    // Graceful shutdown on CTRL+C
    let shutdown = async {
        signal::ctrl_c().await.unwrap_or_else(|e| {
            error!("failed to install CTRL+C handler: {e}");
        });
    };

    serve(tcp_listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn run() -> Result<()> {
    // Required configuration is checked before any tool is registered
    let config = Config::from_env().context("invalid configuration")?;
    info!(
        subdomain = %config.subdomain,
        base_url = %config.base_url,
        transport = ?config.transport,
        log_format = ?config.log_format,
        "Loaded BambooHR configuration"
    );

    let server = BambooHrMcp::new(&config).context("failed to build the BambooHR client")?;

    match config.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => serve_http(server, &config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load variables from .env file if it exists into the environment
    dotenv().ok();

    init_tracing(config::log_format_from_env());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to start BambooHR MCP server: {e:#}");
            ExitCode::FAILURE
        }
    }
}
