//! Medibot CLI and HTTP server entry point.
//!
//! Binary name: `medibot`
//!
//! Loads `.env` and the TOML configuration, sets up tracing, builds the
//! application state, then either serves HTTP (the default) or runs a
//! one-shot command.

mod cli;
mod http;
mod maintenance;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use medibot_infra::config::{DEFAULT_CONFIG_FILE, apply_env_overrides, env_lookup, load_config};
use medibot_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = apply_env_overrides(load_config(&config_path).await, env_lookup);

    init_tracing(&TracingOptions {
        default_filter: cli.default_filter().to_string(),
        log_file: config.logging.file.as_ref().map(PathBuf::from),
        enable_otel: config.logging.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        host: None,
    });

    let result = match command {
        Commands::Check => {
            let state = AppState::init(config).await?;
            let ready = cli::check::check(&state)?;
            if !ready {
                shutdown_tracing();
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            serve(AppState::init(config).await?).await
        }
    };

    shutdown_tracing();
    result
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, ready = state.readiness.is_ready(), "starting medical chatbot");
    println!(
        "  {} Medical Chatbot listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let cancel = CancellationToken::new();
    let maintenance = maintenance::spawn_maintenance(
        state.clone(),
        maintenance::MAINTENANCE_INTERVAL,
        cancel.clone(),
    );

    let router = http::router::build_router(state);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cancel))
    .await?;

    if let Err(e) = maintenance.await {
        error!(error = %e, "maintenance task panicked");
    }
    println!("\n  Server stopped.");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM, then cancel background tasks.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
    cancel.cancel();
}
