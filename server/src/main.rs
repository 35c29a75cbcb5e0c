use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use tracker_server::config::Config;
use tracker_server::setup::{ensure_database_directory_from_config, initialize_app};
use tracker_server::telemetry::{init_telemetry, log_startup_info};

/// Task tracker service.
///
/// Exit codes: 0 on graceful shutdown, 1 on configuration errors,
/// 2 on startup failures (context construction or listener bind).
#[derive(Parser)]
#[command(name = "task-tracker")]
#[command(about = "Task tracker HTTP service")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<String>,

    /// Database URL override
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Listen address override
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Listen port override
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log level override
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => Config::from_file(config_file)?,
        None => Config::from_env()?,
    };

    // CLI flags win over every other source
    if let Some(ref database_url) = cli.database_url {
        config.database.url = Some(database_url.clone());
    }

    if let Some(ref listen_addr) = cli.listen_addr {
        config.server.listen_addr = listen_addr.clone();
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(ref log_level) = cli.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to register Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("received SIGTERM, initiating graceful shutdown"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file, if any
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(&cli).context("failed to load configuration")?;

    init_telemetry(&config.logging).context("failed to initialize telemetry")?;

    if let Err(e) = config.validate() {
        error!(error = %e, "configuration validation failed");
        std::process::exit(1);
    }

    log_startup_info(&config);

    ensure_database_directory_from_config(&config)
        .context("failed to create database directory")?;

    // Repository construction and migration complete before the listener
    // ever binds; no request can observe a half-initialized context.
    let context = match initialize_app(&config).await {
        Ok(context) => context,
        Err(e) => {
            error!(error = ?e, "failed to initialize application");
            std::process::exit(2);
        }
    };

    let addr = config.server_address();
    let bound = match context.http_server().bind(&addr).await {
        Ok(bound) => bound,
        Err(e) => {
            error!(error = %e, "failed to bind listener");
            context.shutdown().await;
            std::process::exit(2);
        }
    };

    info!(%addr, "task tracker ready");

    if let Err(e) = bound.serve(shutdown_signal()).await {
        error!(error = %e, "server error");
        context.shutdown().await;
        std::process::exit(2);
    }

    // Graceful path: listener drained, tear down the context and exit 0
    context.shutdown().await;
    info!("task tracker stopped");

    Ok(())
}
