use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lso_client::CallbackClient;
use lso_runner::TokioProcessRunner;

mod api;
mod config;
mod service;
#[cfg(test)]
mod test_support;

use config::{DEFAULT_SETTINGS_FILENAME, Settings};
use service::coordinator::RunCoordinator;

#[derive(Parser)]
#[command(name = "lso-server")]
#[command(about = "Ansible playbook launcher with callbacks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the settings file
    #[arg(long, env = "SETTINGS_FILENAME", default_value = DEFAULT_SETTINGS_FILENAME)]
    settings: PathBuf,

    /// Address the HTTP server listens on
    #[arg(long, env = "LSO_BIND_ADDR", default_value = "0.0.0.0:44444")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lso_server=debug,lso_runner=debug,lso_client=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LSO server...");

    let settings = Settings::load(&cli.settings)?;
    tracing::info!(
        "Loaded settings from {} (playbooks in {})",
        cli.settings.display(),
        settings.ansible_playbooks_root_dir.display()
    );
    if let Some(dir) = &settings.executables_root_dir {
        tracing::info!("Executable endpoint enabled for {}", dir.display());
    }

    let notifier = CallbackClient::new(settings.callback_timeout())
        .context("Failed to build callback client")?;
    let coordinator = RunCoordinator::new(
        Arc::new(settings),
        Arc::new(TokioProcessRunner::new()),
        Arc::new(notifier),
    );

    // Build router with all API endpoints
    let app = api::create_router(api::AppState::new(coordinator));

    tracing::info!("Listening on {}", cli.bind);

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", cli.bind))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
