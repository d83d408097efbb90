use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use pulse_api::app::{build_app, services::AppServices, services::build_services};
use pulse_infra::config::Config;
use pulse_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    pulse_observability::init(if config.environment.is_production() {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    let services = Arc::new(build_services(&config).context("failed to initialize storage")?);
    info!(
        environment = %config.environment,
        backend = services.backend_name(),
        "services ready"
    );

    if config.seed_on_startup {
        tokio::spawn(seed_when_connected(services.clone()));
    }

    let app = build_app(&config, services.clone());

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, cors = ?config.cors_origins, "server running");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    services.shutdown().await;
    info!("server stopped");
    Ok(())
}

/// Run the sample-data initializer once storage is reachable.
async fn seed_when_connected(services: Arc<AppServices>) {
    while !services.connection.is_connected() {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    match services.seeder.run(false).await {
        Ok(outcome) => info!(?outcome, "startup seeding finished"),
        Err(e) => warn!(error = %e, "startup seeding failed"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("SIGINT received, shutting down gracefully"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("SIGTERM received, shutting down gracefully");
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
}
