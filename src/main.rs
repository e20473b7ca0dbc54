use anyhow::Result;
use eero_dashboard::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let config_path = config::AppConfig::path();
    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = version::VERSION,
        config = %config_path,
        networks = app_config.networks.len(),
        "starting"
    );

    let tokens = Arc::new(token_store::TokenStore::load(
        &app_config.storage.dir,
        app_config.networks.iter().map(|n| n.id.as_str()),
    )?);
    let client = Arc::new(eero_client::EeroClient::new(&app_config.api, tokens.clone())?);
    let networks = Arc::new(networks::NetworkManager::new(
        app_config.clone(),
        Some(config_path.into()),
        tokens,
    ));
    let aggregator = Arc::new(aggregator::Aggregator::new(
        client.clone(),
        networks.clone(),
        app_config.polling.history_capacity,
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            aggregator: aggregator.clone(),
            shutdown_rx,
        },
        worker::WorkerConfig {
            interval_secs: app_config.polling.interval_secs,
        },
    );

    let app = routes::app(aggregator, networks, client, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run until error or SIGTERM, no signal handler
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    let _ = tokio::signal::ctrl_c().await;
                }
            } => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                let _ = worker_handle.await;
            }
        }
    }

    Ok(())
}
