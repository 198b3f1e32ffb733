use anyhow::Result;
use dockerview::config::{AppConfig, LoggingConfig};
use dockerview::docker_repo::DockerRepo;
use dockerview::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
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

/// Logs must not land on the dashboard: with no log file they go to stderr
/// and stay off unless RUST_LOG asks for them.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    match &config.file {
        Some(path) => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("log file {}: {}", path, e))?;
            tracing_subscriber::fmt()
                .with_timer(LocalTimer)
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
            tracing_subscriber::fmt()
                .with_timer(LocalTimer)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
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
}

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = AppConfig::load()?;
    init_logging(&app_config.logging)?;

    let docker_repo = match DockerRepo::connect(app_config.repo_options()).await {
        Ok(repo) => Arc::new(repo),
        Err(e) => {
            eprintln!("Failed to connect to Docker: {e}");
            std::process::exit(1);
        }
    };

    let state = Arc::new(worker::PollState::new());
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            daemon: docker_repo.clone(),
            state: state.clone(),
            shutdown_rx,
        },
        worker::WorkerConfig {
            poll_interval: app_config.poll_interval(),
        },
    );

    let stop = Arc::new(AtomicBool::new(false));
    let mut ui = tokio::task::spawn_blocking({
        let state = state.clone();
        let stop = stop.clone();
        move || tui::run(state, stop)
    });

    let ui_result = tokio::select! {
        result = &mut ui => result,
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            stop.store(true, Ordering::Relaxed);
            (&mut ui).await
        }
    };

    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;
    drop(docker_repo);
    tracing::debug!("Daemon connection closed");

    ui_result??;
    Ok(())
}
