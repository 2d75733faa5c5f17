//! shortgen server binary.
//!
//! Starts the HTTP API and the job executor loop in one process. The
//! queue and result store are shared between them; nothing is persisted
//! across restarts.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use sgen_api::{create_router, ApiConfig, AppState};
use sgen_queue::{JobQueue, ResultStore};
use sgen_worker::{JobExecutor, ShortsProcessor, WorkerConfig};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let api_config = ApiConfig::from_env();
    let worker_config = WorkerConfig::from_env();

    let queue = Arc::new(JobQueue::new());
    let results = Arc::new(ResultStore::new());

    let processor = ShortsProcessor::production(worker_config.clone())
        .context("failed to build job processor")?;
    let executor = Arc::new(JobExecutor::new(
        Arc::clone(&queue),
        Arc::clone(&results),
        processor,
        worker_config,
    ));

    let executor_task = {
        let executor = Arc::clone(&executor);
        tokio::spawn(async move { executor.run().await })
    };

    let state = AppState::new(api_config.clone(), queue, results);
    let app = create_router(state);

    let addr = api_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    executor.shutdown();
    executor_task.await.ok();

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("Shutdown signal received");
}
