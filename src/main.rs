use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use diet_api::config::AppConfig;
use diet_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use diet_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "diet-api")]
#[command(about = "Daily diet tracking API")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Keep data in process memory instead of PostgreSQL")]
    in_memory: bool,

    #[arg(long, help = "Apply the database schema before serving")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("diet_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = diet_api::config::config().clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting diet-api in {:?} mode", config.environment);

    let store = build_store(&config, args.in_memory, args.migrate).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("diet-api listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(config, store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("diet-api stopped");
    Ok(())
}

async fn build_store(config: &AppConfig, in_memory: bool, migrate: bool) -> anyhow::Result<Arc<dyn Store>> {
    if in_memory {
        if config.is_production() {
            tracing::warn!("Running with the in-memory store in production; data is lost on restart");
        }
        tracing::info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to PostgreSQL")?;

    if migrate || config.database.run_migrations {
        DatabaseManager::migrate(&pool)
            .await
            .context("failed to apply database schema")?;
    }

    Ok(Arc::new(PgStore::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
