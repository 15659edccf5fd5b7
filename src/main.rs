use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cdms_api::config;
use cdms_api::database::manager;
use cdms_api::handlers::AppState;
use cdms_api::routes;
use cdms_api::seed;
use cdms_api::services::{CustomerService, RequestIdGenerator, RequestService};
use cdms_api::store::PgStore;

#[derive(Parser)]
#[command(name = "cdms-api")]
#[command(about = "Customer data management API with maker-checker workflow")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP API server (default)")]
    Serve,

    #[command(about = "Load the demo dataset and print demo tokens")]
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.api.enable_request_logging {
            tracing_subscriber::EnvFilter::new("info,tower_http=debug")
        } else {
            tracing_subscriber::EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!("Starting CDMS API in {:?} mode", config.environment);

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Seed => run_seed().await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let state = build_state().await?;
    let app = routes::app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("CDMS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    println!("🚀 CDMS API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

async fn run_seed() -> anyhow::Result<()> {
    let pool = manager::connect().await.context("database setup")?;
    let store = PgStore::new(pool);
    seed::run(&store).await
}

async fn build_state() -> anyhow::Result<AppState> {
    let pool = manager::connect().await.context("database setup")?;
    let store = Arc::new(PgStore::new(pool.clone()));

    let requests = RequestService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(RequestIdGenerator::new()),
    );
    let customers = CustomerService::new(store.clone(), store);

    Ok(AppState {
        pool,
        requests,
        customers,
    })
}
