//! automix-api - HTTP service for the AutoMix DJ-set sequencing engine
//!
//! Accepts analyzed track pools, returns transition plans with M3U and
//! text renderings, and broadcasts generated plans over SSE.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use automix_api::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "automix-api", about = "AutoMix sequencing service")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "AUTOMIX_PORT", default_value_t = 8787)]
    port: u16,

    /// Event bus channel capacity
    #[arg(long, env = "AUTOMIX_EVENT_CAPACITY", default_value_t = 256)]
    event_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting AutoMix API (automix-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let state = AppState::new(args.event_capacity);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("automix-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
