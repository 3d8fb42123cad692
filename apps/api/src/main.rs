use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::{AppointmentState, AppointmentStore, InMemoryAppointmentStore, SupabaseAppointmentStore};
use shared_config::AppConfig;

fn build_store(config: &AppConfig) -> Arc<dyn AppointmentStore> {
    if config.is_database_configured() {
        info!("Persisting appointments in Supabase at {}", config.supabase_url);
        Arc::new(SupabaseAppointmentStore::new(config))
    } else {
        warn!("Supabase not configured - appointments are kept in memory and lost on restart");
        Arc::new(InMemoryAppointmentStore::new())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting salon booking server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());
    let store = build_store(&config);
    let state = AppointmentState::new(config.clone(), store);

    // Build the application router
    let app = router::create_router(config.clone(), state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        );

    // Run the server
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid BIND_ADDR {}", config.bind_addr))?;
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
