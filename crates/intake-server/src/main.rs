#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use server::config::{CliArgs, ServerConfig, StoreBackend};
use server::limit::RateLimiter;
use server::mail::{EmailService, SendGridTransport};
use server::pipeline::IntakeService;
use server::routes::{AppState, app};
use server::store::{DocumentStore, FirestoreStore, MemoryStore};
use server::telemetry::init_telemetry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry()?;

    let store = build_store(&config)?;
    let email = build_email_service(&config);
    let config = Arc::new(config);

    let limiter = Arc::new(RateLimiter::new(
        Duration::from_secs(config.rate_limit_window_secs),
        config.rate_limit_max_requests,
    ));
    let service = IntakeService::new(store, email, Arc::clone(&config));
    let state = AppState { service, limiter };

    let listener = TcpListener::bind(&config.server_addr).await?;
    log_startup_info(&config, state.service.email_enabled());

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shut down successfully");
    Ok(())
}

/// Selects the document-store adapter from configuration.
fn build_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.store {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Firestore => {
            // Config validation already required the project id; this guard
            // keeps the construction self-contained.
            let project_id = config.firestore_project_id.clone().ok_or_else(|| {
                anyhow::anyhow!("FIRESTORE_PROJECT_ID is required when STORE is `firestore`")
            })?;
            Ok(Arc::new(FirestoreStore::new(
                config.firestore_base_url.clone(),
                project_id,
                config.firestore_token.clone(),
            )))
        }
    }
}

/// Initializes the email capability once at startup.
///
/// Missing credentials disable the capability rather than failing startup:
/// submissions still succeed with an advisory message.
fn build_email_service(config: &ServerConfig) -> EmailService {
    match &config.sendgrid_api_key {
        Some(api_key) => EmailService::new(
            Arc::new(SendGridTransport::new(
                config.sendgrid_base_url.clone(),
                api_key.clone(),
                config.email_from.clone(),
            )),
            config.program_name.clone(),
        ),
        None => {
            tracing::warn!("SENDGRID_API_KEY not set; email notifications disabled");
            EmailService::disabled(config.program_name.clone())
        }
    }
}

fn log_startup_info(config: &ServerConfig, email_enabled: bool) {
    tracing::info!(
        "Starting intake service on {} in {} mode (store: {:?}, collection: {}, email enabled: {})",
        config.server_addr,
        config.environment,
        config.store,
        config.collection,
        email_enabled
    );
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
}
