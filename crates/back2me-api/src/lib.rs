//! Back2Me API
//!
//! HTTP surface for the claim and reputation core. Wires the SQLite store,
//! the claim registry, the reputation aggregator, and the notification
//! worker together behind an axum router.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use back2me_claims::ClaimRegistry;
use back2me_notify::{notification_channel, ResendMailer};
use back2me_reputation::ReputationAggregator;
use back2me_store::SqliteStore;
use config::ApiConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// API server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Store initialization error
    #[error("Store error: {0}")]
    Store(#[from] back2me_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Assemble the application state from configuration
///
/// Spawns the notification worker when a Resend API key is configured;
/// without one the registry runs with dispatch disabled and claims still
/// succeed.
pub fn build_state(config: &ApiConfig) -> Result<AppState, ServerError> {
    let store = SqliteStore::new(&config.database_path)?;

    let mut registry = ClaimRegistry::default_config();
    match &config.resend_api_key {
        Some(api_key) => {
            let mut mailer = ResendMailer::new(api_key);
            if let Some(from) = &config.notify_from {
                mailer = mailer.with_from(from);
            }
            let (handle, worker) = notification_channel(mailer, config.notification_queue);
            tokio::spawn(worker.run());
            registry = registry.with_notifier(Box::new(handle));
        }
        None => {
            warn!("No Resend API key configured; owner notifications disabled");
        }
    }

    Ok(AppState {
        store: Arc::new(Mutex::new(store)),
        registry: Arc::new(registry),
        aggregator: Arc::new(ReputationAggregator::new()),
    })
}

/// Start the API HTTP server
///
/// Loads configuration, initializes the store and services, and starts
/// the axum server.
pub async fn start_server(config: ApiConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Back2Me API");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);

    let state = build_state(&config)?;
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
