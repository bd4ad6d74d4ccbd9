use auth_service::{
    build_router,
    config::AuthConfig,
    services::{AuthService, CredentialStore, LockoutTracker, PasswordPolicy, TokenService},
    AppState,
};
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AuthConfig::from_env()?;

    // Initialize tracing/logging using shared logic
    init_tracing(&config.service_name, &config.log_level);

    // Initialize metrics
    auth_service::services::metrics::init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting authentication service"
    );

    // Initialize the in-memory stores. State lives for the process lifetime
    // only; a restart forgets accounts, lockouts, and revocations, and
    // invalidates all outstanding tokens.
    let credentials = CredentialStore::new(&config.hashing)?;
    let lockout = LockoutTracker::new(&config.lockout);
    let tokens = TokenService::new(&config.token);
    let auth = AuthService::new(credentials, lockout, tokens, PasswordPolicy::default());
    tracing::info!("Credential store, lockout tracker, and token service initialized");

    // Create application state
    let state = AppState {
        config: config.clone(),
        auth,
    };

    // Build application router
    let app = build_router(state).await?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
