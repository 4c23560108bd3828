use account_service::{
    build_router,
    config::AccountConfig,
    services::{AccountService, EmailService, JwtService, MongoDb, SystemClock},
    AppState,
};
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AccountConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting account service"
    );

    // Initialize database connection
    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    db.initialize_indexes().await?;
    tracing::info!("Database initialized");

    // Initialize email service
    let email = Arc::new(EmailService::new(&config.smtp)?);

    // Initialize JWT service
    let jwt = JwtService::new(&config.jwt);

    let accounts: Arc<dyn account_service::services::AccountStore> = Arc::new(db.clone());
    let codes: Arc<dyn account_service::services::ConfirmationCodeStore> = Arc::new(db);
    let account_service = AccountService::new(
        accounts.clone(),
        codes.clone(),
        email.clone(),
        jwt.clone(),
        Arc::new(SystemClock),
    );

    let state = AppState {
        config: config.clone(),
        accounts,
        codes,
        email,
        jwt,
        account_service,
    };

    let app = build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
