use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use emojimind_persistence::connection::connect_and_migrate;
use emojimind_persistence::repositories::{
    AttemptRepository, ProgressRepository, UserRepository, WordRepository,
};
use emojimind_server::{
    AppState, auth::GoogleAuthService, config::Config, create_routes, oracle::GeminiOracle,
    session::SessionStore,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Emojimind server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    // Word pools are seeded at deployment time; missing entries are filled
    // in on startup.
    let words = WordRepository::new(db.clone());
    if let Err(e) = words.seed_defaults().await {
        tracing::error!("Failed to seed word pools: {:#}", e);
        std::process::exit(1);
    }

    // Check for dev mode
    let auth =
        if std::env::var("AUTH_DEV_MODE").unwrap_or_else(|_| "false".to_string()) == "true" {
            info!("Starting in development authentication mode - token validation disabled");
            GoogleAuthService::new_dev_mode()
        } else {
            GoogleAuthService::new(
                config.google_client_id.clone(),
                config.google_client_secret.clone(),
                config.oauth_redirect_url.clone(),
            )
        };

    let oracle = match GeminiOracle::new(
        config.gemini_api_key.clone(),
        Duration::from_secs(config.oracle_timeout_seconds),
    ) {
        Ok(oracle) => oracle,
        Err(e) => {
            tracing::error!("Failed to build the oracle HTTP client: {:#}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        users: UserRepository::new(db.clone()),
        words,
        progress: ProgressRepository::new(db.clone()),
        attempts: AttemptRepository::new(db),
        sessions: SessionStore::new(),
        auth,
        oracle: Arc::new(oracle),
    });

    let routes = create_routes(state);

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().unwrap(),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
