use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::Registry;
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinefile_core::{
    create_audit_system, load_config, metrics, validate_config, AuditEvent, AuditStore,
    AvailabilityService, CompletionReconciler, LibraryCatalog, LogNotifier, MatchConfig,
    MatchEngine, MetadataProvider, Notifier, ReconcilerConfig, RequestStore, SqliteAuditStore,
    SqliteLibrary, SqliteRequestStore, TelegramNotifier, TmdbClient,
};

use cinefile_server::api::create_router;
use cinefile_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for audit event channel
const AUDIT_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("CINEFILE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration - missing credentials abort startup
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("System database: {:?}", config.database.system_path);
    info!("Library database: {:?}", config.database.library_path);

    // Compute config hash for audit
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    let config_hash_short = &config_hash[..16];

    // Create SQLite audit store
    let audit_store: Arc<dyn AuditStore> = Arc::new(
        SqliteAuditStore::new(&config.database.system_path)
            .context("Failed to create audit store")?,
    );
    info!("Audit store initialized");

    // Create SQLite request store
    let request_store: Arc<dyn RequestStore> = Arc::new(
        SqliteRequestStore::new(&config.database.system_path)
            .context("Failed to create request store")?,
    );
    info!("Request store initialized");

    // Open the legacy library (read-only for the decision path)
    let library: Arc<dyn LibraryCatalog> = Arc::new(
        SqliteLibrary::new(&config.database.library_path)
            .context("Failed to open library catalog")?,
    );
    info!(
        "Library catalog opened ({} entries)",
        library.count().unwrap_or(0)
    );

    // Create audit system
    let (audit_handle, audit_writer) =
        create_audit_system(Arc::clone(&audit_store), AUDIT_BUFFER_SIZE);

    // Spawn audit writer task
    let writer_handle = tokio::spawn(audit_writer.run());

    // Emit ServiceStarted event
    audit_handle
        .emit(AuditEvent::ServiceStarted {
            version: VERSION.to_string(),
            config_hash: config_hash_short.to_string(),
        })
        .await;

    // Create TMDB client
    let metadata: Arc<dyn MetadataProvider> = Arc::new(
        TmdbClient::new(config.tmdb.clone()).context("Failed to create TMDB client")?,
    );
    info!("TMDB client initialized");

    // Create notifier - Telegram when configured, log-only otherwise
    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram_config) => {
            info!("Initializing Telegram notifier");
            Arc::new(
                TelegramNotifier::new(telegram_config.clone())
                    .context("Failed to create Telegram notifier")?,
            )
        }
        None => {
            info!("No Telegram configured, notifications are log-only");
            Arc::new(LogNotifier)
        }
    };

    // Create the availability service
    let engine = MatchEngine::with_config(MatchConfig {
        threshold: config.matching.threshold,
        year_tolerance: config.matching.year_tolerance,
        ..MatchConfig::default()
    });
    let availability = AvailabilityService::new(Arc::clone(&library), engine);

    // Create the completion reconciler
    let reconciler = CompletionReconciler::new(
        Arc::clone(&request_store),
        Arc::clone(&notifier),
        ReconcilerConfig {
            threshold: config.matching.threshold,
            year_tolerance: config.matching.year_tolerance,
            pending_scan_limit: config.requests.pending_scan_limit,
        },
    )
    .with_audit(audit_handle.clone());

    // Register metrics
    let metrics_registry = Registry::new();
    metrics::register_metrics(&metrics_registry).context("Failed to register metrics")?;

    // Create app state
    let app_state = Arc::new(AppState::new(
        config.clone(),
        metadata,
        library,
        request_store,
        notifier,
        availability,
        reconciler,
        audit_handle.clone(),
        audit_store,
        metrics_registry,
    ));

    // Create router
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Emit ServiceStopped event
    info!("Server shutting down...");
    audit_handle
        .emit(AuditEvent::ServiceStopped {
            reason: "graceful_shutdown".to_string(),
        })
        .await;

    // Drop all holders of AuditHandle so the writer's channel closes.
    // The reconciler inside AppState holds a clone; AppState is dropped with
    // the router above, so this local handle is the last one.
    drop(audit_handle);

    // Wait for writer to finish processing remaining events
    let _ = writer_handle.await;
    info!("Audit writer stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
