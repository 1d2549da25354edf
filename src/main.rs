use book_sales_tracker::{
    adapters::file::FileSnapshotStore,
    adapters::mock::LoggingNotificationSink,
    adapters::postgres::{PostgresSnapshotStore, run_migrations},
    api::{handlers::AppState, router::create_router},
    application::inventory::{InventoryStore, StoreDependencies},
    config::AppConfig,
    ports::SnapshotStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_sales_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Select the snapshot store
    let snapshot_store: Arc<dyn SnapshotStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Persisting snapshots to PostgreSQL");

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            run_migrations(&pool)
                .await
                .expect("Failed to run migrations");

            Arc::new(PostgresSnapshotStore::new(pool))
        }
        None => {
            tracing::info!("Persisting snapshots under {}", config.data_dir.display());
            Arc::new(FileSnapshotStore::new(config.data_dir.clone()))
        }
    };

    let deps = StoreDependencies {
        snapshot_store,
        notification_sink: Arc::new(LoggingNotificationSink::new()),
    };

    // Load the store explicitly before serving
    let mut store = InventoryStore::new(deps, config.storage_key.clone());
    store.subscribe(|| tracing::debug!("Inventory changed"));
    if let Err(e) = store.load().await {
        tracing::error!("Failed to load inventory, starting empty: {}", e);
    }

    let app_state = Arc::new(AppState::new(store));

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
