use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use classifieds_api::api::{self, AppState};
use classifieds_api::config::AppConfig;
use classifieds_api::domain::pagination::Paginator;
use classifieds_api::infrastructure::media::MediaStorage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,classifieds_api=debug")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database connected and migrated");

    let state = AppState::postgres(
        pool,
        MediaStorage::new(&config.media_root, &config.media_url),
        Paginator::new(config.page_size),
    );
    let app = api::router(state, config.max_upload_bytes);

    // Start server
    let addr = config.bind_addr();
    tracing::info!(page_size = config.page_size.get(), "Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
