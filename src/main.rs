//! HotelConsole API server
//!
//! Main application entry point

use anyhow::Context;
use tracing::info;

use HotelConsole::{
    config::Settings,
    database::{connection::{create_pool, run_migrations, PoolConfig}, DatabaseService},
    http,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate().context("invalid configuration")?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging).context("failed to initialize logging")?;

    info!("Starting {}...", HotelConsole::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&PoolConfig::from(&settings.database))
        .await
        .context("failed to connect to database")?;

    // Run database migrations
    info!("Running database migrations...");
    run_migrations(&pool).await.context("failed to run migrations")?;

    // Initialize services
    info!("Initializing services...");
    let database = DatabaseService::new(pool);
    let services = ServiceFactory::new(&settings, database).context("failed to initialize services")?;

    http::serve(&settings, services).await.context("server error")?;

    info!("HotelConsole has been shut down.");
    Ok(())
}
