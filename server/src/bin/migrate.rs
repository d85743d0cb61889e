//! Creates the `events` table if it does not exist yet.

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;

use events_server::config::Config;
use events_server::repository::{EventRepository, PgEventRepository};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("Invalid configuration");
    let connect_options = config
        .database
        .connect_options()
        .expect("Invalid database configuration");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.database.acquire_timeout)
        .connect_with(connect_options)
        .await
        .expect("Failed to connect to database");

    PgEventRepository::new(pool)
        .initialize()
        .await
        .expect("Failed to initialize schema");

    tracing::info!("Schema initialized successfully");
}
