use std::{net::TcpListener, time::Duration};

use anyhow::Context;
use dinescore::{
    configuration::get_configuration,
    dal::{restaurant_db, seed},
    services::GeminiClient,
    startup::run,
};
use env_logger::Env;
use sqlx::sqlite::SqlitePoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;
    log::info!("Gemini settings: {:?}", configuration.gemini);

    // Fail before touching the database or the network when the key is absent.
    let gemini_client =
        GeminiClient::new(&configuration.gemini).context("Failed to set up the Gemini client.")?;

    let connection_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(configuration.database.with_db())
        .await
        .context("Failed to open the restaurant database.")?;

    restaurant_db::init_db(&connection_pool).await?;
    if configuration.database.seed_mock_data {
        let inserted = seed::seed_mock_restaurants(&connection_pool).await?;
        log::info!("Inserted {} mock restaurants", inserted);
    }

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    log::info!("Listening on {}", address);

    run(listener, connection_pool, gemini_client)?.await?;

    Ok(())
}
