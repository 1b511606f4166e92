use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{DatabaseError, RetryConfig, retry, retry_with_backoff};

/// Build client options from config without touching the network.
async fn client_options(config: &MongoConfig) -> Result<ClientOptions, DatabaseError> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));
    options.app_name = config.app_name.clone();

    Ok(options)
}

/// Connect and verify the deployment answers a `ping` on the configured database.
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, DatabaseError> {
    info!(database = %config.database, "Attempting to connect to MongoDB");

    let client = Client::with_options(client_options(config).await?)?;

    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] with exponential backoff.
///
/// `None` uses the default [`RetryConfig`].
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client, DatabaseError> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect_from_config(config), policy).await,
        None => retry(|| connect_from_config(config)).await,
    }
}
