use mongodb::{Client, bson::doc};
use std::time::Instant;

use crate::common::DatabaseError;

/// Detailed MongoDB health
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error text when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping the `admin` database.
pub async fn check_health(client: &Client) -> Result<(), DatabaseError> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))
}

/// [`check_health`] with latency.
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = check_health(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
