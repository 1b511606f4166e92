/// Errors raised while connecting to or probing the database.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Connection could not be verified
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
