//! MongoDB connection management for the workspace services.
//!
//! - [`mongodb`]: configuration from the environment, connecting with retry,
//!   and ping-based health checks
//! - [`common`]: the shared error type and retry with exponential backoff
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};
