use core_config::{ConfigError, FromEnv, env_parse_or};

/// MongoDB connection settings.
///
/// ```ignore
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "eventsDB")
///     .with_app_name("calendar-api");
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,
    pub database: String,
    /// Reported in server logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Load from the environment, using `default_database` when neither
    /// `MONGODB_DATABASE` nor `MONGO_DATABASE` is set.
    pub fn from_env_or_database(default_database: &str) -> Result<Self, ConfigError> {
        load(Some(default_database))
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "default".to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

/// Environment variables:
/// - `MONGODB_URL`, `MONGODB_URI` or `MONGO_URL` (required, first set wins)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (required)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` (default: 100)
/// - `MONGODB_MIN_POOL_SIZE` (default: 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load(None)
    }
}

fn load(default_database: Option<&str>) -> Result<MongoConfig, ConfigError> {
    let url = ["MONGODB_URL", "MONGODB_URI", "MONGO_URL"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok())
        .ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_URL, MONGODB_URI or MONGO_URL".to_string())
        })?;

    let database = std::env::var("MONGODB_DATABASE")
        .or_else(|_| std::env::var("MONGO_DATABASE"))
        .ok()
        .or_else(|| default_database.map(str::to_string))
        .ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_DATABASE or MONGO_DATABASE".to_string())
        })?;

    let defaults = MongoConfig::default();

    Ok(MongoConfig {
        url,
        database,
        app_name: std::env::var("MONGODB_APP_NAME").ok(),
        max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?,
        min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?,
        connect_timeout_secs: env_parse_or(
            "MONGODB_CONNECT_TIMEOUT_SECS",
            defaults.connect_timeout_secs,
        )?,
        server_selection_timeout_secs: env_parse_or(
            "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
            defaults.server_selection_timeout_secs,
        )?,
    })
}
