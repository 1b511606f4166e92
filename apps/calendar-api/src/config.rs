use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Database used when neither `MONGODB_DATABASE` nor `MONGO_DATABASE` is set
pub const DEFAULT_DATABASE: &str = "eventsDB";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();

        let mut mongodb = MongoConfig::from_env_or_database(DEFAULT_DATABASE)?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app.name);
        }

        Ok(Self {
            app,
            mongodb,
            server: ServerConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";
    const MONGO_URL: &str = "mongodb://localhost:27017";

    #[test]
    fn test_defaults_to_events_database() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("MONGODB_URL", Some(MONGO_URL)),
                ("MONGO_URL", None),
                ("MONGODB_URI", None),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", None),
                ("MONGODB_APP_NAME", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database(), DEFAULT_DATABASE);
                assert_eq!(config.mongodb.app_name.as_deref(), Some("calendar_api"));
                assert_eq!(config.server.port, 8080);
            },
        );
    }

    #[test]
    fn test_database_override() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("MONGODB_URL", Some(MONGO_URL)),
                ("MONGO_URL", None),
                ("MONGODB_URI", None),
                ("MONGODB_DATABASE", Some("calendar_test")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database(), "calendar_test");
            },
        );
    }

    #[test]
    fn test_requires_jwt_secret() {
        temp_env::with_var("JWT_SECRET", None::<&str>, || {
            assert!(Config::from_env().is_err());
        });
    }
}
