use axum::http::{HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Parse a comma-separated origin list, skipping blank entries.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    Ok(origins)
}

/// Creates a CORS layer for the given origins.
///
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Authorization, Accept
/// - Credentials allowed, 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Build the CORS layer from the required `CORS_ALLOWED_ORIGIN` variable.
///
/// Examples:
/// - Development: `CORS_ALLOWED_ORIGIN=http://localhost:3000,http://localhost:5173`
/// - Production: `CORS_ALLOWED_ORIGIN=https://calendar.example.com`
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let raw = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000",
        )
    })?;

    let origins = parse_allowed_origins(&raw)?;
    tracing::info!("CORS configured with allowed origins: {}", raw);

    Ok(create_cors_layer(origins))
}
