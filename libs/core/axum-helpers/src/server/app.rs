use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Creates the application router with documentation and cross-cutting layers.
///
/// - OpenAPI docs: Swagger UI (`/swagger-ui`), ReDoc (`/redoc`), RapiDoc
///   (`/rapidoc`), Scalar (`/scalar`), raw spec at `/api-docs/openapi.json`
/// - `apis` nested under `/api`
/// - Tracing, security headers, CORS and response compression
/// - JSON 404 fallback
///
/// CORS origins come from the required `CORS_ALLOWED_ORIGIN` variable.
/// Health endpoints are merged by the caller with
/// [`health_router`](super::health_router).
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    Ok(create_router_with_cors::<T>(apis, cors_layer_from_env()?))
}

/// [`create_router`] with an explicit CORS layer.
pub fn create_router_with_cors<T>(apis: Router, cors_layer: CorsLayer) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new())
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` bounded by
/// `shutdown_timeout`.
///
/// ```ignore
/// let cleanup = async move {
///     mongo_client.shutdown().await;
/// };
///
/// create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let cleanup_signal = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        cleanup_signal.wait_for_shutdown().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let signal_source = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_source.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // Server errors also need the cleanup task to run.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
