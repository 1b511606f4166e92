//! OpenAPI documentation configuration

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calendar API",
        version = "0.1.0",
        description = "Calendar events with recurring series, backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/auth", api = domain_users::ApiDoc),
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Events", description = "Calendar events and recurring series")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme the event routes reference.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
