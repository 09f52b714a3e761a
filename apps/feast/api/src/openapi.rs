use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Supabase access token"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::me::me, crate::api::me::claims),
    components(
        schemas(axum_helpers::ErrorResponse, crate::api::me::MeResponse),
        responses(
            axum_helpers::errors::responses::UnauthorizedResponse,
            axum_helpers::errors::responses::BadRequestResponse
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Feast Friends API",
        version = "0.1.0",
        description = "Authenticated API for the Feast Friends app"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    tags((name = "auth", description = "Caller identity"))
)]
pub struct ApiDoc;
