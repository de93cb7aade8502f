//! services/api/src/web/rest.rs
//!
//! Contains the small utility endpoints and the master definition for the
//! OpenAPI specification.

use axum::{response::Json, Extension};
use serde::Serialize;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use uuid::Uuid;

use crate::error::ErrorBody;
use crate::web::auth::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::web::middleware::AuthUser;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        me_handler,
        health_handler,
    ),
    components(
        schemas(RegisterRequest, LoginRequest, AuthResponse, UserResponse, ErrorBody, MeResponse, HealthResponse)
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Blog Summary Auth API", description = "Registration, login and bearer-token checks.")
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme referenced by guarded paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

/// Who the bearer token says the caller is.
#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    #[serde(rename = "userId")]
    user_id: Uuid,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/auth/me - Identify the bearer of a valid token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Token is valid", body = MeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me_handler(Extension(caller): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: caller.user_id,
    })
}
