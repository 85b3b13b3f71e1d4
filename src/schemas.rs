use crate::auth::jwt::JwtHandler;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Token issuance and verification
    pub jwt: Arc<JwtHandler>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Registers the bearer scheme the protected paths reference
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
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::update_password,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::stores::get_stores,
        crate::handlers::stores::get_store,
        crate::handlers::stores::create_store,
        crate::handlers::stores::get_store_ratings,
        crate::handlers::ratings::get_ratings,
        crate::handlers::ratings::add_rating,
        crate::handlers::ratings::update_rating,
    ),
    components(
        schemas(
            ApiResponse<crate::handlers::auth::LoginResponse>,
            ApiResponse<Vec<crate::handlers::users::UserResponse>>,
            ApiResponse<Vec<crate::handlers::stores::StoreResponse>>,
            ApiResponse<crate::handlers::ratings::RatingSubmitResponse>,
            ApiResponse<Vec<crate::handlers::ratings::RatingRow>>,
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::auth::UserSummary,
            crate::handlers::auth::UpdatePasswordRequest,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::stores::CreateStoreRequest,
            crate::handlers::stores::StoreResponse,
            crate::handlers::stores::StoreDetailResponse,
            crate::handlers::stores::StoreRatingEntry,
            crate::handlers::ratings::RatingSubmitRequest,
            crate::handlers::ratings::RatingUpdateRequest,
            crate::handlers::ratings::RatingSubmitResponse,
            crate::handlers::ratings::RatingRow,
            model::entities::user::UserRole,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and password management"),
        (name = "users", description = "User administration endpoints"),
        (name = "stores", description = "Store listing and administration endpoints"),
        (name = "ratings", description = "Store rating endpoints"),
    ),
    info(
        title = "Ratewise API",
        description = "Role-based store rating platform - users rate stores, owners review feedback, admins manage both",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
