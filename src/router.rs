use crate::auth::middleware::{authenticate, require_admin, require_store_access};
use crate::handlers::{
    auth::{login, register, update_password},
    health::health_check,
    ratings::{add_rating, get_ratings, update_rating},
    stores::{create_store, get_store, get_store_ratings, get_stores},
    users::{create_user, get_user, get_users},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware.
///
/// Routes are grouped by the access level they require and merged into a
/// single router. Each protected group carries its own `route_layer` stack;
/// `authenticate` is added last so it runs before the role checks.
pub fn create_router(state: AppState) -> Router {
    // Reachable without a token
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/stores", get(get_stores))
        .route("/api/stores/:store_id", get(get_store));

    // Any authenticated user
    let authenticated = Router::new()
        .route("/api/auth/update-password", put(update_password))
        .route("/api/ratings", post(add_rating))
        .route("/api/ratings/:rating_id", put(update_rating))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    // Admin only
    let admin = Router::new()
        .route("/api/users", get(get_users).post(create_user))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/stores", post(create_store))
        .route("/api/ratings", get(get_ratings))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    // Admins and store owners
    let store_access = Router::new()
        .route("/api/stores/:store_id/ratings", get(get_store_ratings))
        .route_layer(middleware::from_fn(require_store_access))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    public
        .merge(authenticated)
        .merge(admin)
        .merge(store_access)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
