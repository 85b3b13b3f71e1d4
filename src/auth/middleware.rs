use crate::auth::jwt::Claims;
use crate::schemas::{AppState, ErrorResponse};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Json,
    response::Response,
};
use model::entities::user::UserRole;
use tracing::{trace, warn};

type MiddlewareError = (StatusCode, Json<ErrorResponse>);

fn unauthorized(error: &str, code: &str) -> MiddlewareError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
            success: false,
        }),
    )
}

fn forbidden(error: &str) -> MiddlewareError {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponse {
            error: error.to_string(),
            code: "FORBIDDEN".to_string(),
            success: false,
        }),
    )
}

/// Bearer-token middleware. Extracts the `Authorization: Bearer <token>`
/// header, verifies the token and inserts the resulting [`Claims`] into the
/// request extensions. Requests without a valid token never reach a handler.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, MiddlewareError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    let Some(token) = token else {
        warn!("No token provided for {}", req.uri().path());
        return Err(unauthorized("No token provided", "NO_TOKEN"));
    };

    let claims = state.jwt.verify_token(&token).map_err(|err| {
        warn!("Token verification failed: {}", err);
        unauthorized(&err.to_string(), err.code())
    })?;

    trace!("Authenticated user {} ({})", claims.id, claims.role.as_str());
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role gate for admin-only routes. Must run after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, MiddlewareError> {
    let Some(claims) = req.extensions().get::<Claims>() else {
        return Err(unauthorized("No token provided", "NO_TOKEN"));
    };

    match claims.role {
        UserRole::Admin => Ok(next.run(req).await),
        UserRole::StoreOwner | UserRole::User => {
            warn!(
                "Access denied: Admins only. User {} has role {}",
                claims.id,
                claims.role.as_str()
            );
            Err(forbidden("Access denied: Admins only"))
        }
    }
}

/// Role gate for the store-ratings view: admins and store owners pass;
/// ownership of the specific store is checked in the handler.
pub async fn require_store_access(req: Request, next: Next) -> Result<Response, MiddlewareError> {
    let Some(claims) = req.extensions().get::<Claims>() else {
        return Err(unauthorized("No token provided", "NO_TOKEN"));
    };

    match claims.role {
        UserRole::Admin | UserRole::StoreOwner => Ok(next.run(req).await),
        UserRole::User => {
            warn!(
                "Access denied: Store owners only. User {} has role {}",
                claims.id,
                claims.role.as_str()
            );
            Err(forbidden("Access denied: Store owners only"))
        }
    }
}
