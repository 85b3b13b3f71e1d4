use crate::auth::password::{
    hash_password, password_meets_policy, validate_password_policy, verify_password,
};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json, Extension};
use model::entities::user::{self, UserRole};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::jwt::Claims;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn validation_error(message: String) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message,
            code: "VALIDATION_ERROR".to_string(),
            success: false,
        }),
    )
}

fn internal_error(db_error: &DbErr) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: db_error.to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Full name (20-60 characters)
    #[validate(length(min = 20, max = 60, message = "Name must be 20-60 characters"))]
    pub name: String,
    /// Email address (must be unique)
    pub email: String,
    /// Password (8-16 chars, uppercase and special character required)
    #[validate(custom(function = validate_password_policy))]
    pub password: String,
    /// Postal address (at most 400 characters)
    #[validate(length(max = 400, message = "Address must be at most 400 characters"))]
    pub address: String,
    /// Role for the new account (defaults to `user`)
    pub role: Option<UserRole>,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public projection of a user, safe to return to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Successful login payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token embedding id and role, valid for one day
    pub token: String,
    pub role: UserRole,
    pub user: UserSummary,
}

/// Request body for changing the password of the authenticated user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePasswordRequest {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<i32>),
        (status = 400, description = "Validation failed or email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<i32>>), HandlerError> {
    trace!("Entering register function");
    debug!("Registering user with email: {}", request.email);

    if let Err(validation_errors) = request.validate() {
        warn!("Registration validation failed: {}", validation_errors);
        return Err(validation_error(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&request.password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
                code: "HASHING_ERROR".to_string(),
                success: false,
            }),
        )
    })?;

    let new_user = user::ActiveModel {
        name: Set(request.name.clone()),
        email: Set(request.email.clone()),
        password: Set(hashed_password),
        address: Set(request.address.clone()),
        role: Set(request.role.unwrap_or(UserRole::User)),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User registered successfully with ID: {}, email: {}",
                user_model.id, user_model.email
            );
            let response = ApiResponse {
                data: user_model.id,
                message: "User registered successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to register user '{}': {}", request.email, db_error);

            // A unique-key violation on the email column is a caller error,
            // not a server fault.
            let error_msg = db_error.to_string().to_lowercase();
            if error_msg.contains("unique") || error_msg.contains("duplicate") {
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Email '{}' is already registered", request.email),
                        code: "EMAIL_ALREADY_EXISTS".to_string(),
                        success: false,
                    }),
                ))
            } else {
                Err(internal_error(&db_error))
            }
        }
    }
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, HandlerError> {
    trace!("Entering login function");
    debug!("Login attempt for email: {}", request.email);

    let user_model = match user::Entity::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await
    {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            warn!("Login failed: no user with email {}", request.email);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "User not found".to_string(),
                    code: "USER_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!("Failed to look up user '{}': {}", request.email, db_error);
            return Err(internal_error(&db_error));
        }
    };

    let password_matches =
        verify_password(&request.password, &user_model.password).map_err(|e| {
            error!("Password verification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "HASHING_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    if !password_matches {
        warn!("Login failed: wrong password for user {}", user_model.id);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid credentials".to_string(),
                code: "INVALID_CREDENTIALS".to_string(),
                success: false,
            }),
        ));
    }

    let token = state
        .jwt
        .issue_token(user_model.id, user_model.role)
        .map_err(|e| {
            error!("Token issuance failed for user {}: {}", user_model.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "TOKEN_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    info!("User {} logged in successfully", user_model.id);
    let response = ApiResponse {
        data: LoginResponse {
            token,
            role: user_model.role,
            user: UserSummary {
                id: user_model.id,
                name: user_model.name,
                email: user_model.email,
                role: user_model.role,
            },
        },
        message: "Login successful".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Change the password of the authenticated user
#[utoipa::path(
    put,
    path = "/api/auth/update-password",
    tag = "auth",
    request_body = UpdatePasswordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Password updated successfully", body = ApiResponse<String>),
        (status = 400, description = "Old password incorrect or new password out of policy", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn update_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering update_password function for user {}", claims.id);

    let user_model = match user::Entity::find_by_id(claims.id).one(&state.db).await {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            warn!("Password change for vanished user {}", claims.id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "User not found".to_string(),
                    code: "USER_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!("Failed to look up user {}: {}", claims.id, db_error);
            return Err(internal_error(&db_error));
        }
    };

    let old_matches =
        verify_password(&request.old_password, &user_model.password).map_err(|e| {
            error!("Password verification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "HASHING_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    if !old_matches {
        warn!("Password change rejected for user {}: old password mismatch", claims.id);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Old password incorrect".to_string(),
                code: "INVALID_CREDENTIALS".to_string(),
                success: false,
            }),
        ));
    }

    if !password_meets_policy(&request.new_password) {
        warn!("Password change rejected for user {}: policy violation", claims.id);
        return Err(validation_error(
            "New password does not meet requirements".to_string(),
        ));
    }

    let hashed_password = hash_password(&request.new_password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
                code: "HASHING_ERROR".to_string(),
                success: false,
            }),
        )
    })?;

    let mut user_active: user::ActiveModel = user_model.into();
    user_active.password = Set(hashed_password);

    match user_active.update(&state.db).await {
        Ok(_) => {
            info!("Password updated for user {}", claims.id);
            let response = ApiResponse {
                data: format!("Password updated for user {}", claims.id),
                message: "Password updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update password for user {}: {}", claims.id, db_error);
            Err(internal_error(&db_error))
        }
    }
}
