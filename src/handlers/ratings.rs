use crate::auth::jwt::Claims;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use model::entities::{rating, store, user};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: String) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message,
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

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

fn rating_out_of_range() -> HandlerError {
    validation_error("Rating must be between 1 and 5".to_string())
}

/// Request body for submitting a rating
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RatingSubmitRequest {
    pub store_id: i32,
    /// Star value, 1-5
    pub rating: i32,
}

/// Request body for updating an existing rating by id
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RatingUpdateRequest {
    /// Star value, 1-5
    pub rating: i32,
}

/// Response carrying the id of the upserted rating row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RatingSubmitResponse {
    #[serde(rename = "ratingId")]
    pub rating_id: i32,
}

/// One rating joined with user and store identities (admin listing)
#[derive(Debug, Serialize, Deserialize, ToSchema, FromQueryResult)]
pub struct RatingRow {
    pub id: i32,
    pub user_id: i32,
    pub store_id: i32,
    pub rating: i32,
    pub user_name: String,
    pub user_email: String,
    pub store_name: String,
}

/// Submit a rating for a store. One rating per user per store: a second
/// submission for the same store overwrites the first in place.
#[utoipa::path(
    post,
    path = "/api/ratings",
    tag = "ratings",
    request_body = RatingSubmitRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Rating submitted successfully", body = ApiResponse<RatingSubmitResponse>),
        (status = 400, description = "Missing store_id or rating out of range", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(payload))]
pub async fn add_rating(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<ApiResponse<RatingSubmitResponse>>), HandlerError> {
    trace!("Entering add_rating function for user {}", claims.id);

    // Field checks are done by hand here so that a missing or mistyped
    // store_id comes back as a 400 validation failure, not a rejected body.
    let store_id = match payload
        .get("store_id")
        .and_then(serde_json::Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
    {
        Some(id) => id,
        None => {
            warn!("Rating submission by user {} without a valid store_id", claims.id);
            return Err(validation_error("Valid store_id is required".to_string()));
        }
    };

    let rating_value = payload
        .get("rating")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(0);
    if !(1..=5).contains(&rating_value) {
        warn!(
            "Rating {} out of range for user {}",
            rating_value, claims.id
        );
        return Err(rating_out_of_range());
    }
    let rating_value = rating_value as i32;

    debug!(
        "User {} rating store {} with {}",
        claims.id, store_id, rating_value
    );

    // Insert, or overwrite the existing row for this (user, store) pair.
    // The unique index on the pair is what makes concurrent submissions
    // converge to a single row with the last write winning.
    let upsert = rating::Entity::insert(rating::ActiveModel {
        user_id: Set(claims.id),
        store_id: Set(store_id),
        rating: Set(rating_value),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([rating::Column::UserId, rating::Column::StoreId])
            .update_column(rating::Column::Rating)
            .to_owned(),
    )
    .exec(&state.db)
    .await;

    if let Err(db_error) = upsert {
        error!(
            "Failed to upsert rating for user {} store {}: {}",
            claims.id, store_id, db_error
        );
        return Err(internal_error(db_error.to_string()));
    }

    // Fetch the actual rating id; it is stable across resubmissions.
    let row = rating::Entity::find()
        .filter(rating::Column::UserId.eq(claims.id))
        .filter(rating::Column::StoreId.eq(store_id))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to read back rating id: {}", db_error);
            internal_error(db_error.to_string())
        })?;

    match row {
        Some(rating_model) => {
            info!(
                "Rating {} saved for user {} store {}",
                rating_model.id, claims.id, store_id
            );
            let response = ApiResponse {
                data: RatingSubmitResponse {
                    rating_id: rating_model.id,
                },
                message: "Rating submitted successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        None => {
            error!(
                "Rating row missing after upsert for user {} store {}",
                claims.id, store_id
            );
            Err(internal_error(
                "Rating saved, but could not retrieve ID".to_string(),
            ))
        }
    }
}

/// Update an existing rating by id. Only the rating's author may update it;
/// a foreign or nonexistent id yields the same not-found response.
#[utoipa::path(
    put,
    path = "/api/ratings/{rating_id}",
    tag = "ratings",
    params(
        ("rating_id" = i32, Path, description = "Rating ID"),
    ),
    request_body = RatingUpdateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Rating updated successfully", body = ApiResponse<String>),
        (status = 400, description = "Rating out of range", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Rating not found or not owned by the caller", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn update_rating(
    Path(rating_id): Path<i32>,
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<RatingUpdateRequest>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!(
        "Entering update_rating function for rating {} by user {}",
        rating_id,
        claims.id
    );

    if !(1..=5).contains(&request.rating) {
        warn!(
            "Rating {} out of range for user {}",
            request.rating, claims.id
        );
        return Err(rating_out_of_range());
    }

    let result = rating::Entity::update_many()
        .col_expr(rating::Column::Rating, Expr::value(request.rating))
        .filter(rating::Column::Id.eq(rating_id))
        .filter(rating::Column::UserId.eq(claims.id))
        .exec(&state.db)
        .await;

    match result {
        Ok(update_result) => {
            if update_result.rows_affected == 0 {
                warn!(
                    "Rating {} not found or not owned by user {}",
                    rating_id, claims.id
                );
                Err((
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        error: "Rating not found or you don't have permission to edit it"
                            .to_string(),
                        code: "RATING_NOT_FOUND".to_string(),
                        success: false,
                    }),
                ))
            } else {
                info!("Rating {} updated by user {}", rating_id, claims.id);
                let response = ApiResponse {
                    data: format!("Rating {} updated", rating_id),
                    message: "Rating updated successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            }
        }
        Err(db_error) => {
            error!("Failed to update rating {}: {}", rating_id, db_error);
            Err(internal_error(db_error.to_string()))
        }
    }
}

/// Get all ratings with user and store identities, newest first (admin only)
#[utoipa::path(
    get,
    path = "/api/ratings",
    tag = "ratings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ratings retrieved successfully", body = ApiResponse<Vec<RatingRow>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_ratings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RatingRow>>>, HandlerError> {
    trace!("Entering get_ratings function");
    debug!("Fetching all ratings with user and store identities");

    let query = rating::Entity::find()
        .select_only()
        .column(rating::Column::Id)
        .column(rating::Column::UserId)
        .column(rating::Column::StoreId)
        .column(rating::Column::Rating)
        .column_as(user::Column::Name, "user_name")
        .column_as(user::Column::Email, "user_email")
        .column_as(store::Column::Name, "store_name")
        .join(JoinType::InnerJoin, rating::Relation::User.def())
        .join(JoinType::InnerJoin, rating::Relation::Store.def())
        .order_by_desc(rating::Column::Id)
        .into_model::<RatingRow>();

    match query.all(&state.db).await {
        Ok(rows) => {
            info!("Successfully retrieved {} ratings", rows.len());
            let response = ApiResponse {
                data: rows,
                message: "Ratings retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve ratings: {}", db_error);
            Err(internal_error(db_error.to_string()))
        }
    }
}
