use crate::auth::jwt::Claims;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use model::entities::{rating, store, user, user::UserRole};
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
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

/// Request body for creating a store (admin only)
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateStoreRequest {
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    /// Optional owner; must reference a user with the `store_owner` role
    pub owner_id: Option<i32>,
}

/// Store row as returned by the listing, with its aggregated rating
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub owner_id: Option<i32>,
    /// Mean of all ratings for this store, 0 when none exist
    pub overall_rating: f64,
}

/// Raw row shape produced by the aggregated store listing query
#[derive(Debug, FromQueryResult)]
struct StoreWithRating {
    id: i32,
    name: String,
    email: Option<String>,
    address: String,
    owner_id: Option<i32>,
    overall_rating: Option<f64>,
}

impl From<StoreWithRating> for StoreResponse {
    fn from(row: StoreWithRating) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            address: row.address,
            owner_id: row.owner_id,
            overall_rating: row.overall_rating.unwrap_or(0.0),
        }
    }
}

/// Single store as returned by the detail endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreDetailResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub owner_id: Option<i32>,
}

impl From<store::Model> for StoreDetailResponse {
    fn from(model: store::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            address: model.address,
            owner_id: model.owner_id,
        }
    }
}

/// One rating of a store, with the rating customer's identity
#[derive(Debug, Serialize, Deserialize, ToSchema, FromQueryResult)]
pub struct StoreRatingEntry {
    pub name: String,
    pub email: String,
    pub rating: i32,
}

/// Get all stores with their aggregated overall rating
#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "stores",
    responses(
        (status = 200, description = "Stores retrieved successfully", body = ApiResponse<Vec<StoreResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_stores(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StoreResponse>>>, HandlerError> {
    trace!("Entering get_stores function");
    debug!("Fetching all stores with aggregated ratings");

    let query = store::Entity::find()
        .select_only()
        .column(store::Column::Id)
        .column(store::Column::Name)
        .column(store::Column::Email)
        .column(store::Column::Address)
        .column(store::Column::OwnerId)
        .column_as(
            SimpleExpr::from(Func::avg(Expr::col((rating::Entity, rating::Column::Rating)))),
            "overall_rating",
        )
        .join(JoinType::LeftJoin, store::Relation::Rating.def())
        .group_by(store::Column::Id)
        .group_by(store::Column::Name)
        .group_by(store::Column::Email)
        .group_by(store::Column::Address)
        .group_by(store::Column::OwnerId)
        .into_model::<StoreWithRating>();

    match query.all(&state.db).await {
        Ok(rows) => {
            let store_count = rows.len();
            debug!("Retrieved {} stores from database", store_count);

            let stores: Vec<StoreResponse> = rows.into_iter().map(StoreResponse::from).collect();

            info!("Successfully retrieved {} stores", store_count);
            let response = ApiResponse {
                data: stores,
                message: "Stores retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve stores from database: {}", db_error);
            Err(internal_error(db_error.to_string()))
        }
    }
}

/// Get a specific store by ID
#[utoipa::path(
    get,
    path = "/api/stores/{store_id}",
    tag = "stores",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
    ),
    responses(
        (status = 200, description = "Store retrieved successfully", body = ApiResponse<StoreDetailResponse>),
        (status = 404, description = "Store not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_store(
    Path(store_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StoreDetailResponse>>, HandlerError> {
    trace!("Entering get_store function for store_id: {}", store_id);

    match store::Entity::find_by_id(store_id).one(&state.db).await {
        Ok(Some(store_model)) => {
            info!(
                "Successfully retrieved store with ID: {}, name: {}",
                store_model.id, store_model.name
            );
            let response = ApiResponse {
                data: StoreDetailResponse::from(store_model),
                message: "Store retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Store with ID {} not found", store_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Store not found".to_string(),
                    code: "STORE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to retrieve store with ID {}: {}", store_id, db_error);
            Err(internal_error(db_error.to_string()))
        }
    }
}

/// Create a new store, optionally assigning an owner (admin only)
#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "stores",
    request_body = CreateStoreRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Store created successfully", body = ApiResponse<StoreDetailResponse>),
        (status = 400, description = "Missing fields or invalid owner", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn create_store(
    State(state): State<AppState>,
    Json(request): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StoreDetailResponse>>), HandlerError> {
    trace!("Entering create_store function");
    debug!("Creating store with name: {}", request.name);

    if request.name.trim().is_empty() || request.address.trim().is_empty() {
        warn!("Store creation rejected: missing name or address");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Name and address are required".to_string(),
                code: "VALIDATION_ERROR".to_string(),
                success: false,
            }),
        ));
    }

    // If an owner is requested, it must reference an existing user holding
    // the store_owner role.
    let owner_id_to_insert = match request.owner_id {
        Some(owner_id) => {
            trace!("Validating requested owner {}", owner_id);
            match user::Entity::find_by_id(owner_id).one(&state.db).await {
                Ok(Some(owner)) => match owner.role {
                    UserRole::StoreOwner => Some(owner.id),
                    UserRole::Admin | UserRole::User => {
                        warn!(
                            "Store creation rejected: user {} has role {}, not store_owner",
                            owner_id,
                            owner.role.as_str()
                        );
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: "User must have 'store_owner' role".to_string(),
                                code: "VALIDATION_ERROR".to_string(),
                                success: false,
                            }),
                        ));
                    }
                },
                Ok(None) => {
                    warn!("Store creation rejected: owner {} not found", owner_id);
                    return Err((
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse {
                            error: "User not found".to_string(),
                            code: "VALIDATION_ERROR".to_string(),
                            success: false,
                        }),
                    ));
                }
                Err(db_error) => {
                    error!("Failed to look up owner {}: {}", owner_id, db_error);
                    return Err(internal_error(db_error.to_string()));
                }
            }
        }
        None => None,
    };

    let new_store = store::ActiveModel {
        name: Set(request.name.clone()),
        email: Set(request.email.clone()),
        address: Set(request.address.clone()),
        owner_id: Set(owner_id_to_insert),
        ..Default::default()
    };

    trace!("Attempting to insert new store into database");
    match new_store.insert(&state.db).await {
        Ok(store_model) => {
            info!(
                "Store created successfully with ID: {}, name: {}",
                store_model.id, store_model.name
            );
            let response = ApiResponse {
                data: StoreDetailResponse::from(store_model),
                message: "Store created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create store '{}': {}", request.name, db_error);
            Err(internal_error(db_error.to_string()))
        }
    }
}

/// Get all ratings for a store. Admins may view any store; a store owner
/// only the stores they own.
#[utoipa::path(
    get,
    path = "/api/stores/{store_id}/ratings",
    tag = "stores",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ratings retrieved successfully", body = ApiResponse<Vec<StoreRatingEntry>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner of this store", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_store_ratings(
    Path(store_id): Path<i32>,
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<StoreRatingEntry>>>, HandlerError> {
    trace!(
        "Entering get_store_ratings for store {} by user {} ({})",
        store_id,
        claims.id,
        claims.role.as_str()
    );

    match claims.role {
        // Admins may view ratings for any store.
        UserRole::Admin => {}
        // A store owner must own this particular store.
        UserRole::StoreOwner => {
            let owned = store::Entity::find_by_id(store_id)
                .filter(store::Column::OwnerId.eq(claims.id))
                .one(&state.db)
                .await
                .map_err(|db_error| {
                    error!("Failed to check store ownership: {}", db_error);
                    internal_error(db_error.to_string())
                })?;

            if owned.is_none() {
                warn!(
                    "User {} denied ratings access for store {}",
                    claims.id, store_id
                );
                return Err((
                    StatusCode::FORBIDDEN,
                    Json(ErrorResponse {
                        error: "Access denied: You do not own this store or it does not exist"
                            .to_string(),
                        code: "FORBIDDEN".to_string(),
                        success: false,
                    }),
                ));
            }
        }
        // Plain users are excluded at the route layer already.
        UserRole::User => {
            return Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Access denied: Store owners only".to_string(),
                    code: "FORBIDDEN".to_string(),
                    success: false,
                }),
            ));
        }
    }

    let query = rating::Entity::find()
        .select_only()
        .column_as(user::Column::Name, "name")
        .column_as(user::Column::Email, "email")
        .column(rating::Column::Rating)
        .join(JoinType::InnerJoin, rating::Relation::User.def())
        .filter(rating::Column::StoreId.eq(store_id))
        .order_by_asc(rating::Column::Id)
        .into_model::<StoreRatingEntry>();

    match query.all(&state.db).await {
        Ok(ratings) => {
            info!(
                "Retrieved {} ratings for store {} (requested by user {})",
                ratings.len(),
                store_id,
                claims.id
            );
            let response = ApiResponse {
                data: ratings,
                message: "Ratings retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to fetch ratings for store {}: {}", store_id, db_error);
            Err(internal_error(db_error.to_string()))
        }
    }
}
