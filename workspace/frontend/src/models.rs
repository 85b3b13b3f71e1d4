use serde::{Deserialize, Serialize};

/// Store row from the public listing, with its aggregated rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub owner_id: Option<i32>,
    pub overall_rating: f64,
}

/// User row from the admin listing (never carries the password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: String,
}

/// One rating from the admin listing, joined with its user and store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
    pub id: i32,
    pub user_id: i32,
    pub store_id: i32,
    pub rating: i32,
    pub user_name: String,
    pub user_email: String,
    pub store_name: String,
}

/// One rating of a store as seen by its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRating {
    pub name: String,
    pub email: String,
    pub rating: i32,
}

/// Payload of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub role: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Payload of a successful rating submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSubmitted {
    #[serde(rename = "ratingId")]
    pub rating_id: i32,
}
