#[cfg(test)]
mod integration_tests {
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{
        login_token, setup_test_app, ADMIN_EMAIL, ADMIN_PASSWORD, ORPHAN_STORE_ID, OWNED_STORE_ID,
        OWNER_EMAIL, OWNER_PASSWORD, USER_EMAIL, USER_PASSWORD,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    const VALID_NAME: &str = "Jonathan Maximilian Stone";
    const VALID_PASSWORD: &str = "Abcdef1!";

    fn register_body(name: &str, email: &str, password: &str) -> Value {
        json!({
            "name": name,
            "email": email,
            "password": password,
            "address": "42 Elm Street",
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_init_database_applies_migrations() {
        crate::cli::commands::init_database("sqlite::memory:")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_accepts_name_length_boundaries() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Exactly 20 characters
        let name_20 = "a".repeat(20);
        let response = server
            .post("/api/auth/register")
            .json(&register_body(&name_20, "min@ratewise.test", VALID_PASSWORD))
            .await;
        response.assert_status(StatusCode::CREATED);

        // Exactly 60 characters
        let name_60 = "b".repeat(60);
        let response = server
            .post("/api/auth/register")
            .json(&register_body(&name_60, "max@ratewise.test", VALID_PASSWORD))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_register_rejects_name_out_of_bounds() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // 19 characters, one too short
        let name_19 = "a".repeat(19);
        let response = server
            .post("/api/auth/register")
            .json(&register_body(&name_19, "short@ratewise.test", VALID_PASSWORD))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");

        // 61 characters, one too long
        let name_61 = "b".repeat(61);
        let response = server
            .post("/api/auth/register")
            .json(&register_body(&name_61, "long@ratewise.test", VALID_PASSWORD))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_enforces_password_policy() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Too short (7 chars)
        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "p1@ratewise.test", "Abcde1!"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Too long (17 chars)
        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "p2@ratewise.test", "Abcdefghijklmn1!!"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // No uppercase
        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "p3@ratewise.test", "abcdef1!"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // No special character
        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "p4@ratewise.test", "Abcdefg1"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Boundary lengths 8 and 16 with uppercase and special pass
        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "p5@ratewise.test", "Abcdef1!"))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "p6@ratewise.test", "Abcdefghijklm1!!"))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "dup@ratewise.test", VALID_PASSWORD))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/auth/register")
            .json(&register_body(VALID_NAME, "dup@ratewise.test", VALID_PASSWORD))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "EMAIL_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_login_distinguishes_unknown_user_from_wrong_password() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Unknown email
        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": "nobody@ratewise.test", "password": VALID_PASSWORD}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["code"], "USER_NOT_FOUND");

        // Known email, wrong password
        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": USER_EMAIL, "password": "Wrong999!"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_login_returns_token_role_and_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": OWNER_EMAIL, "password": OWNER_PASSWORD}))
            .await;
        response.assert_status(StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["role"], "store_owner");
        assert_eq!(body["data"]["user"]["email"], OWNER_EMAIL);
        assert!(body["data"]["token"].as_str().unwrap().len() > 0);
        // Passwords never leave the server
        assert!(body["data"]["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/ratings")
            .json(&json!({"store_id": OWNED_STORE_ID, "rating": 3}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["code"], "NO_TOKEN");
    }

    #[tokio::test]
    async fn test_garbage_token_rejected_as_malformed() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/api/users")
            .authorization_bearer("not-a-real-token")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["code"], "TOKEN_MALFORMED");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_other_roles() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;

        let response = server
            .get("/api/users")
            .authorization_bearer(&user_token)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["code"], "FORBIDDEN");

        let response = server
            .get("/api/ratings")
            .authorization_bearer(&user_token)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_lists_users_without_passwords() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin_token = login_token(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        let response = server
            .get("/api/users")
            .authorization_bearer(&admin_token)
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<Value>> = response.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 3);
        for user in &body.data {
            assert!(user.get("password").is_none());
        }
    }

    #[tokio::test]
    async fn test_admin_gets_user_by_id_and_missing_user_404s() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin_token = login_token(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        let response = server
            .get("/api/users/3")
            .authorization_bearer(&admin_token)
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["email"], USER_EMAIL);

        let response = server
            .get("/api/users/99999")
            .authorization_bearer(&admin_token)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_created_user_cannot_login_with_plaintext_password() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin_token = login_token(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        // Admin creation stores the password as given, without hashing
        let response = server
            .post("/api/users")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "name": "Directly Created Person",
                "email": "direct@ratewise.test",
                "address": "9 Admin Way",
                "password": "Direct99!",
                "role": "user",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        // Login verifies against a bcrypt hash, so the stored plaintext
        // never matches
        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": "direct@ratewise.test", "password": "Direct99!"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_listing_defaults_unrated_overall_rating_to_zero() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/stores").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 2);
        for store in &body.data {
            assert_eq!(store["overall_rating"], 0.0);
        }
    }

    #[tokio::test]
    async fn test_get_store_by_id() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get(&format!("/api/stores/{}", OWNED_STORE_ID)).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "Corner Grocery");

        let response = server.get("/api/stores/99999").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_store_requires_admin() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let owner_token = login_token(&server, OWNER_EMAIL, OWNER_PASSWORD).await;

        let response = server
            .post("/api/stores")
            .authorization_bearer(&owner_token)
            .json(&json!({
                "name": "Owner Attempt",
                "address": "5 Denied Road",
            }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_store_validates_owner() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin_token = login_token(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        // Nonexistent owner
        let response = server
            .post("/api/stores")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "name": "Ghost Shop",
                "address": "6 Nowhere Street",
                "owner_id": 99999,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Owner exists but is a regular user (id 3)
        let response = server
            .post("/api/stores")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "name": "Wrong Role Shop",
                "address": "7 Nowhere Street",
                "owner_id": 3,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Valid store owner (id 2)
        let response = server
            .post("/api/stores")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "name": "Second Grocery",
                "address": "8 Market Lane",
                "owner_id": 2,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        // Missing name or address
        let response = server
            .post("/api/stores")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "name": "",
                "address": "",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rating_range_enforced_on_submit_and_update() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;

        for bad_value in [0, 6] {
            let response = server
                .post("/api/ratings")
                .authorization_bearer(&user_token)
                .json(&json!({"store_id": OWNED_STORE_ID, "rating": bad_value}))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["error"], "Rating must be between 1 and 5");
        }

        // 1 and 5 are both accepted
        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"store_id": OWNED_STORE_ID, "rating": 1}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"store_id": ORPHAN_STORE_ID, "rating": 5}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let rating_id = body["data"]["ratingId"].as_i64().unwrap();

        // Out-of-range update on an existing rating
        let response = server
            .put(&format!("/api/ratings/{}", rating_id))
            .authorization_bearer(&user_token)
            .json(&json!({"rating": 0}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rating_submission_requires_valid_store_id() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;

        // Missing store_id is a validation failure, not an unprocessable body
        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"rating": 3}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Valid store_id is required");
        assert_eq!(body["code"], "VALIDATION_ERROR");

        // Same for a store_id of the wrong type
        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"store_id": "first", "rating": 3}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_with_stable_rating_id() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;

        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"store_id": OWNED_STORE_ID, "rating": 4}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let first: Value = response.json();
        let first_id = first["data"]["ratingId"].as_i64().unwrap();

        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"store_id": OWNED_STORE_ID, "rating": 2}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let second: Value = response.json();
        assert_eq!(second["data"]["ratingId"].as_i64().unwrap(), first_id);

        // Only the latest value survives, so the average is exactly 2
        let response = server.get("/api/stores").await;
        let body: ApiResponse<Vec<Value>> = response.json();
        let rated = body
            .data
            .iter()
            .find(|s| s["id"].as_i64() == Some(OWNED_STORE_ID as i64))
            .unwrap();
        assert_eq!(rated["overall_rating"], 2.0);
    }

    #[tokio::test]
    async fn test_rating_update_is_scoped_to_author() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;
        let owner_token = login_token(&server, OWNER_EMAIL, OWNER_PASSWORD).await;

        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"store_id": OWNED_STORE_ID, "rating": 3}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let rating_id = body["data"]["ratingId"].as_i64().unwrap();

        // Another user cannot edit it, and the response does not reveal
        // whether the rating exists
        let response = server
            .put(&format!("/api/ratings/{}", rating_id))
            .authorization_bearer(&owner_token)
            .json(&json!({"rating": 5}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(
            body["error"],
            "Rating not found or you don't have permission to edit it"
        );

        // The author can
        let response = server
            .put(&format!("/api/ratings/{}", rating_id))
            .authorization_bearer(&user_token)
            .json(&json!({"rating": 5}))
            .await;
        response.assert_status(StatusCode::OK);

        // Nonexistent id gets the same 404
        let response = server
            .put("/api/ratings/99999")
            .authorization_bearer(&user_token)
            .json(&json!({"rating": 5}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_ratings_visible_to_owner_and_admin_only() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;
        let owner_token = login_token(&server, OWNER_EMAIL, OWNER_PASSWORD).await;
        let admin_token = login_token(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        let response = server
            .post("/api/ratings")
            .authorization_bearer(&user_token)
            .json(&json!({"store_id": OWNED_STORE_ID, "rating": 4}))
            .await;
        response.assert_status(StatusCode::CREATED);

        // Regular users are turned away at the role gate
        let response = server
            .get(&format!("/api/stores/{}/ratings", OWNED_STORE_ID))
            .authorization_bearer(&user_token)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        // The owner sees rater names, emails and values
        let response = server
            .get(&format!("/api/stores/{}/ratings", OWNED_STORE_ID))
            .authorization_bearer(&owner_token)
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        let ratings = body["data"].as_array().unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0]["email"], USER_EMAIL);
        assert_eq!(ratings[0]["rating"], 4);

        // The owner does not see ratings for a store they do not own
        let response = server
            .get(&format!("/api/stores/{}/ratings", ORPHAN_STORE_ID))
            .authorization_bearer(&owner_token)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        // Admins see any store's ratings
        let response = server
            .get(&format!("/api/stores/{}/ratings", ORPHAN_STORE_ID))
            .authorization_bearer(&admin_token)
            .await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_lists_all_ratings_newest_first() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;
        let admin_token = login_token(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        for (store_id, value) in [(OWNED_STORE_ID, 2), (ORPHAN_STORE_ID, 5)] {
            let response = server
                .post("/api/ratings")
                .authorization_bearer(&user_token)
                .json(&json!({"store_id": store_id, "rating": value}))
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/ratings")
            .authorization_bearer(&admin_token)
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 2);
        // Newest first
        assert_eq!(body.data[0]["store_name"], "Unclaimed Bakery");
        assert_eq!(body.data[0]["rating"], 5);
        assert_eq!(body.data[1]["store_name"], "Corner Grocery");
        assert_eq!(body.data[0]["user_email"], USER_EMAIL);
    }

    #[tokio::test]
    async fn test_password_change_flow() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let user_token = login_token(&server, USER_EMAIL, USER_PASSWORD).await;

        // Wrong current password
        let response = server
            .put("/api/auth/update-password")
            .authorization_bearer(&user_token)
            .json(&json!({"oldPassword": "Wrong999!", "newPassword": "Fresh12!"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Old password incorrect");

        // New password out of policy
        let response = server
            .put("/api/auth/update-password")
            .authorization_bearer(&user_token)
            .json(&json!({"oldPassword": USER_PASSWORD, "newPassword": "weak"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Valid change
        let response = server
            .put("/api/auth/update-password")
            .authorization_bearer(&user_token)
            .json(&json!({"oldPassword": USER_PASSWORD, "newPassword": "Fresh12!"}))
            .await;
        response.assert_status(StatusCode::OK);

        // Old password no longer works, new one does
        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": USER_EMAIL, "password": USER_PASSWORD}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": USER_EMAIL, "password": "Fresh12!"}))
            .await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_login_rate_end_to_end() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&register_body(
                "Margaret Elenora Whitfield",
                "margaret@ratewise.test",
                "Abcdef1!",
            ))
            .await;
        response.assert_status(StatusCode::CREATED);

        let token = login_token(&server, "margaret@ratewise.test", "Abcdef1!").await;

        let response = server
            .post("/api/ratings")
            .authorization_bearer(&token)
            .json(&json!({"store_id": OWNED_STORE_ID, "rating": 4}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server.get("/api/stores").await;
        let body: ApiResponse<Vec<Value>> = response.json();
        let rated = body
            .data
            .iter()
            .find(|s| s["id"].as_i64() == Some(OWNED_STORE_ID as i64))
            .unwrap();
        assert_eq!(rated["overall_rating"], 4.0);
    }
}
