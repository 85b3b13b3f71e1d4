#[cfg(test)]
pub mod test_utils {
    use crate::auth::jwt::JwtHandler;
    use crate::auth::password::hash_password;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use model::entities::{
        store,
        user::{self, UserRole},
    };
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const ADMIN_EMAIL: &str = "admin@ratewise.test";
    pub const ADMIN_PASSWORD: &str = "Admin123!";
    pub const OWNER_EMAIL: &str = "owner@ratewise.test";
    pub const OWNER_PASSWORD: &str = "Owner123!";
    pub const USER_EMAIL: &str = "user@ratewise.test";
    pub const USER_PASSWORD: &str = "User123!";

    /// Seeded store owned by the seeded store owner
    pub const OWNED_STORE_ID: i32 = 1;
    /// Seeded store with no owner and no ratings
    pub const ORPHAN_STORE_ID: i32 = 2;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing, seeded with one account per role and
    /// two stores. Insertion order fixes the ids: admin=1, owner=2, user=3.
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        let seed_users = [
            ("Platform Administrator", ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin),
            ("Seeded Store Owner", OWNER_EMAIL, OWNER_PASSWORD, UserRole::StoreOwner),
            ("Seeded Regular User", USER_EMAIL, USER_PASSWORD, UserRole::User),
        ];

        for (name, email, password, role) in seed_users {
            let hashed = hash_password(password).expect("Failed to hash seed password");
            let seed = user::ActiveModel {
                name: Set(name.to_string()),
                email: Set(email.to_string()),
                password: Set(hashed),
                address: Set("1 Test Street".to_string()),
                role: Set(role),
                ..Default::default()
            };
            seed.insert(&db).await.expect("Failed to create seed user");
        }

        let owned_store = store::ActiveModel {
            name: Set("Corner Grocery".to_string()),
            email: Set(Some("grocery@ratewise.test".to_string())),
            address: Set("2 Market Lane".to_string()),
            owner_id: Set(Some(2)),
            ..Default::default()
        };
        owned_store
            .insert(&db)
            .await
            .expect("Failed to create seed store");

        let orphan_store = store::ActiveModel {
            name: Set("Unclaimed Bakery".to_string()),
            email: Set(None),
            address: Set("3 Flour Road".to_string()),
            owner_id: Set(None),
            ..Default::default()
        };
        orphan_store
            .insert(&db)
            .await
            .expect("Failed to create seed store");

        let jwt = Arc::new(JwtHandler::new("test-secret".to_string()));

        AppState { db, jwt }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        // Initialize tracing for tests
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let router = create_router(state);
        router
    }

    /// Log in through the API and return the bearer token
    pub async fn login_token(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .await;

        assert_eq!(
            response.status_code(),
            axum::http::StatusCode::OK,
            "Login failed for {}: {}",
            email,
            response.text()
        );

        let body: serde_json::Value = response.json();
        body["data"]["token"]
            .as_str()
            .expect("Login response missing token")
            .to_string()
    }
}
