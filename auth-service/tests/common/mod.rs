#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth_service::domain::token::service::TokenService;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserStore;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-p@ss";

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryUserStore>,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp.
    ///
    /// The store is seeded with one administrator.
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let password_hasher = PasswordHasher::with_cost(PasswordHasher::MIN_COST);
        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET, Duration::hours(24))
                .with_password_hasher(password_hasher),
        );

        let store = Arc::new(InMemoryUserStore::new());
        let user_service = UserService::new(Arc::clone(&store), password_hasher);
        user_service
            .ensure_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("Failed to seed administrator");
        let token_service = TokenService::new(Arc::clone(&store), Arc::clone(&authenticator));

        let router = create_router(
            Arc::new(token_service),
            Arc::new(user_service),
            Arc::clone(&authenticator),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.delete(path).bearer_auth(token)
    }

    /// Request a token and return the raw response.
    pub async fn request_token(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/tokens")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Request a token, asserting success.
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.request_token(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Token missing from response")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.token_for(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Register a member account through the API, asserting success.
    pub async fn register(&self, admin_token: &str, username: &str, password: &str) {
        let response = self
            .post_authenticated("/api/users/0", admin_token)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
    }
}
