//! Shared setup for controller tests.

use std::path::PathBuf;

use axum::{body::to_bytes, response::Response};
use roost::server::{
    config::{Config, DEFAULT_INVITATION_TTL_HOURS, DEFAULT_LISTEN_ADDR, DEFAULT_MEDIA_MAX_UPLOAD_BYTES},
    model::{
        app::AppState,
        session::user::{SessionUserId, SESSION_USER_ID_KEY},
    },
    service::media::storage::StorageService,
};
use roost_test_utils::prelude::*;
use serde::de::DeserializeOwned;
use tower_sessions::Session;

/// Configuration accepting tokens signed by the test fixtures
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        auth_jwt_secret: TEST_JWT_SECRET.to_string(),
        auth_jwt_audience: Some(TEST_JWT_AUDIENCE.to_string()),
        bootstrap_admin_email: Some("admin@example.com".to_string()),
        media_storage_path: PathBuf::from("./uploads"),
        media_max_upload_bytes: DEFAULT_MEDIA_MAX_UPLOAD_BYTES,
        invitation_ttl_hours: DEFAULT_INVITATION_TTL_HOURS,
    }
}

/// Extension trait for TestContext to create AppState and log users in
pub trait TestContextExt {
    fn into_app_state(&self) -> AppState;
}

impl TestContextExt for TestContext {
    fn into_app_state(&self) -> AppState {
        AppState::new(self.db.clone(), test_config(), StorageService::in_memory())
    }
}

/// Inserts an active user with `role` and stores their ID in `session`
pub async fn login_as(
    test: &TestContext,
    session: &Session,
    email: &str,
    role: &str,
) -> Result<entity::app_user::Model, TestError> {
    let user = test.user().insert_user(email, role).await?;

    session
        .insert(SESSION_USER_ID_KEY, SessionUserId(user.id.to_string()))
        .await?;

    Ok(user)
}

/// Reads a JSON response body
pub async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    serde_json::from_slice(&bytes).unwrap()
}
