//! Requests through the full router, including the session layer.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use roost::server::{router::routes, startup::session_layer};
use roost_test_utils::prelude::*;
use tower::ServiceExt;

use crate::util::{json_body, TestContextExt};

fn app(test: &TestContext) -> Router {
    routes(1024 * 1024)
        .with_state(test.into_app_state())
        .layer(session_layer())
}

/// Expect the OpenAPI document to list the checkout and media endpoints
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let response = app(&test)
        .oneshot(
            Request::builder()
                .uri("/api/docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let document: serde_json::Value = json_body(response).await;
    assert!(document["paths"]["/api/checkout/submit"].is_object());
    assert!(document["paths"]["/api/media/{id}/file"].is_object());
    assert!(document["paths"]["/api/properties/{id}"]["delete"].is_object());

    Ok(())
}

/// Expect 401 for protected routes without a session cookie
#[tokio::test]
async fn rejects_request_without_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let response = app(&test)
        .oneshot(
            Request::builder()
                .uri("/api/bookings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect the cookie set by logging in to authenticate later requests
#[tokio::test]
async fn logs_in_with_session_cookie() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    test.user().insert_user("staff@example.com", "staff").await?;
    let token = access_token(&subject_for("staff@example.com"), "staff@example.com")?;
    let app = app(&test);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "access_token": token }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/user")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
