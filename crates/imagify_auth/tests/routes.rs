use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use imagify_auth::TokenSigner;
use imagify_db::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let signer = Arc::new(TokenSigner::new(SECRET, 3600));
    imagify_auth::routes(store, signer, 4)
}

async fn send(app: &Router, request: Request<Body>) -> Value {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn register_login_and_read_credits() {
    let app = app();

    let registered = send(
        &app,
        post_json(
            "/user/register",
            json!({"name": "Ada", "email": "ada@example.com", "password": "pw-123"}),
        ),
    )
    .await;
    assert_eq!(registered["success"], true);
    assert_eq!(registered["user"]["name"], "Ada");
    assert!(registered["token"].as_str().is_some_and(|t| !t.is_empty()));

    let logged_in = send(
        &app,
        post_json(
            "/user/login",
            json!({"email": "ada@example.com", "password": "pw-123"}),
        ),
    )
    .await;
    assert_eq!(logged_in["success"], true);
    let token = logged_in["token"].as_str().unwrap().to_string();

    let credits = send(
        &app,
        Request::get("/user/credits")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(credits, json!({"success": true, "credits": 0, "user": {"name": "Ada"}}));

    let legacy = send(
        &app,
        Request::get("/user/credits")
            .header("token", token)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(legacy["success"], true);
}

#[tokio::test]
async fn business_failures_are_http_200() {
    let app = app();
    send(
        &app,
        post_json(
            "/user/register",
            json!({"name": "Ada", "email": "ada@example.com", "password": "pw-123"}),
        ),
    )
    .await;

    let duplicate = send(
        &app,
        post_json(
            "/user/register",
            json!({"name": "Eve", "email": "ada@example.com", "password": "other"}),
        ),
    )
    .await;
    assert_eq!(duplicate, json!({"success": false, "message": "Email already registered"}));

    let wrong = send(
        &app,
        post_json(
            "/user/login",
            json!({"email": "ada@example.com", "password": "nope"}),
        ),
    )
    .await;
    assert_eq!(wrong, json!({"success": false, "message": "Incorrect password"}));

    let unknown = send(
        &app,
        post_json(
            "/user/login",
            json!({"email": "eve@example.com", "password": "nope"}),
        ),
    )
    .await;
    assert_eq!(unknown, json!({"success": false, "message": "User does not exist"}));
}

#[tokio::test]
async fn missing_fields_and_garbage_bodies_are_missing_details() {
    let app = app();

    let partial = send(&app, post_json("/user/register", json!({"name": "Ada"}))).await;
    assert_eq!(partial, json!({"success": false, "message": "Missing Details"}));

    let garbage = send(
        &app,
        Request::post("/user/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(garbage, json!({"success": false, "message": "Missing Details"}));
}

#[tokio::test]
async fn credits_require_a_valid_token() {
    let app = app();
    let expected = json!({"success": false, "message": "Not Authorized. Login Again"});

    let missing = send(
        &app,
        Request::get("/user/credits").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(missing, expected);

    let forged = TokenSigner::new("some-other-secret", 3600).issue("x").unwrap();
    let invalid = send(
        &app,
        Request::get("/user/credits")
            .header(header::AUTHORIZATION, format!("Bearer {}", forged))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(invalid, expected);
}

#[tokio::test]
async fn credits_for_deleted_account_is_not_found() {
    let app = app();
    let token = TokenSigner::new(SECRET, 3600).issue("ghost").unwrap();
    let body = send(
        &app,
        Request::get("/user/credits")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(body, json!({"success": false, "message": "User does not exist"}));
}
