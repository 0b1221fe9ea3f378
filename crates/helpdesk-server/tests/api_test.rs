use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use helpdesk_api::auth::{AppState, AppStateInner};
use helpdesk_db::Database;
use helpdesk_server::build_router;

// -- Test helpers --

fn setup() -> Result<Router> {
    // The auth middleware reads the secret from the environment with the
    // same dev default, so token creation and validation always agree.
    let jwt_secret =
        std::env::var("HELPDESK_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());

    let db = Database::open_in_memory()?;
    let state: AppState = Arc::new(AppStateInner { db, jwt_secret });
    Ok(build_router(state))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn auth_post_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn auth_post(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn auth_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register(router: &Router, name: &str, email: &str, role: &str) -> Result<String> {
    let response = router
        .clone()
        .oneshot(post_json(
            "/auth/register",
            json!({"name": name, "email": email, "password": "pw1", "role": role}),
        ))
        .await?;

    assert_eq!(response.status(), 201);
    let body = body_json(response).await;
    Ok(body["token"].as_str().unwrap().to_string())
}

// -- Tests --

#[tokio::test]
async fn full_ticket_lifecycle() -> Result<()> {
    let router = setup()?;

    let client_token = register(&router, "Alice", "alice@x.com", "Client").await?;
    let support_token = register(&router, "Sam", "sam@x.com", "Support").await?;

    // Client submits a ticket
    let response = router
        .clone()
        .oneshot(auth_post_json(
            "/tickets",
            &client_token,
            json!({"heading": "Printer broken", "description": "Won't turn on", "phone": "555-1234"}),
        ))
        .await?;
    assert_eq!(response.status(), 201);
    let ticket = body_json(response).await;
    let ticket_id = ticket["id"].as_i64().unwrap();
    assert_eq!(ticket["status"], "Open");
    assert_eq!(ticket["closed_at"], Value::Null);
    assert_eq!(ticket["client_name"], "Alice");
    assert_eq!(ticket["client_phone"], "555-1234");

    // Support sees it in the listing
    let response = router
        .clone()
        .oneshot(auth_get("/tickets", &support_token))
        .await?;
    assert_eq!(response.status(), 200);
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["heading"], "Printer broken");

    // Support closes it
    let response = router
        .clone()
        .oneshot(auth_post(
            &format!("/tickets/{ticket_id}/close"),
            &support_token,
        ))
        .await?;
    assert_eq!(response.status(), 200);
    let closed = body_json(response).await;
    assert_eq!(closed["status"], "Closed");
    assert!(closed["closed_at"].is_string());

    // The listing reflects the transition
    let response = router
        .clone()
        .oneshot(auth_get("/tickets", &support_token))
        .await?;
    let listing = body_json(response).await;
    assert_eq!(listing[0]["status"], "Closed");

    Ok(())
}

#[tokio::test]
async fn login_returns_account_and_token() -> Result<()> {
    let router = setup()?;
    register(&router, "Alice", "alice@x.com", "Client").await?;

    let response = router
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({"email": "alice@x.com", "password": "pw1", "role": "Client"}),
        ))
        .await?;
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["account"]["name"], "Alice");
    assert_eq!(body["account"]["role"], "Client");
    assert!(body["token"].is_string());

    Ok(())
}

#[tokio::test]
async fn login_failures_share_one_error() -> Result<()> {
    let router = setup()?;
    register(&router, "Alice", "alice@x.com", "Client").await?;

    let wrong_password = router
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({"email": "alice@x.com", "password": "nope"}),
        ))
        .await?;
    assert_eq!(wrong_password.status(), 401);
    let wrong_password = body_json(wrong_password).await;

    let unknown_email = router
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({"email": "bob@x.com", "password": "pw1"}),
        ))
        .await?;
    assert_eq!(unknown_email.status(), 401);
    let unknown_email = body_json(unknown_email).await;

    // Right credentials, wrong role filter
    let role_mismatch = router
        .clone()
        .oneshot(post_json(
            "/auth/login",
            json!({"email": "alice@x.com", "password": "pw1", "role": "Support"}),
        ))
        .await?;
    assert_eq!(role_mismatch.status(), 401);
    let role_mismatch = body_json(role_mismatch).await;

    // One uniform message: the response never reveals which part failed
    assert_eq!(wrong_password["error"], unknown_email["error"]);
    assert_eq!(wrong_password["error"], role_mismatch["error"]);

    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    let router = setup()?;
    register(&router, "Alice", "alice@x.com", "Client").await?;

    let response = router
        .clone()
        .oneshot(post_json(
            "/auth/register",
            json!({"name": "Other Alice", "email": "alice@x.com", "password": "pw2", "role": "Support"}),
        ))
        .await?;
    assert_eq!(response.status(), 409);

    Ok(())
}

#[tokio::test]
async fn empty_fields_are_rejected() -> Result<()> {
    let router = setup()?;

    let response = router
        .clone()
        .oneshot(post_json(
            "/auth/register",
            json!({"name": "", "email": "a@x.com", "password": "pw", "role": "Client"}),
        ))
        .await?;
    assert_eq!(response.status(), 400);

    let token = register(&router, "Alice", "alice@x.com", "Client").await?;
    let response = router
        .clone()
        .oneshot(auth_post_json(
            "/tickets",
            &token,
            json!({"heading": "", "description": "body", "phone": ""}),
        ))
        .await?;
    assert_eq!(response.status(), 400);

    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() -> Result<()> {
    let router = setup()?;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/tickets")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), 401);

    let response = router
        .clone()
        .oneshot(auth_get("/tickets", "not-a-token"))
        .await?;
    assert_eq!(response.status(), 401);

    Ok(())
}

#[tokio::test]
async fn roles_gate_ticket_routes() -> Result<()> {
    let router = setup()?;
    let client_token = register(&router, "Alice", "alice@x.com", "Client").await?;
    let support_token = register(&router, "Sam", "sam@x.com", "Support").await?;

    // Clients cannot list or close
    let response = router
        .clone()
        .oneshot(auth_get("/tickets", &client_token))
        .await?;
    assert_eq!(response.status(), 403);

    let response = router
        .clone()
        .oneshot(auth_post("/tickets/1/close", &client_token))
        .await?;
    assert_eq!(response.status(), 403);

    // Support cannot submit
    let response = router
        .clone()
        .oneshot(auth_post_json(
            "/tickets",
            &support_token,
            json!({"heading": "h", "description": "d", "phone": ""}),
        ))
        .await?;
    assert_eq!(response.status(), 403);

    Ok(())
}

#[tokio::test]
async fn close_is_idempotent_and_missing_tickets_404() -> Result<()> {
    let router = setup()?;
    let client_token = register(&router, "Alice", "alice@x.com", "Client").await?;
    let support_token = register(&router, "Sam", "sam@x.com", "Support").await?;

    let response = router
        .clone()
        .oneshot(auth_post("/tickets/42/close", &support_token))
        .await?;
    assert_eq!(response.status(), 404);

    let response = router
        .clone()
        .oneshot(auth_post_json(
            "/tickets",
            &client_token,
            json!({"heading": "h", "description": "d", "phone": ""}),
        ))
        .await?;
    let ticket = body_json(response).await;
    let ticket_id = ticket["id"].as_i64().unwrap();

    let first = router
        .clone()
        .oneshot(auth_post(
            &format!("/tickets/{ticket_id}/close"),
            &support_token,
        ))
        .await?;
    assert_eq!(first.status(), 200);
    let first = body_json(first).await;

    let second = router
        .clone()
        .oneshot(auth_post(
            &format!("/tickets/{ticket_id}/close"),
            &support_token,
        ))
        .await?;
    assert_eq!(second.status(), 200);
    let second = body_json(second).await;

    assert_eq!(first["closed_at"], second["closed_at"]);

    Ok(())
}
