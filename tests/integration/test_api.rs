//! HTTP surface tests driven through the router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use krishi::config::{AuthConfig, ServerConfig};
use krishi::{
    AiError, AnswerProvider, ApiState, Authenticator, MemoryStorage, Result, create_router,
};

struct StubProvider {
    answer: &'static str,
}

#[async_trait]
impl AnswerProvider for StubProvider {
    async fn answer(&self, _system_prompt: &str, _question: &str) -> Result<String> {
        Ok(self.answer.to_string())
    }
}

struct FailingProvider;

#[async_trait]
impl AnswerProvider for FailingProvider {
    async fn answer(&self, _system_prompt: &str, _question: &str) -> Result<String> {
        Err(AiError::Api(502, "upstream error".to_string()).into())
    }
}

fn build_app(provider: Arc<dyn AnswerProvider>) -> Router {
    let storage = Arc::new(MemoryStorage::new());
    let authenticator = Arc::new(Authenticator::new(AuthConfig::default()));
    let state = Arc::new(ApiState::new(storage, provider, authenticator, 4));
    create_router(state, &ServerConfig::default())
}

fn stub_app(answer: &'static str) -> Router {
    build_app(Arc::new(StubProvider { answer }))
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Register a user and return the session token.
async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({
                "username": username,
                "password": "secret123",
                "name": "Test Farmer",
                "preferredLanguage": "english"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = stub_app("ok");
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_advisories_are_public_and_seeded() {
    let app = stub_app("ok");

    let (status, body) = send(&app, get("/api/advisories", None)).await;
    assert_eq!(status, StatusCode::OK);
    let advisories = body.as_array().unwrap();
    assert_eq!(advisories.len(), 3);
    assert!(advisories[0].get("titleMalayalam").is_some());

    let id = advisories[0]["id"].as_str().unwrap();
    let (status, single) = send(&app, get(&format!("/api/advisories/{}", id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["id"], advisories[0]["id"]);

    let (status, body) = send(&app, get("/api/advisories/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let app = stub_app("ok");

    let (status, _) = send(&app, get("/api/queries", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/api/user", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Invalid credentials are rejected at the middleware.
    let (status, _) = send(&app, get("/api/queries", Some("bogus-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_round_trip() {
    let app = stub_app("ok");

    let token = register(&app, "raman").await;

    // The token is accepted by protected routes.
    let (status, profile) = send(&app, get("/api/user", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "raman");
    assert!(profile.get("password").is_none());

    // Duplicate registration is rejected.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({"username": "raman", "password": "x", "name": "Other"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "username_taken");

    // Wrong password is rejected.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({"username": "raman", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Correct password logs in.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({"username": "raman", "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    // Missing fields are a validation error.
    let (status, _) = send(
        &app,
        json_request("POST", "/api/register", None, json!({"username": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = stub_app("ok");
    let token = register(&app, "raman").await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/logout", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, get("/api/user", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ai_query_happy_path() {
    let app = stub_app("Yellowing often indicates nitrogen deficiency.");
    let token = register(&app, "raman").await;

    let (status, record) = send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&token),
            json!({"question": "My rice leaves are turning yellow", "type": "text"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["language"], "english");
    assert_eq!(record["category"], "general");
    assert_eq!(record["type"], "text");
    assert_eq!(
        record["answer"],
        "Yellowing often indicates nitrogen deficiency."
    );

    // The record shows up in the caller's history.
    let (status, history) = send(&app, get("/api/queries", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ai_query_pest_categorization() {
    let app = stub_app("Use neem oil.");
    let token = register(&app, "raman").await;

    let (status, record) = send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&token),
            json!({"question": "My rice leaves are turning yellow, maybe a pest", "type": "text"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["category"], "pest-disease");
}

#[tokio::test]
async fn test_ai_query_validation() {
    let app = stub_app("ok");
    let token = register(&app, "raman").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&token),
            json!({"type": "text"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Question and type are required");

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&token),
            json!({"question": "no modality"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ai_gateway_failure_maps_to_500() {
    let app = build_app(Arc::new(FailingProvider));
    let token = register(&app, "raman").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&token),
            json!({"question": "anything", "type": "text"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to get AI response");

    // Nothing was persisted.
    let (_, history) = send(&app, get("/api/queries", Some(&token))).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_raw_query_creation() {
    let app = stub_app("ok");
    let token = register(&app, "raman").await;

    let (status, record) = send(
        &app,
        json_request(
            "POST",
            "/api/queries",
            Some(&token),
            json!({"question": "noted offline", "type": "voice", "language": "malayalam"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["language"], "malayalam");
    assert!(record["answer"].is_null());

    // Language is required for raw records.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/queries",
            Some(&token),
            json!({"question": "q", "type": "text"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rating_is_owner_only_and_idempotent() {
    let app = stub_app("ok");
    let raman = register(&app, "raman").await;
    let leela = register(&app, "leela").await;

    let (_, record) = send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&raman),
            json!({"question": "q", "type": "text"}),
        ),
    )
    .await;
    let query_id = record["id"].as_str().unwrap().to_string();

    // A non-owner sees 404, not the record.
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/queries/{}", query_id),
            Some(&leela),
            json!({"rating": "helpful"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner rates, then re-rates; the second value wins.
    let (status, rated) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/queries/{}", query_id),
            Some(&raman),
            json!({"rating": "helpful"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rated["rating"], "helpful");

    let (_, rerated) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/queries/{}", query_id),
            Some(&raman),
            json!({"rating": "not-helpful"}),
        ),
    )
    .await;
    assert_eq!(rerated["rating"], "not-helpful");

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/api/queries/missing",
            Some(&raman),
            json!({"rating": "helpful"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_query_history_is_private_and_ordered() {
    let app = stub_app("ok");
    let raman = register(&app, "raman").await;
    let leela = register(&app, "leela").await;

    for question in ["first", "second"] {
        send(
            &app,
            json_request(
                "POST",
                "/api/queries/ai",
                Some(&raman),
                json!({"question": question, "type": "text"}),
            ),
        )
        .await;
        tokio::time::sleep(std::time::Duration::from_millis(3)).await;
    }
    send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&leela),
            json!({"question": "other farmer", "type": "text"}),
        ),
    )
    .await;

    let (_, history) = send(&app, get("/api/queries", Some(&raman))).await;
    let history = history.as_array().unwrap().clone();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["question"], "second");
    assert_eq!(history[1]["question"], "first");
}

#[tokio::test]
async fn test_profile_update_is_whitelisted() {
    let app = stub_app("ok");
    let token = register(&app, "raman").await;

    let (status, profile) = send(
        &app,
        json_request(
            "PATCH",
            "/api/user/profile",
            Some(&token),
            json!({
                "location": "Kochi",
                "crops": "rice, banana",
                "preferredLanguage": "malayalam",
                "username": "not-allowed",
                "id": "not-allowed"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["location"], "Kochi");
    assert_eq!(profile["crops"], "rice, banana");
    assert_eq!(profile["preferredLanguage"], "malayalam");
    // Non-whitelisted fields are ignored and the credential never leaks.
    assert_eq!(profile["username"], "raman");
    assert!(profile.get("password").is_none());
}

#[tokio::test]
async fn test_profile_context_feeds_the_next_ai_query() {
    let app = stub_app("ok");
    let token = register(&app, "raman").await;

    send(
        &app,
        json_request(
            "PATCH",
            "/api/user/profile",
            Some(&token),
            json!({"location": "Wayanad", "crops": "coffee"}),
        ),
    )
    .await;

    // The next query succeeds with the enriched profile in place.
    let (status, record) = send(
        &app,
        json_request(
            "POST",
            "/api/queries/ai",
            Some(&token),
            json!({"question": "pruning schedule", "type": "text"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, me) = send(&app, get("/api/user", Some(&token))).await;
    assert_eq!(record["userId"], me["id"]);
}
