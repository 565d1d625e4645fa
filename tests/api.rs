//! HTTP-level tests driving the full router against the in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration as ChronoDuration, Utc};
use http_body_util::BodyExt;
use polls_backend::{app, config::Config, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        jwt_secret: Some("integration-secret".to_string()),
        jwt_expires_in: Duration::from_secs(3600),
        bcrypt_cost: 4,
        ..Config::default()
    }
}

fn router_with(config: Config) -> Router {
    app(AppState::in_memory(config)).expect("router builds")
}

fn router() -> Router {
    router_with(test_config())
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn sign_up(router: &Router, email: &str) -> String {
    let credentials = json!({ "email": email, "password": "correct horse" });

    let (status, _) = send(router, Method::POST, "/api/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(router, Method::POST, "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn live_poll_body() -> Value {
    let now = Utc::now();
    json!({
        "question": "A or B?",
        "options": ["A", "B"],
        "startDate": (now - ChronoDuration::seconds(5)).to_rfc3339(),
        "endDate": (now + ChronoDuration::hours(1)).to_rfc3339(),
    })
}

async fn create_live_poll(router: &Router, token: &str) -> Value {
    let (status, poll) = send(router, Method::POST, "/api/polls", Some(token), Some(live_poll_body())).await;
    assert_eq!(status, StatusCode::CREATED, "{poll}");
    poll
}

#[tokio::test]
async fn health_reports_uptime() {
    let (status, body) = send(&router(), Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_profile() {
    let router = router();
    let credentials = json!({ "email": "u1@example.com", "password": "pw123456" });

    let (status, body) = send(&router, Method::POST, "/api/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["userId"].as_str().unwrap().to_string();

    let (status, body) = send(&router, Method::POST, "/api/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");

    let (status, body) = send(&router, Method::POST, "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (status, body) = send(&router, Method::GET, "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["email"], "u1@example.com");
}

#[tokio::test]
async fn missing_credentials_are_rejected_with_json_errors() {
    let router = router();

    let (status, body) = send(&router, Method::POST, "/api/auth/register", None, Some(json!({ "email": "x@example.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_login_attempts_share_one_shape() {
    let router = router();
    sign_up(&router, "u1@example.com").await;

    let (wrong_status, wrong_body) = send(
        &router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "u1@example.com", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ghost@example.com", "password": "nope" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body["error"], "AUTHENTICATION_ERROR");
    assert_eq!(wrong_body["message"], "Invalid credentials");
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let router = router();

    let (status, body) = send(&router, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTHENTICATION_ERROR");

    let (status, _) = send(&router, Method::GET, "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, Method::POST, "/api/polls", None, Some(live_poll_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_without_signing_key_fails_closed() {
    let router = router_with(Config {
        jwt_secret: None,
        ..test_config()
    });
    let credentials = json!({ "email": "u1@example.com", "password": "pw123456" });

    let (status, _) = send(&router, Method::POST, "/api/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, Method::POST, "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn vote_scenario_from_create_to_results() {
    let router = router();
    let owner = sign_up(&router, "u1@example.com").await;
    let voter = sign_up(&router, "u2@example.com").await;

    let poll = create_live_poll(&router, &owner).await;
    let poll_id = poll["id"].as_str().unwrap();
    let option_a = poll["options"][0]["id"].as_str().unwrap();
    let option_b = poll["options"][1]["id"].as_str().unwrap();

    let vote_uri = format!("/api/polls/{poll_id}/vote");
    let (status, body) = send(&router, Method::POST, &vote_uri, Some(&voter), Some(json!({ "optionId": option_a }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vote cast successfully");

    let (status, body) = send(&router, Method::POST, &vote_uri, Some(&voter), Some(json!({ "optionId": option_b }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");

    let (status, results) = send(&router, Method::GET, &format!("/api/polls/{poll_id}/results"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["active"], true);
    assert_eq!(results["options"][0]["text"], "A");
    assert_eq!(results["options"][0]["votes"], 1);
    assert_eq!(results["options"][1]["text"], "B");
    assert_eq!(results["options"][1]["votes"], 0);

    let (status, mine) = send(&router, Method::GET, &format!("/api/polls/{poll_id}/my-vote"), Some(&voter), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["hasVoted"], true);
    assert_eq!(mine["optionId"], option_a);
}

#[tokio::test]
async fn vote_requires_option_and_known_poll() {
    let router = router();
    let owner = sign_up(&router, "u1@example.com").await;
    let poll = create_live_poll(&router, &owner).await;
    let poll_id = poll["id"].as_str().unwrap();

    let (status, body) = send(&router, Method::POST, &format!("/api/polls/{poll_id}/vote"), Some(&owner), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let missing = "65f000000000000000000000";
    let (status, _) = send(&router, Method::POST, &format!("/api/polls/{missing}/vote"), Some(&owner), Some(json!({ "optionId": missing }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn live_poll_hides_counts_from_anonymous_viewers() {
    let router = router();
    let owner = sign_up(&router, "u1@example.com").await;
    let poll = create_live_poll(&router, &owner).await;
    let uri = format!("/api/polls/{}", poll["id"].as_str().unwrap());

    let (status, anonymous) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(anonymous["options"][0].get("votes").is_none());
    assert_eq!(anonymous["options"][0]["text"], "A");

    let (_, stale_token) = send(&router, Method::GET, &uri, Some("expired.or.bogus"), None).await;
    assert!(stale_token["options"][0].get("votes").is_none());

    let (status, signed_in) = send(&router, Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(signed_in["options"][0]["votes"], 0);
}

#[tokio::test]
async fn listing_filters_by_status() {
    let router = router();
    let owner = sign_up(&router, "u1@example.com").await;
    let live = create_live_poll(&router, &owner).await;

    let now = Utc::now();
    let closed_body = json!({
        "question": "Yesterday?",
        "options": ["yes", "no"],
        "startDate": (now - ChronoDuration::hours(3)).to_rfc3339(),
        "endDate": (now - ChronoDuration::hours(2)).to_rfc3339(),
    });
    let (status, closed) = send(&router, Method::POST, "/api/polls", Some(&owner), Some(closed_body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, active) = send(&router, Method::GET, "/api/polls", None, None).await;
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], live["id"]);

    let (_, finished) = send(&router, Method::GET, "/api/polls?status=closed", None, None).await;
    let finished = finished.as_array().unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0]["id"], closed["id"]);
    assert_eq!(finished[0]["options"][0]["votes"], 0);
}

#[tokio::test]
async fn owner_updates_and_deletes_while_others_are_refused() {
    let router = router();
    let owner = sign_up(&router, "u1@example.com").await;
    let stranger = sign_up(&router, "u2@example.com").await;
    let poll = create_live_poll(&router, &owner).await;
    let uri = format!("/api/polls/{}", poll["id"].as_str().unwrap());

    let patch = json!({ "question": "B or A?" });
    let (status, body) = send(&router, Method::PUT, &uri, Some(&stranger), Some(patch.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "AUTHORIZATION_ERROR");

    let (status, updated) = send(&router, Method::PUT, &uri, Some(&owner), Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["question"], "B or A?");
    assert_eq!(updated["options"], poll["options"]);

    let (status, body) = send(&router, Method::PUT, &uri, Some(&owner), Some(json!({ "options": ["only"] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(&router, Method::DELETE, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&router, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Poll deleted");

    let (status, _) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn security_headers_are_set() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_from_one_user_count_once() {
    let router = router();
    let owner = sign_up(&router, "u1@example.com").await;
    let voter = sign_up(&router, "u2@example.com").await;
    let poll = create_live_poll(&router, &owner).await;
    let poll_id = poll["id"].as_str().unwrap().to_string();
    let option = poll["options"][1]["id"].as_str().unwrap().to_string();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let router = router.clone();
            let voter = voter.clone();
            let uri = format!("/api/polls/{poll_id}/vote");
            let body = json!({ "optionId": option });
            tokio::spawn(async move { send(&router, Method::POST, &uri, Some(&voter), Some(body)).await.0 })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::BAD_REQUEST).count(), 15);

    let (_, results) = send(&router, Method::GET, &format!("/api/polls/{poll_id}/results"), None, None).await;
    assert_eq!(results["options"][1]["votes"], 1);
    assert_eq!(results["options"][0]["votes"], 0);
}

#[tokio::test]
async fn websocket_route_demands_an_upgrade() {
    let (status, _) = send(&router(), Method::GET, "/ws", None, None).await;

    assert_ne!(status, StatusCode::NOT_FOUND);
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn closed_poll_cannot_be_deleted_over_http() {
    let router = router();
    let owner = sign_up(&router, "u1@example.com").await;
    let now = Utc::now();
    let body = json!({
        "question": "Too late?",
        "options": ["Yes", "No"],
        "startDate": (now - ChronoDuration::hours(2)).to_rfc3339(),
        "endDate": (now - ChronoDuration::hours(1)).to_rfc3339(),
    });
    let (status, poll) = send(&router, Method::POST, "/api/polls", Some(&owner), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{poll}");
    let uri = format!("/api/polls/{}", poll["id"].as_str().unwrap());

    let (status, body) = send(&router, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "STATE_ERROR");

    let (status, _) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn optional_identity_fails_closed_without_signing_key() {
    let router = router_with(Config {
        jwt_secret: None,
        ..test_config()
    });
    let uri = format!("/api/polls/{}", mongodb::bson::oid::ObjectId::new().to_hex());

    let (status, body) = send(&router, Method::GET, &uri, Some("some.bearer.token"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "CONFIGURATION_ERROR");

    let (status, _) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
