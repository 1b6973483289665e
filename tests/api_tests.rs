mod common;

use concierge_client::config::Config;
use concierge_client::message::ChatResponse;
use concierge_client::routes::create_router;
use concierge_client::services::orchestrator::{Page, SendOutcome, Snapshot};
use concierge_client::state::AppState;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{DEAD_BACKEND, FakeAgent};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(base_url: &str) -> Router {
    let state = Arc::new(AppState::new(&Config::with_backend(base_url)).unwrap());
    create_router("public").with_state(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app(DEAD_BACKEND).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_initial_state() {
    let response = app(DEAD_BACKEND).oneshot(get("/state")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let snap: Snapshot = body_json(response).await;
    assert_eq!(snap.page, Page::Landing);
    assert!(snap.messages.is_empty());
    assert!(!snap.loading);
    assert!(snap.session_id.starts_with("session_"));
}

#[tokio::test]
async fn test_categories_endpoint() {
    let response = app(DEAD_BACKEND).oneshot(get("/categories")).await.unwrap();
    let cats: Vec<serde_json::Value> = body_json(response).await;
    let ids: Vec<_> = cats.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["sneakers", "tshirts", "accessories"]);
}

#[tokio::test]
async fn test_chat_endpoint() {
    let agent = FakeAgent::new();
    agent.reply_json(json!({ "results": [{ "title": "A" }, { "title": "B" }] }));
    let app = app(&agent.spawn().await);

    let response = app
        .oneshot(post_json("/chat", json!({ "message": "white sneakers" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let chat: ChatResponse = body_json(response).await;
    assert_eq!(chat.outcome, SendOutcome::Replied);
    assert_eq!(chat.snapshot.messages.len(), 2);
    assert_eq!(chat.snapshot.messages[1].content, "Found 2 matches for you.");
}

#[tokio::test]
async fn test_empty_chat_is_rejected() {
    let response = app(DEAD_BACKEND)
        .oneshot(post_json("/chat", json!({ "message": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_command_flow() {
    let agent = FakeAgent::new();
    agent.reply_json(json!({
        "understood_request": { "constraints": { "avoid_keywords": ["chunky"] } }
    }));
    let app = app(&agent.spawn().await);

    let response = app
        .clone()
        .oneshot(post_json("/commands", json!({ "type": "select_category", "value": "sneakers" })))
        .await
        .unwrap();
    let snap: Snapshot = body_json(response).await;
    assert_eq!(snap.page, Page::Chat);

    let response = app
        .clone()
        .oneshot(post_json("/commands", json!({ "type": "send", "value": "no chunky please" })))
        .await
        .unwrap();
    let snap: Snapshot = body_json(response).await;
    assert!(snap.avoid_keywords.contains("chunky"));
    let session_before = snap.session_id;

    let response = app
        .clone()
        .oneshot(post_json("/commands", json!({ "type": "remove_avoid_keyword", "value": "chunky" })))
        .await
        .unwrap();
    let snap: Snapshot = body_json(response).await;
    assert!(snap.avoid_keywords.is_empty());

    let response = app
        .oneshot(post_json("/commands", json!({ "type": "clear", "value": "back_to_landing" })))
        .await
        .unwrap();
    let snap: Snapshot = body_json(response).await;
    assert_eq!(snap.page, Page::Landing);
    assert!(snap.messages.is_empty());
    assert_ne!(snap.session_id, session_before);
}

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let response = app(DEAD_BACKEND)
        .oneshot(post_json("/commands", json!({ "type": "self_destruct" })))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_session_endpoint_without_backend() {
    let response = app(DEAD_BACKEND).oneshot(get("/session")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
