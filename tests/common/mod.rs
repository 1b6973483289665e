// In-process stand-in for the remote agent service.
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use concierge_client::{config::Config, services::orchestrator::Orchestrator};
use serde_json::{Value, json};
use tokio::sync::Notify;

pub enum Reply {
    Json(Value),
    Status(u16),
    Garbage,
}

#[derive(Clone, Default)]
pub struct FakeAgent {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    pub runs: Arc<Mutex<Vec<Value>>>,
    pub clears: Arc<Mutex<Vec<String>>>,
    health_delay: Arc<Mutex<Duration>>,
    clear_fails: Arc<Mutex<bool>>,
    gate: Option<Arc<Notify>>,
}

impl FakeAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every /agents/run until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn reply(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn reply_json(&self, body: Value) -> &Self {
        self.reply(Reply::Json(body))
    }

    pub fn slow_health(&self, delay: Duration) {
        *self.health_delay.lock().unwrap() = delay;
    }

    pub fn fail_clears(&self) {
        *self.clear_fails.lock().unwrap() = true;
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    /// Serve on an ephemeral port and return the base url.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/health", get(health))
            .route("/agents/run", post(run))
            .route("/agents/clear", post(clear))
            .route("/agents/session/{id}", get(session))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

async fn health(State(agent): State<FakeAgent>) -> Json<Value> {
    let delay = *agent.health_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    Json(json!({ "status": "healthy" }))
}

async fn run(State(agent): State<FakeAgent>, Json(body): Json<Value>) -> Response {
    agent.runs.lock().unwrap().push(body);
    if let Some(gate) = &agent.gate {
        gate.notified().await;
    }
    let reply = agent
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(Reply::Json(json!({ "results": [], "clarifying_questions": [] })));
    match reply {
        Reply::Json(v) => Json(v).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        Reply::Garbage => (StatusCode::OK, "<html>waking up</html>").into_response(),
    }
}

async fn clear(State(agent): State<FakeAgent>, Json(body): Json<Value>) -> Response {
    let session_id = body["session_id"].as_str().unwrap_or_default().to_string();
    agent.clears.lock().unwrap().push(session_id.clone());
    if *agent.clear_fails.lock().unwrap() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({ "success": true, "session_id": session_id })).into_response()
}

async fn session(State(agent): State<FakeAgent>, Path(id): Path<String>) -> Json<Value> {
    let count = agent.run_count();
    Json(json!({ "session_id": id, "message_count": count, "has_history": count > 0 }))
}

pub fn orchestrator(base_url: &str) -> Orchestrator {
    Orchestrator::new(&Config::with_backend(base_url)).unwrap()
}

/// A backend nobody listens on.
pub const DEAD_BACKEND: &str = "http://127.0.0.1:1";

pub async fn wait_until_loading(orc: &Orchestrator) {
    for _ in 0..200 {
        if orc.snapshot().await.loading {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("send never started");
}

pub async fn wait_for_runs(agent: &FakeAgent, count: usize) {
    for _ in 0..200 {
        if agent.run_count() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("agent never saw {count} runs");
}

pub fn avoid_response(keywords: &[&str]) -> Value {
    json!({
        "understood_request": { "constraints": { "avoid_keywords": keywords } },
        "results": [],
        "clarifying_questions": []
    })
}
