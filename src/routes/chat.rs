// src/routes/chat.rs
use axum::{Json, extract::State};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, SessionInfo},
    services::{
        landing::{self, Category},
        orchestrator::{Command, Snapshot},
    },
    state::SharedState,
};

pub async fn state_handler(State(state): State<SharedState>) -> Json<Snapshot> {
    Json(state.orchestrator.snapshot().await)
}

pub async fn categories_handler() -> Json<&'static [Category]> {
    Json(landing::categories())
}

pub async fn command_handler(
    State(state): State<SharedState>,
    Json(command): Json<Command>,
) -> Json<Snapshot> {
    Json(state.orchestrator.dispatch(command).await)
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let outcome = state.orchestrator.send_message(&payload.message).await;
    let snapshot = state.orchestrator.snapshot().await;

    Ok(Json(ChatResponse { outcome, snapshot }))
}

// Diagnostics: what the agent remembers for the current session.
pub async fn session_handler(
    State(state): State<SharedState>,
) -> Result<Json<SessionInfo>, AppError> {
    Ok(Json(state.orchestrator.session_info().await?))
}
