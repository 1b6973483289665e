// src/services/identity.rs
use std::path::Path;

use serde::Serialize;
use tokio::fs;
use uuid::Uuid;

/// Who is talking and which remote conversation the turns belong to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionIdentity {
    pub user_id: String,
    pub session_id: String,
}

impl SessionIdentity {
    // Fresh pair on every start. A stored id is never read back, so the
    // remote side cannot hand us memory from an earlier visit.
    pub fn initialize() -> Self {
        Self {
            user_id: new_user_id(),
            session_id: new_session_id(),
        }
    }

    /// Replace the session id, keeping the user. Returns the retired id.
    pub fn rotate(&mut self) -> String {
        std::mem::replace(&mut self.session_id, new_session_id())
    }

    /// Replace both ids. Returns the retired session id.
    pub fn reset(&mut self) -> String {
        self.user_id = new_user_id();
        self.rotate()
    }
}

pub fn new_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

pub fn new_user_id() -> String {
    format!("guest_{}", Uuid::new_v4().simple())
}

// Best-effort: overwrite the file with the current user id. Never fails the caller.
pub async fn remember_user_id(path: &Path, user_id: &str) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(parent).await {
            tracing::warn!(path = %path.display(), error = %err, "could not create user id directory");
            return;
        }
    }
    match fs::write(path, user_id).await {
        Ok(()) => tracing::debug!(path = %path.display(), "stored user id"),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "could not store user id"),
    }
}
