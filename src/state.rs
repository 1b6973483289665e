// src/state.rs
use std::sync::Arc;

use crate::{config::Config, error::AgentError, services::orchestrator::Orchestrator};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        Ok(Self {
            orchestrator: Orchestrator::new(config)?,
        })
    }
}
