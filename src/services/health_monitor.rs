// src/services/health_monitor.rs
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::agent_client::AgentClient;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl HealthStatus {
    /// Badge text shown next to the status dot.
    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Checking => "Connecting...",
            HealthStatus::Online => "AI Ready",
            HealthStatus::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthMonitor {
    client: AgentClient,
    status: Arc<RwLock<HealthStatus>>,
}

impl HealthMonitor {
    pub fn new(client: AgentClient) -> Self {
        Self {
            client,
            status: Arc::new(RwLock::new(HealthStatus::Checking)),
        }
    }

    pub async fn status(&self) -> HealthStatus {
        *self.status.read().await
    }

    // Never errors: anything but a 2xx inside the timeout counts as offline.
    pub async fn check_health(&self) -> HealthStatus {
        *self.status.write().await = HealthStatus::Checking;

        let next = match self.client.health().await {
            Ok(()) => HealthStatus::Online,
            Err(err) => {
                tracing::info!(error = %err, "agent backend offline");
                HealthStatus::Offline
            }
        };

        *self.status.write().await = next;
        tracing::debug!(status = ?next, "health check finished");
        next
    }
}
