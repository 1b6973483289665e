// src/services/agent_client.rs
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::AgentError,
    message::{AgentRequest, AgentResponse, ClearRequest, SessionInfo},
};

/// Thin JSON client for the remote shopping agent.
#[derive(Clone, Debug)]
pub struct AgentClient {
    http: Client,
    base_url: String,
    health_timeout: Duration,
}

impl AgentClient {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AgentError::Build)?;
        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            health_timeout: config.health_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /agents/run
    pub async fn run_agent(&self, request: &AgentRequest) -> Result<AgentResponse, AgentError> {
        let url = self.url("/agents/run");
        tracing::debug!(%url, session_id = %request.session_id, "running agent");
        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| AgentError::Transport { url: url.clone(), source })?;
        decode(url, resp).await
    }

    /// POST /agents/clear. The body of the answer is not interesting, only success.
    pub async fn clear_session(&self, session_id: &str) -> Result<(), AgentError> {
        let url = self.url("/agents/clear");
        let body = ClearRequest {
            session_id: session_id.to_string(),
        };
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| AgentError::Transport { url: url.clone(), source })?;
        ensure_success(url, resp).map(|_| ())
    }

    /// GET /health, bounded by the health timeout.
    pub async fn health(&self) -> Result<(), AgentError> {
        let url = self.url("/health");
        let resp = self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|source| AgentError::Transport { url: url.clone(), source })?;
        ensure_success(url, resp).map(|_| ())
    }

    /// GET /agents/session/{id}
    pub async fn session_info(&self, session_id: &str) -> Result<SessionInfo, AgentError> {
        let url = self.url(&format!("/agents/session/{}", session_id));
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| AgentError::Transport { url: url.clone(), source })?;
        decode(url, resp).await
    }
}

fn ensure_success(url: String, resp: Response) -> Result<Response, AgentError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(AgentError::Status {
            url,
            status: status.as_u16(),
        })
    }
}

async fn decode<T: DeserializeOwned>(url: String, resp: Response) -> Result<T, AgentError> {
    let resp = ensure_success(url.clone(), resp)?;
    resp.json::<T>()
        .await
        .map_err(|source| AgentError::Decode { url, source })
}
