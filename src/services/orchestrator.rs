// src/services/orchestrator.rs
//! Every state change goes through [`Orchestrator`]. Presentation code reads
//! [`Snapshot`]s and sends [`Command`]s, nothing else.

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::AgentError,
    message::{AgentRequest, AgentResponse, Product, SessionInfo},
    services::{
        agent_client::AgentClient,
        constraints::{self, AvoidKeywords, SessionContext},
        conversation::{Conversation, Message},
        health_monitor::{HealthMonitor, HealthStatus},
        identity::{self, SessionIdentity},
        landing,
    },
};

pub const NO_MATCHES: &str = "No products found matching your search. Try a different query.";
pub const CONNECTION_ISSUE: &str =
    "Connection issue. The backend might be starting up - please try again.";
pub const ERROR_PREFIX: &str = "Something went wrong: ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Landing,
    Chat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearMode {
    /// Back button: forget the category too and return to the landing page.
    BackToLanding,
    /// "New Search" from the sidebar: keep category and page.
    NewSearch,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Command {
    SelectCategory(String),
    SetInput(String),
    Send(String),
    SendInput,
    RemoveAvoidKeyword(String),
    Clear(ClearMode),
    CheckHealth,
    ToggleTheme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    /// Blank input, nothing happened.
    Empty,
    /// Another send was still in flight, nothing happened.
    Busy,
    /// The agent answered and a reply was appended.
    Replied,
    /// Transport failure, the connection notice was appended.
    Failed,
    /// The session was cleared while waiting; the answer was dropped.
    Stale,
}

/// Read-only copy of everything the presentation layer draws.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub page: Page,
    pub selected_category: Option<String>,
    pub suggestions: Vec<String>,
    pub theme: Theme,
    pub health: HealthStatus,
    pub health_label: String,
    pub user_id: String,
    pub session_id: String,
    pub messages: Vec<Message>,
    pub input: String,
    pub loading: bool,
    pub session_context: SessionContext,
    pub avoid_keywords: AvoidKeywords,
    pub last_response: Option<AgentResponse>,
}

#[derive(Debug)]
struct UiState {
    page: Page,
    category: Option<String>,
    theme: Theme,
    identity: SessionIdentity,
    conversation: Conversation,
    context: SessionContext,
    avoid: AvoidKeywords,
    last_response: Option<AgentResponse>,
}

impl UiState {
    fn new() -> Self {
        Self {
            page: Page::Landing,
            category: None,
            theme: Theme::default(),
            identity: SessionIdentity::initialize(),
            conversation: Conversation::new(),
            context: SessionContext::default(),
            avoid: AvoidKeywords::new(),
            last_response: None,
        }
    }

    fn reset_conversation(&mut self) {
        self.conversation.clear();
        self.context = SessionContext::default();
        self.avoid.clear();
        self.last_response = None;
    }
}

/// Display text for one agent answer: error first, then the match count,
/// then the fixed no-match line. Clarifying questions never replace it.
pub fn reply_text(response: &AgentResponse) -> String {
    match response.error.as_deref().filter(|e| !e.is_empty()) {
        Some(err) => format!("{ERROR_PREFIX}{err}"),
        None if !response.results.is_empty() => {
            format!("Found {} matches for you.", response.results.len())
        }
        None => NO_MATCHES.to_string(),
    }
}

pub fn reply_message(response: &AgentResponse) -> Message {
    Message::assistant(reply_text(response))
        .with_products(response.results.iter().cloned().map(Product::scored).collect())
        .with_questions(response.clarifying_questions.clone())
        .with_avoided(response.avoid_keywords().to_vec())
}

#[derive(Clone, Debug)]
pub struct Orchestrator {
    client: AgentClient,
    health: HealthMonitor,
    state: Arc<RwLock<UiState>>,
    user_id_file: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let client = AgentClient::new(config)?;
        Ok(Self::with_client(client, config.user_id_file.clone()))
    }

    pub fn with_client(client: AgentClient, user_id_file: Option<PathBuf>) -> Self {
        Self {
            health: HealthMonitor::new(client.clone()),
            client,
            state: Arc::new(RwLock::new(UiState::new())),
            user_id_file,
        }
    }

    pub fn client(&self) -> &AgentClient {
        &self.client
    }

    /// Startup work: store the user id (best effort) and check the backend,
    /// which also wakes a sleeping host.
    pub async fn start(&self) -> HealthStatus {
        if let Some(path) = &self.user_id_file {
            let user_id = self.state.read().await.identity.user_id.clone();
            identity::remember_user_id(path, &user_id).await;
        }
        let status = self.check_health().await;
        tracing::info!(backend = %self.client.base_url(), ?status, "session initialised");
        status
    }

    pub async fn snapshot(&self) -> Snapshot {
        let health = self.health.status().await;
        let state = self.state.read().await;
        Snapshot {
            page: state.page,
            selected_category: state.category.clone(),
            suggestions: landing::suggestions_for(state.category.as_deref())
                .iter()
                .map(|s| s.to_string())
                .collect(),
            theme: state.theme,
            health,
            health_label: health.label().to_string(),
            user_id: state.identity.user_id.clone(),
            session_id: state.identity.session_id.clone(),
            messages: state.conversation.messages().to_vec(),
            input: state.conversation.input().to_string(),
            loading: state.conversation.is_loading(),
            session_context: state.context.clone(),
            avoid_keywords: state.avoid.clone(),
            last_response: state.last_response.clone(),
        }
    }

    /// Single mutation entry point.
    pub async fn dispatch(&self, command: Command) -> Snapshot {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::SelectCategory(id) => self.select_category(&id).await,
            Command::SetInput(text) => self.set_input(text).await,
            Command::Send(text) => {
                self.send_message(&text).await;
            }
            Command::SendInput => {
                self.send_input().await;
            }
            Command::RemoveAvoidKeyword(keyword) => {
                self.remove_avoid_keyword(&keyword).await;
            }
            Command::Clear(mode) => self.clear_conversation(mode).await,
            Command::CheckHealth => {
                self.check_health().await;
            }
            Command::ToggleTheme => {
                self.toggle_theme().await;
            }
        }
        self.snapshot().await
    }

    pub async fn select_category(&self, id: &str) {
        let id = id.trim();
        if !landing::is_known(id) {
            tracing::debug!(category = id, "unlisted category selected");
        }
        let mut state = self.state.write().await;
        state.category = Some(id.to_string()).filter(|c| !c.is_empty());
        state.page = Page::Chat;
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.write().await.conversation.set_input(text);
    }

    /// Send whatever is in the input box, emptying it once the send starts.
    pub async fn send_input(&self) -> SendOutcome {
        let text = {
            let state = self.state.read().await;
            if state.conversation.is_loading() {
                return SendOutcome::Busy;
            }
            state.conversation.input().to_string()
        };
        self.send(&text, true).await
    }

    /// Send `text`. A draft in the input box is left alone.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        self.send(text, false).await
    }

    async fn send(&self, text: &str, from_input: bool) -> SendOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SendOutcome::Empty;
        }

        let request = {
            let mut state = self.state.write().await;
            if state.conversation.is_loading() {
                tracing::debug!("send ignored, previous request still in flight");
                return SendOutcome::Busy;
            }
            state.conversation.push(Message::user(trimmed));
            if from_input {
                state.conversation.take_input();
            }
            state.conversation.set_loading(true);
            AgentRequest {
                user_id: state.identity.user_id.clone(),
                message: trimmed.to_string(),
                session_id: state.identity.session_id.clone(),
            }
        };

        // Detached so a dropped caller cannot leave the loading flag set.
        let this = self.clone();
        let session_id = request.session_id.clone();
        match tokio::spawn(async move { this.complete_send(request).await }).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, "send task aborted");
                let mut state = self.state.write().await;
                if state.identity.session_id == session_id {
                    state.conversation.set_loading(false);
                }
                SendOutcome::Failed
            }
        }
    }

    async fn complete_send(&self, request: AgentRequest) -> SendOutcome {
        let result = self.client.run_agent(&request).await;

        let mut state = self.state.write().await;

        // A clear already reset loading for the new session; leave it alone.
        if state.identity.session_id != request.session_id {
            tracing::info!(
                session_id = %request.session_id,
                "dropping agent answer for a cleared session"
            );
            return SendOutcome::Stale;
        }

        state.conversation.set_loading(false);
        match result {
            Ok(response) => {
                tracing::debug!(
                    results = response.results.len(),
                    questions = response.clarifying_questions.len(),
                    trace_id = ?response.trace_id,
                    "agent answered"
                );
                let (context, avoid) = constraints::merge(&state.avoid, &response);
                state.context = context;
                state.avoid = avoid;
                state.conversation.push(reply_message(&response));
                state.last_response = Some(response);
                SendOutcome::Replied
            }
            Err(err) => {
                tracing::warn!(error = %err, "agent request failed");
                state.conversation.push(Message::assistant(CONNECTION_ISSUE));
                SendOutcome::Failed
            }
        }
    }

    // Local reset always happens; the remote notice is best effort.
    // An in-flight send is abandoned, so the new session starts idle.
    pub async fn clear_conversation(&self, mode: ClearMode) {
        let retired = {
            let mut state = self.state.write().await;
            state.reset_conversation();
            state.conversation.set_loading(false);
            match mode {
                ClearMode::BackToLanding => {
                    state.page = Page::Landing;
                    state.category = None;
                    state.conversation.take_input();
                    state.identity.reset()
                }
                ClearMode::NewSearch => state.identity.rotate(),
            }
        };
        tracing::info!(?mode, retired = %retired, "conversation cleared");

        if let Err(err) = self.client.clear_session(&retired).await {
            tracing::warn!(error = %err, session_id = %retired, "could not clear conversation on backend");
        }
    }

    /// Client-side only; the agent is not told.
    pub async fn remove_avoid_keyword(&self, keyword: &str) -> bool {
        self.state.write().await.avoid.remove(keyword)
    }

    pub async fn check_health(&self) -> HealthStatus {
        self.health.check_health().await
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut state = self.state.write().await;
        state.theme = state.theme.toggled();
        state.theme
    }

    /// Remote view of the current session.
    pub async fn session_info(&self) -> Result<SessionInfo, AgentError> {
        let session_id = self.state.read().await.identity.session_id.clone();
        self.client.session_info(&session_id).await
    }
}
