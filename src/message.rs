// src/message.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::services::orchestrator::{SendOutcome, Snapshot};

// ---- remote agent wire types ----

#[derive(Debug, Clone, Serialize)]
pub struct AgentRequest {
    pub user_id: String,
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub understood_request: Option<UnderstoodRequest>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Product>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub clarifying_questions: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
}

impl AgentResponse {
    pub fn constraints(&self) -> Option<&Constraints> {
        self.understood_request
            .as_ref()
            .and_then(|u| u.constraints.as_ref())
    }

    /// Avoid keywords reported for this turn.
    pub fn avoid_keywords(&self) -> &[String] {
        self.constraints()
            .map(|c| c.avoid_keywords.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UnderstoodRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub constraints: Option<Constraints>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Constraints {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub budget_inr_max: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub style_keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub avoid_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price_inr: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub match_score: Option<f64>,
    /// Badge value derived from `match_score`, filled by [`Product::scored`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_percent: Option<u8>,
    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Vec::is_empty")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Vec::is_empty")]
    pub cons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_recommended: Option<String>,
}

impl Product {
    pub fn scored(mut self) -> Self {
        self.match_percent = match_percent(self.match_score);
        self
    }
}

// Whole percentage, clamped to 0..=100.
fn match_percent(score: Option<f64>) -> Option<u8> {
    score
        .filter(|s| s.is_finite())
        .map(|s| (s.clamp(0.0, 1.0) * 100.0).round() as u8)
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub has_history: bool,
}

// ---- local API ----

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub outcome: SendOutcome,
    pub snapshot: Snapshot,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

// Sizes come back as "M", "9" or 9 depending on how the remote parsed them.
fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// The remote passes LLM output through untouched, so budgets may arrive as
// "3000". Anything that is not a number or a numeric string becomes None.
fn lenient_number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

// Non-arrays read as empty; non-string items are skipped.
fn lenient_strings<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
