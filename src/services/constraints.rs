// src/services/constraints.rs
use serde::{Deserialize, Serialize};

use crate::message::AgentResponse;

/// What the agent currently understands about the search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub size: Option<String>,
    pub style_keywords: Vec<String>,
}

impl SessionContext {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Accumulated avoid keywords. Set semantics, first-seen order kept for display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvoidKeywords(Vec<String>);

impl AvoidKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the keyword was not already present.
    pub fn insert(&mut self, keyword: &str) -> bool {
        if self.contains(keyword) {
            return false;
        }
        self.0.push(keyword.to_string());
        true
    }

    /// Exact-match removal. Removing a missing keyword is a no-op.
    pub fn remove(&mut self, keyword: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|k| k != keyword);
        before != self.0.len()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.iter().any(|k| k == keyword)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for AvoidKeywords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for k in iter {
            set.insert(k.as_ref());
        }
        set
    }
}

/// Derive the new context from one agent response.
///
/// Category prefers `constraints.category` and falls back to the top-level
/// `understood_request.category`. Budget, size and style keywords overwrite
/// whatever the previous turn had; an absent field clears it.
pub fn extract_context(response: &AgentResponse) -> SessionContext {
    let understood = response.understood_request.as_ref();
    let constraints = response.constraints();

    let category = constraints
        .and_then(|c| c.category.clone())
        .filter(|c| !c.is_empty())
        .or_else(|| understood.and_then(|u| u.category.clone()));

    SessionContext {
        category,
        budget: constraints.and_then(|c| c.budget_inr_max),
        size: constraints.and_then(|c| c.size.clone()),
        style_keywords: constraints
            .map(|c| c.style_keywords.clone())
            .unwrap_or_default(),
    }
}

/// Fold one response into the running state. Pure: the inputs are not touched.
pub fn merge(
    previous_avoid: &AvoidKeywords,
    response: &AgentResponse,
) -> (SessionContext, AvoidKeywords) {
    let mut avoid = previous_avoid.clone();
    for keyword in response.avoid_keywords() {
        avoid.insert(keyword);
    }
    (extract_context(response), avoid)
}
