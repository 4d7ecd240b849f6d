//! Agent messages and the per-query conversation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    User,
    Planner,
    Researcher,
    Expert,
    Critic,
    Supervisor,
}

impl AgentRole {
    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::User => "user",
            AgentRole::Planner => "planner",
            AgentRole::Researcher => "researcher",
            AgentRole::Expert => "expert",
            AgentRole::Critic => "critic",
            AgentRole::Supervisor => "supervisor",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable entry of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub role: AgentRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    pub fn new(role: AgentRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(AgentRole::User, content)
    }

    pub fn supervisor(content: impl Into<String>) -> Self {
        Self::new(AgentRole::Supervisor, content)
    }
}

/// Append-only message log for one query.
///
/// There is no way to edit or remove an entry once pushed. A batch of
/// messages is appended with [`extend`](Self::extend) in one call, so a
/// cancelled step never leaves half of its messages behind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    messages: Vec<AgentMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: AgentMessage) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = AgentMessage>) {
        self.messages.extend(messages);
    }

    pub fn messages(&self) -> &[AgentMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&AgentMessage> {
        self.messages.last()
    }

    /// Most recent message from `role`
    pub fn last_from(&self, role: AgentRole) -> Option<&AgentMessage> {
        self.messages.iter().rev().find(|m| m.role == role)
    }

    /// Plain-text transcript for prompts, one `role: content` block per message
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn into_messages(self) -> Vec<AgentMessage> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&AgentRole::Critic).unwrap();
        assert_eq!(json, "\"critic\"");
        let role: AgentRole = serde_json::from_str("\"expert\"").unwrap();
        assert_eq!(role, AgentRole::Expert);
    }

    #[test]
    fn test_history_is_ordered() {
        let mut history = ConversationHistory::new();
        history.push(AgentMessage::user("Which traits map near rs3668922?"));
        history.extend([
            AgentMessage::new(AgentRole::Researcher, "found 3 traits"),
            AgentMessage::new(AgentRole::Expert, "confirmed"),
        ]);

        assert_eq!(history.len(), 3);
        assert_eq!(history.messages()[0].role, AgentRole::User);
        assert_eq!(history.last().unwrap().content, "confirmed");
        assert_eq!(
            history.last_from(AgentRole::Researcher).unwrap().content,
            "found 3 traits"
        );
        assert!(history.last_from(AgentRole::Critic).is_none());
        assert!(history.messages()[0].timestamp <= history.messages()[2].timestamp);
    }

    #[test]
    fn test_transcript() {
        let mut history = ConversationHistory::new();
        history.push(AgentMessage::user("q"));
        history.push(AgentMessage::new(AgentRole::Planner, "1. a"));
        assert_eq!(history.transcript(), "user: q\n\nplanner: 1. a");
    }
}
