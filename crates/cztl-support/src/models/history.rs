use serde::{Deserialize, Serialize};

use super::message::Message;
use super::role::Role;

/// Roles that may appear in the history sent to a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Model,
}

/// A prior turn as the completion provider sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl HistoryEntry {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: HistoryRole::User,
            content: content.into(),
        }
    }

    pub fn model<S: Into<String>>(content: S) -> Self {
        Self {
            role: HistoryRole::Model,
            content: content.into(),
        }
    }

    /// Project a transcript message, dropping local advisories
    pub fn from_message(message: &Message) -> Option<Self> {
        if !message.role.is_conversational() {
            return None;
        }
        let role = match message.role {
            Role::User => HistoryRole::User,
            _ => HistoryRole::Model,
        };
        Some(Self {
            role,
            content: message.text.clone(),
        })
    }
}

/// Build the history view of a transcript: every non-system message, in order
pub fn history_view(messages: &[Message]) -> Vec<HistoryEntry> {
    messages.iter().filter_map(HistoryEntry::from_message).collect()
}
