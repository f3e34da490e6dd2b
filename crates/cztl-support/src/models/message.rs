use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a transcript message, assigned in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    fn next() -> Self {
        MessageId(NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One entry of the customer-visible transcript
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh id and the current timestamp
    pub fn new<S: Into<String>>(role: Role, text: S) -> Self {
        Message {
            id: MessageId::next(),
            role,
            text: text.into(),
            created: Utc::now(),
        }
    }

    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model<S: Into<String>>(text: S) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::new(Role::System, text)
    }

    /// Local wall-clock time as `HH:MM`, the way the transcript labels messages
    pub fn time_label(&self) -> String {
        self.created.with_timezone(&Local).format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_in_creation_order() {
        let first = Message::user("one");
        let second = Message::model("two");
        let third = Message::system("three");
        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn test_constructors_set_role() {
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(Message::model("hi").role, Role::Model);
        assert_eq!(Message::system("hi").role, Role::System);
    }

    #[test]
    fn test_serialization_shape() {
        let message = Message::system("Need help?");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["text"], "Need help?");
        assert_eq!(value["id"], serde_json::json!(message.id.value()));
        assert!(value["created"].is_string());
    }

    #[test]
    fn test_time_label_is_hours_and_minutes() {
        let label = Message::user("hi").time_label();
        assert_eq!(label.len(), 5);
        assert_eq!(&label[2..3], ":");
    }
}
