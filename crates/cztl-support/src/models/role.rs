use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Typed by the customer
    User,
    /// Generated by the completion provider
    Model,
    /// Synthesized locally, such as an escalation suggestion. Never sent to the provider.
    System,
}

impl Role {
    /// Whether messages with this role belong in the history sent to the provider
    pub fn is_conversational(&self) -> bool {
        !matches!(self, Role::System)
    }
}
