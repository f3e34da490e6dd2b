use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderResult;
use crate::models::history::HistoryEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for hosted completion endpoints (Gemini, OpenAI, etc)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the reply text for `messages`, where the last entry is the new user turn.
    ///
    /// An empty string is a valid reply; deciding what to show instead is up to the caller.
    async fn complete(
        &self,
        system: &str,
        messages: &[HistoryEntry],
    ) -> ProviderResult<(String, Usage)>;
}
