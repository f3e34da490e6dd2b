use std::sync::Arc;

use crate::errors::ProviderResult;
use crate::instructions::Instructions;
use crate::models::history::HistoryEntry;
use crate::providers::base::Provider;

/// Completion agent: a provider bound to the standing directive
///
/// The directive is fixed at construction and sent as the system instruction of
/// every call; callers only supply the new message and the prior turns.
#[derive(Clone)]
pub struct CompletionAgent {
    provider: Arc<dyn Provider>,
    instructions: Instructions,
}

impl CompletionAgent {
    pub fn new(provider: Box<dyn Provider>, instructions: Instructions) -> Self {
        Self {
            provider: Arc::from(provider),
            instructions,
        }
    }

    /// Share an existing provider, e.g. one a test keeps a handle to
    pub fn from_shared(provider: Arc<dyn Provider>, instructions: Instructions) -> Self {
        Self {
            provider,
            instructions,
        }
    }

    /// Ask for a reply to `new_message` given the prior `history`
    pub async fn complete(
        &self,
        new_message: &str,
        history: &[HistoryEntry],
    ) -> ProviderResult<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(HistoryEntry::user(new_message));

        let (text, usage) = self
            .provider
            .complete(self.instructions.as_str(), &messages)
            .await?;
        tracing::debug!(?usage, "completion finished");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::{MockProvider, MockReply};

    #[tokio::test]
    async fn test_directive_and_new_message_are_sent() {
        let provider = Arc::new(MockProvider::new(vec![MockReply::text("Ships in 2-3 weeks.")]));
        let agent = CompletionAgent::from_shared(provider.clone(), Instructions::new("Directive"));

        let history = vec![HistoryEntry::model("Hello!")];
        let reply = agent.complete("Shipping time?", &history).await.unwrap();
        assert_eq!(reply, "Ships in 2-3 weeks.");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "Directive");
        assert_eq!(
            calls[0].messages,
            vec![HistoryEntry::model("Hello!"), HistoryEntry::user("Shipping time?")]
        );
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let agent = CompletionAgent::new(
            Box::new(MockProvider::new(vec![MockReply::failure("quota")])),
            Instructions::new(""),
        );
        assert!(agent.complete("hi", &[]).await.is_err());
    }
}
