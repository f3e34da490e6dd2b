use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

use crate::errors::{ProviderError, ProviderResult};
use crate::models::history::HistoryEntry;
use crate::providers::base::{Provider, Usage};

/// One scripted outcome of a mock completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Failure(String),
}

impl MockReply {
    pub fn text<S: Into<String>>(text: S) -> Self {
        MockReply::Text(text.into())
    }

    pub fn failure<S: Into<String>>(reason: S) -> Self {
        MockReply::Failure(reason.into())
    }
}

/// Arguments of one recorded `complete` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub system: String,
    pub messages: Vec<HistoryEntry>,
}

/// A provider that returns pre-configured replies, for tests and offline demos
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<MockReply>>,
    default_reply: Option<String>,
    calls: Mutex<Vec<MockCall>>,
    gate: Option<Arc<Notify>>,
}

impl MockProvider {
    /// Create a mock provider with a sequence of replies; once exhausted it replies with empty text
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Reply with `text` whenever the script is exhausted
    pub fn with_default_reply<S: Into<String>>(mut self, text: S) -> Self {
        self.default_reply = Some(text.into());
        self
    }

    /// Hold every call until `gate` is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[HistoryEntry],
    ) -> ProviderResult<(String, Usage)> {
        lock(&self.calls).push(MockCall {
            system: system.to_string(),
            messages: messages.to_vec(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = lock(&self.replies).pop_front();
        match next {
            Some(MockReply::Text(text)) => Ok((text, Usage::default())),
            Some(MockReply::Failure(reason)) => Err(ProviderError::Internal(reason)),
            None => Ok((self.default_reply.clone().unwrap_or_default(), Usage::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_empty() {
        let provider = MockProvider::new(vec![MockReply::text("one"), MockReply::failure("down")]);

        let (first, _) = provider.complete("sys", &[]).await.unwrap();
        assert_eq!(first, "one");
        assert!(provider.complete("sys", &[]).await.is_err());
        let (exhausted, _) = provider.complete("sys", &[]).await.unwrap();
        assert_eq!(exhausted, "");
        assert_eq!(provider.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_default_reply_and_recorded_calls() {
        let provider = MockProvider::default().with_default_reply("canned");
        let history = vec![HistoryEntry::user("hi")];
        let (text, _) = provider.complete("directive", &history).await.unwrap();

        assert_eq!(text, "canned");
        assert_eq!(
            provider.calls(),
            vec![MockCall {
                system: "directive".to_string(),
                messages: history,
            }]
        );
    }
}
