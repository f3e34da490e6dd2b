//! Turn orchestration: how one customer utterance becomes a transcript update
//!
//! A turn appends the user message, asks the [`CompletionAgent`] for a reply
//! using the transcript as it stood before the turn, appends the reply (or a
//! fallback when the reply is empty) and finally appends an escalation
//! suggestion when the [`EscalationPolicy`] matches the user's text.
//!
//! Only one turn runs at a time. A submit that arrives while a turn is in
//! flight is dropped, not queued.
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::agent::CompletionAgent;
use crate::conversation::ConversationStore;
use crate::escalation::{EscalationPolicy, ESCALATION_SUGGESTION};
use crate::models::history::HistoryEntry;
use crate::models::message::Message;
use crate::quick_actions::{available_quick_actions, QuickAction};

/// Reply shown when the provider answers with no text
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't process that. Would you like to speak with our advanced support?";

/// What a rendering surface needs to draw the chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub busy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The text was empty or whitespace only
    EmptyInput,
    /// Another turn is still waiting on the agent
    Busy,
}

/// Result of one `submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing was appended
    Ignored(IgnoreReason),
    /// The agent's text was appended
    Replied { escalated: bool },
    /// The agent returned no text and the fallback reply was appended
    FellBack { escalated: bool },
    /// The agent failed; only the user message was appended
    Failed { error: String },
}

impl TurnOutcome {
    pub fn escalated(&self) -> bool {
        matches!(
            self,
            TurnOutcome::Replied { escalated: true } | TurnOutcome::FellBack { escalated: true }
        )
    }
}

struct Inner {
    store: Arc<ConversationStore>,
    agent: CompletionAgent,
    policy: EscalationPolicy,
    busy: AtomicBool,
    state: watch::Sender<ChatState>,
}

impl Inner {
    fn current_state(&self) -> ChatState {
        ChatState {
            messages: self.store.snapshot(),
            busy: self.busy.load(Ordering::Acquire),
        }
    }

    // Snapshot under the sender's lock so a stale state never lands last
    fn publish(&self) {
        self.state.send_modify(|state| *state = self.current_state());
    }

    fn append(&self, message: Message) {
        self.store.append(message);
        self.publish();
    }
}

/// Drives turns against a conversation store, one at a time
#[derive(Clone)]
pub struct TurnOrchestrator {
    inner: Arc<Inner>,
}

impl TurnOrchestrator {
    /// Orchestrate turns on a freshly seeded conversation with the default policy
    pub fn new(agent: CompletionAgent) -> Self {
        Self::with_parts(
            Arc::new(ConversationStore::default()),
            agent,
            EscalationPolicy::default(),
        )
    }

    pub fn with_parts(
        store: Arc<ConversationStore>,
        agent: CompletionAgent,
        policy: EscalationPolicy,
    ) -> Self {
        let initial = ChatState {
            messages: store.snapshot(),
            busy: false,
        };
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                store,
                agent,
                policy,
                busy: AtomicBool::new(false),
                state,
            }),
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.inner.store
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Current transcript and busy flag
    pub fn state(&self) -> ChatState {
        self.inner.current_state()
    }

    /// Receive a new `ChatState` after every append and busy change
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.inner.state.subscribe()
    }

    /// Quick actions to offer for the transcript as it stands
    pub fn quick_actions(&self) -> Vec<QuickAction> {
        available_quick_actions(self.inner.store.len()).to_vec()
    }

    /// Run a whole turn for `raw_text`
    pub async fn submit(&self, raw_text: &str) -> TurnOutcome {
        match self.begin(raw_text) {
            Ok(turn) => turn.run().await,
            Err(reason) => TurnOutcome::Ignored(reason),
        }
    }

    /// Accept a turn without waiting for the agent
    ///
    /// On success the user message is already appended and the orchestrator is
    /// busy until the returned [`Turn`] has run or been dropped.
    pub fn begin(&self, raw_text: &str) -> Result<Turn, IgnoreReason> {
        if raw_text.trim().is_empty() {
            return Err(IgnoreReason::EmptyInput);
        }

        let guard = BusyGuard::acquire(&self.inner).ok_or(IgnoreReason::Busy)?;

        // Prior turns only: the view is taken before the user message lands.
        let history = self.inner.store.history_view();
        self.inner.append(Message::user(raw_text));
        tracing::debug!(history_len = history.len(), "turn accepted");

        Ok(Turn {
            text: raw_text.to_string(),
            history,
            guard,
        })
    }
}

/// An accepted turn waiting to call the agent
pub struct Turn {
    text: String,
    history: Vec<HistoryEntry>,
    guard: BusyGuard,
}

impl Turn {
    /// Call the agent and append the results; the busy flag clears when this returns
    pub async fn run(self) -> TurnOutcome {
        let inner = Arc::clone(&self.guard.inner);

        let reply = match inner.agent.complete(&self.text, &self.history).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    transient = e.is_transient(),
                    "completion failed, dropping turn"
                );
                return TurnOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let fell_back = reply.is_empty();
        if fell_back {
            tracing::warn!("completion returned no text, using fallback reply");
            inner.append(Message::model(FALLBACK_REPLY));
        } else {
            inner.append(Message::model(reply));
        }

        let escalated = inner.policy.evaluate(&self.text);
        if escalated {
            inner.append(Message::system(ESCALATION_SUGGESTION));
        }

        if fell_back {
            TurnOutcome::FellBack { escalated }
        } else {
            TurnOutcome::Replied { escalated }
        }
    }
}

/// Holds the single-flight flag; releasing happens on drop, including unwinds
struct BusyGuard {
    inner: Arc<Inner>,
}

impl BusyGuard {
    fn acquire(inner: &Arc<Inner>) -> Option<Self> {
        inner
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        inner.publish();
        Some(Self {
            inner: Arc::clone(inner),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.busy.store(false, Ordering::Release);
        self.inner.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::Instructions;
    use crate::models::role::Role;
    use crate::providers::mock::{MockProvider, MockReply};

    fn orchestrator(replies: Vec<MockReply>) -> TurnOrchestrator {
        let agent = CompletionAgent::new(
            Box::new(MockProvider::new(replies)),
            Instructions::new("Directive"),
        );
        TurnOrchestrator::new(agent)
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let orchestrator = orchestrator(vec![]);
        assert_eq!(
            orchestrator.submit("   \n\t").await,
            TurnOutcome::Ignored(IgnoreReason::EmptyInput)
        );
        assert_eq!(orchestrator.submit("").await, TurnOutcome::Ignored(IgnoreReason::EmptyInput));
        assert_eq!(orchestrator.store().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_uses_fallback() {
        let orchestrator = orchestrator(vec![MockReply::text("")]);
        let outcome = orchestrator.submit("What is USP grade?").await;

        assert_eq!(outcome, TurnOutcome::FellBack { escalated: false });
        let last = orchestrator.store().last().unwrap();
        assert_eq!(last.role, Role::Model);
        assert_eq!(last.text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_appended_as_is() {
        let orchestrator = orchestrator(vec![MockReply::text(" \n")]);
        let outcome = orchestrator.submit("hi").await;

        assert_eq!(outcome, TurnOutcome::Replied { escalated: false });
        let last = orchestrator.store().last().unwrap();
        assert_eq!(last.role, Role::Model);
        assert_eq!(last.text, " \n");
    }

    #[tokio::test]
    async fn test_fallback_still_escalates() {
        let orchestrator = orchestrator(vec![MockReply::text("")]);
        let outcome = orchestrator.submit("I need a human").await;

        assert_eq!(outcome, TurnOutcome::FellBack { escalated: true });
        assert!(outcome.escalated());
        let roles: Vec<Role> = orchestrator.state().messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Model, Role::User, Role::Model, Role::System]);
    }

    #[tokio::test]
    async fn test_user_text_is_kept_verbatim() {
        let orchestrator = orchestrator(vec![MockReply::text("ok")]);
        orchestrator.submit("  spaced out  ").await;
        assert_eq!(orchestrator.store().snapshot()[1].text, "  spaced out  ");
    }

    #[tokio::test]
    async fn test_failure_leaves_only_user_message() {
        let orchestrator = orchestrator(vec![MockReply::failure("network down")]);
        let outcome = orchestrator.submit("Where is my order?").await;

        assert!(matches!(outcome, TurnOutcome::Failed { ref error } if error.contains("network down")));
        assert!(!outcome.escalated());
        assert_eq!(orchestrator.store().len(), 2);
        assert_eq!(orchestrator.store().last().unwrap().role, Role::User);
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test]
    async fn test_dropping_an_accepted_turn_releases_busy() {
        let orchestrator = orchestrator(vec![]);
        let turn = orchestrator.begin("hello").unwrap();
        assert!(orchestrator.is_busy());
        assert_eq!(orchestrator.begin("again").err(), Some(IgnoreReason::Busy));

        drop(turn);
        assert!(!orchestrator.is_busy());
        assert!(orchestrator.begin("again").is_ok());
    }

    #[tokio::test]
    async fn test_state_is_published_on_changes() {
        let orchestrator = orchestrator(vec![MockReply::text("Tracking is emailed.")]);
        let mut rx = orchestrator.subscribe();
        assert_eq!(rx.borrow_and_update().messages.len(), 1);

        orchestrator.submit("track my parcel").await;

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert!(!state.busy);
        assert_eq!(state.messages.len(), 4);
        assert_eq!(state.messages[3].text, ESCALATION_SUGGESTION);
    }

    #[tokio::test]
    async fn test_published_state_matches_store_after_release() {
        let orchestrator = orchestrator(vec![MockReply::text("first")]);
        let rx = orchestrator.subscribe();

        orchestrator.submit("one").await;
        let turn = orchestrator.begin("two").unwrap();
        assert_eq!(*rx.borrow(), orchestrator.state());
        assert!(rx.borrow().busy);

        drop(turn);
        let state = rx.borrow().clone();
        assert!(!state.busy);
        assert_eq!(state.messages, orchestrator.store().snapshot());
        assert_eq!(state.messages.last().unwrap().text, "two");
    }

    #[tokio::test]
    async fn test_quick_actions_disappear_as_transcript_grows() {
        let orchestrator = orchestrator(vec![MockReply::text("a"), MockReply::text("b")]);
        assert_eq!(orchestrator.quick_actions().len(), 3);
        orchestrator.submit("hi").await;
        assert_eq!(orchestrator.quick_actions().len(), 3);
        orchestrator.submit("hi again").await;
        assert!(orchestrator.quick_actions().is_empty());
    }
}
