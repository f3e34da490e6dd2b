use anyhow::Result;
use cztl_support::agent::CompletionAgent;
use cztl_support::conversation::ConversationStore;
use cztl_support::escalation::EscalationPolicy;
use cztl_support::instructions::{DirectiveContext, Instructions};
use cztl_support::orchestrator::TurnOrchestrator;
use cztl_support::providers::factory;
use std::sync::Arc;

use crate::configuration::Settings;

/// Shared application state: the one conversation this process serves
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: TurnOrchestrator,
    pub support_url: String,
}

impl AppState {
    pub fn new(orchestrator: TurnOrchestrator, support_url: impl Into<String>) -> Self {
        Self {
            orchestrator,
            support_url: support_url.into(),
        }
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let provider = factory::get_provider(settings.provider.into_config())?;
        let instructions = match &settings.support.instructions_template {
            Some(path) => Instructions::from_template_file(path, &DirectiveContext::default())?,
            None => Instructions::cztl()?,
        };

        let orchestrator = TurnOrchestrator::with_parts(
            Arc::new(ConversationStore::default()),
            CompletionAgent::new(provider, instructions),
            EscalationPolicy::new(&settings.support.keywords),
        );

        Ok(Self::new(orchestrator, settings.support.url))
    }
}
