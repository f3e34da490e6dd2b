use anyhow::{Context, Result};

use cztl_support::agent::CompletionAgent;
use cztl_support::instructions::{DirectiveContext, Instructions};
use cztl_support::orchestrator::TurnOrchestrator;
use cztl_support::providers::configs::{
    GeminiProviderConfig, MockProviderConfig, OpenAiProviderConfig, ProviderConfig,
    ProviderConfigEnv,
};
use cztl_support::providers::factory;

use crate::prompt::cliclack::CliclackPrompt;
use crate::prompt::Prompt;
use crate::session::Session;
use crate::{Cli, CliProviderVariant};

pub fn build_session<'a>(cli: &Cli, prompt: Box<dyn Prompt + 'a>) -> Result<Session<'a>> {
    let orchestrator = build_orchestrator(cli)?;
    Ok(Session::new(orchestrator, prompt, cli.support_url.clone()))
}

pub async fn execute(cli: &Cli) -> Result<()> {
    let mut session = build_session(cli, Box::new(CliclackPrompt::new()))?;
    session.start().await
}

fn build_orchestrator(cli: &Cli) -> Result<TurnOrchestrator> {
    let provider = factory::get_provider(create_provider_config(cli)?)?;
    let instructions = match &cli.instructions {
        Some(path) => Instructions::from_template_file(path, &DirectiveContext::default())
            .with_context(|| format!("Failed to render instructions from {}", path.display()))?,
        None => Instructions::cztl().context("Failed to render the bundled instructions")?,
    };
    Ok(TurnOrchestrator::new(CompletionAgent::new(
        provider,
        instructions,
    )))
}

fn create_provider_config(cli: &Cli) -> Result<ProviderConfig> {
    let config = match cli.provider {
        CliProviderVariant::Gemini => {
            let mut config = match &cli.api_key {
                Some(api_key) => GeminiProviderConfig::new(api_key.clone()),
                None => GeminiProviderConfig::from_env()
                    .context("API key must be provided via --api-key or GEMINI_API_KEY")?,
            };
            if let Some(model) = &cli.model {
                config.model = model.clone();
            }
            ProviderConfig::Gemini(config)
        }
        CliProviderVariant::OpenAi => {
            let mut config = match &cli.api_key {
                Some(api_key) => OpenAiProviderConfig::new(api_key.clone()),
                None => OpenAiProviderConfig::from_env()
                    .context("API key must be provided via --api-key or OPENAI_API_KEY")?,
            };
            if let Some(model) = &cli.model {
                config.model = model.clone();
            }
            ProviderConfig::OpenAi(config)
        }
        CliProviderVariant::Mock => ProviderConfig::Mock(MockProviderConfig::default()),
    };
    Ok(config)
}
