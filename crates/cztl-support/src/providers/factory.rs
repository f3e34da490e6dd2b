use super::{
    base::Provider, configs::ProviderConfig, gemini::GeminiProvider, mock::MockProvider,
    openai::OpenAiProvider,
};
use anyhow::Result;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(EnumIter, EnumString, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    OpenAi,
    Mock,
}

impl ProviderConfig {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            ProviderConfig::Gemini(_) => ProviderType::Gemini,
            ProviderConfig::OpenAi(_) => ProviderType::OpenAi,
            ProviderConfig::Mock(_) => ProviderType::Mock,
        }
    }
}

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider + Send + Sync>> {
    match config {
        ProviderConfig::Gemini(gemini_config) => Ok(Box::new(GeminiProvider::new(gemini_config)?)),
        ProviderConfig::OpenAi(openai_config) => Ok(Box::new(OpenAiProvider::new(openai_config)?)),
        ProviderConfig::Mock(mock_config) => {
            Ok(Box::new(MockProvider::default().with_default_reply(mock_config.reply)))
        }
    }
}
