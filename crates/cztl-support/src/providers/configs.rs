use anyhow::{anyhow, Result};
use std::env;

pub const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o";

// Unified enum to wrap different provider configurations
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Gemini(GeminiProviderConfig),
    OpenAi(OpenAiProviderConfig),
    Mock(MockProviderConfig),
}

/// Shared helpers for loading a provider config from the environment
pub trait ProviderConfigEnv: Sized {
    fn from_env() -> Result<Self>;

    /// Read an environment variable, failing only when it is required and unset
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(anyhow!(
                "Environment variable '{}' is required but not set.",
                key
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl GeminiProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: GEMINI_HOST.to_string(),
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl ProviderConfigEnv for GeminiProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("GEMINI_API_KEY", true, None)?
            .ok_or_else(|| anyhow!("Gemini API key should be present"))?;
        let host = Self::get_env("GEMINI_HOST", false, Some(GEMINI_HOST.to_string()))?
            .unwrap_or_else(|| GEMINI_HOST.to_string());
        let model = Self::get_env("GEMINI_MODEL", false, Some(GEMINI_MODEL.to_string()))?
            .unwrap_or_else(|| GEMINI_MODEL.to_string());

        Ok(Self {
            host,
            model,
            ..Self::new(api_key)
        })
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl OpenAiProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: OPENAI_HOST.to_string(),
            api_key: api_key.into(),
            model: OPENAI_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl ProviderConfigEnv for OpenAiProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("OPENAI_API_KEY", true, None)?
            .ok_or_else(|| anyhow!("OpenAI API key should be present"))?;
        let host = Self::get_env("OPENAI_HOST", false, Some(OPENAI_HOST.to_string()))?
            .unwrap_or_else(|| OPENAI_HOST.to_string());
        let model = Self::get_env("OPENAI_MODEL", false, Some(OPENAI_MODEL.to_string()))?
            .unwrap_or_else(|| OPENAI_MODEL.to_string());

        Ok(Self {
            host,
            model,
            ..Self::new(api_key)
        })
    }
}

/// Offline provider that answers every turn with a fixed reply
#[derive(Debug, Clone)]
pub struct MockProviderConfig {
    pub reply: String,
}

impl Default for MockProviderConfig {
    fn default() -> Self {
        Self {
            reply: "This is an offline demo reply. Ask anything about CZTL Methylene Blue."
                .to_string(),
        }
    }
}
