use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use cztl_support::escalation::{ADVANCED_SUPPORT_URL, DEFAULT_KEYWORDS};
use cztl_support::providers::configs::{
    GeminiProviderConfig, MockProviderConfig, OpenAiProviderConfig, ProviderConfig, GEMINI_HOST,
    GEMINI_MODEL, OPENAI_HOST, OPENAI_MODEL,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ProviderSettings {
    Gemini {
        #[serde(default = "default_gemini_host")]
        host: String,
        api_key: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<i32>,
    },
    OpenAi {
        #[serde(default = "default_openai_host")]
        host: String,
        api_key: String,
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<i32>,
    },
    Mock {
        #[serde(default = "default_mock_reply")]
        reply: String,
    },
}

impl ProviderSettings {
    // Convert to the library's ProviderConfig
    pub fn into_config(self) -> ProviderConfig {
        match self {
            ProviderSettings::Gemini {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            } => ProviderConfig::Gemini(GeminiProviderConfig {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            }),
            ProviderSettings::OpenAi {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            } => ProviderConfig::OpenAi(OpenAiProviderConfig {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            }),
            ProviderSettings::Mock { reply } => ProviderConfig::Mock(MockProviderConfig { reply }),
        }
    }
}

/// Escalation and directive settings
#[derive(Debug, Deserialize)]
pub struct SupportSettings {
    #[serde(default = "default_support_url")]
    pub url: String,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Directive template to render instead of the bundled one
    #[serde(default)]
    pub instructions_template: Option<PathBuf>,
}

impl Default for SupportSettings {
    fn default() -> Self {
        Self {
            url: default_support_url(),
            keywords: default_keywords(),
            instructions_template: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub support: SupportSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // The widget talks to Gemini unless told otherwise
            .set_default("provider.type", "gemini")?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("CZTL")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("support.keywords")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Handle both NotFound and missing field message variants
                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    // Extract field name from error message "missing field `api_key`"
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .split('`')
                        .next()
                        .unwrap_or_default();
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_gemini_host() -> String {
    GEMINI_HOST.to_string()
}

fn default_gemini_model() -> String {
    GEMINI_MODEL.to_string()
}

fn default_openai_host() -> String {
    OPENAI_HOST.to_string()
}

fn default_openai_model() -> String {
    OPENAI_MODEL.to_string()
}

fn default_mock_reply() -> String {
    MockProviderConfig::default().reply
}

fn default_support_url() -> String {
    ADVANCED_SUPPORT_URL.to_string()
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}
