use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Invalid server address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Environment variable that sets a settings field
///
/// Bare field names come from the tagged provider section, which is the only
/// place without a default for every field.
pub fn to_env_var(field: &str) -> String {
    let path = if field.contains('.') {
        field.replace('.', "__")
    } else {
        format!("provider__{}", field)
    };
    format!("CZTL_{}", path.to_uppercase())
}
