use thiserror::Error;

/// Failure of a completion request
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Rate limited by provider (status {0})")]
    RateLimited(u16),

    #[error("Server error: {0}")]
    Server(u16),

    #[error("Request failed: {status} - {body}")]
    Request { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Prompt blocked by provider: {0}")]
    Blocked(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited(_) | ProviderError::Server(_) | ProviderError::Transport(_)
        )
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ProviderError::Request {
            status: 400,
            body: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed: 400 - bad key");
        assert_eq!(ProviderError::Server(503).to_string(), "Server error: 503");
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::RateLimited(429).is_transient());
        assert!(ProviderError::Server(500).is_transient());
        assert!(!ProviderError::MalformedResponse("x".into()).is_transient());
        assert!(!ProviderError::Blocked("SAFETY".into()).is_transient());
    }
}
