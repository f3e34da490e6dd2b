use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Keywords that suggest the customer needs a human
pub const DEFAULT_KEYWORDS: [&str; 4] = ["order", "track", "human", "refund"];

/// Advisory appended after a reply when the heuristic triggers
pub const ESCALATION_SUGGESTION: &str = "It sounds like you might need advanced assistance. Would you like to connect with our specialized support agent in a new tab?";

/// Human support chat the advisory links to
pub const ADVANCED_SUPPORT_URL: &str =
    "https://ranchoddas.app.n8n.cloud/webhook/efaf4a6c-e1c2-479e-bbc5-c299251ef83a/chat";

/// Keyword heuristic deciding when to suggest human support
///
/// Matching is a plain case-insensitive substring test: "humanity" contains
/// "human" and triggers. A false positive only costs an ignorable suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    keywords: Vec<String>,
}

impl EscalationPolicy {
    /// Build a policy from custom keywords; they are stored lowercased
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when the lowercased text contains any keyword
    pub fn evaluate(&self, user_text: &str) -> bool {
        let text = user_text.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

/// Open the advanced support chat in the user's browser
pub fn open_advanced_support(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open {}", url))
}
