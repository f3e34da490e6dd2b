//! The standing directive sent with every completion request
//!
//! The directive is rendered once from a template and a [`DirectiveContext`],
//! then handed to the [`CompletionAgent`](crate::agent::CompletionAgent) as an
//! immutable value. It never appears in the transcript or the history view.
use indoc::indoc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::prompt_template::{bundled_prompt, load_prompt, load_prompt_file};

const DOSAGE_RESPONSE: &str = indoc! {"
    Unfortunately, we are not authorized to provide guidance on dosage instructions.

    However, please refer to this reliable community resource: 
    https://community.mbcures.com/portal/en/community/topic/what-is-the-recommended-methylene-blue-dosage-to-improve-memory-for-anti-aging-8-7-2024.

    Also, please refer to the reliable dosage calculator link. I hope this helps:
    https://app.calconic.com/public/calculator/6463d56e1dbe9d00290e8c62?layouts=true"};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub topic: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new<T: Into<String>, A: Into<String>>(topic: T, answer: A) -> Self {
        Self {
            topic: topic.into(),
            answer: answer.into(),
        }
    }
}

/// Values substituted into the directive template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveContext {
    pub brand: String,
    pub product: String,
    pub product_short: String,
    pub website: String,
    pub support_email: String,
    pub dosage_response: String,
    pub faq: Vec<FaqEntry>,
}

impl Default for DirectiveContext {
    fn default() -> Self {
        Self {
            brand: "CZTL".to_string(),
            product: "Ultra High Purity Methylene Blue (USP Grade, >99% purity)".to_string(),
            product_short: "Methylene Blue".to_string(),
            website: "https://cztl.bz/".to_string(),
            support_email: "support@cztl.bz".to_string(),
            dosage_response: DOSAGE_RESPONSE.to_string(),
            faq: default_faq(),
        }
    }
}

fn default_faq() -> Vec<FaqEntry> {
    vec![
        FaqEntry::new("Where to buy", "www.cztl.bz. Products are tested for heavy metals and shipped with COA."),
        FaqEntry::new("Why CZTL", "3rd party tested in US, highly pure, minimal heavy metals, fast delivery, competitive pricing."),
        FaqEntry::new("Global Shipping", "Ships to all countries globally (UK, Australia, NZ, Indonesia, etc.)."),
        FaqEntry::new("EU Orders", "Shipped locally to all EU countries; no import customs required."),
        FaqEntry::new("Powder vs Liquid", "Powder is cheaper, can be stored for 3 years, easy to mix. Liquid is for convenience."),
        FaqEntry::new("1% Solution", "Mix 1g MB with 100ml water."),
        FaqEntry::new("0.1% Solution", "Mix 1g MB with 1 liter water."),
        FaqEntry::new("Storage", "Store in dark, dry, cool place (15-20°C). Powder lasts 3 years."),
        FaqEntry::new("Bulk Orders (>100g)", "Email support@cztl.bz."),
        FaqEntry::new("Currency", "All prices are in US Dollars (USD)."),
        FaqEntry::new("Shipping Cost", "10 USD."),
        FaqEntry::new("Payment Methods", "PayPal and Stripe (Credit Card, Apple Pay)."),
        FaqEntry::new("Payment Declined", "Contact your bank. Use direct Stripe links if needed."),
        FaqEntry::new("Tracking", "Details shared via email once shipped."),
        FaqEntry::new("Delivery Time", "Account for 2-3 weeks, especially for cross-border."),
        FaqEntry::new("USP Grade", "Quality tested; heavy metals/impurities are at or below USP recommended levels."),
        FaqEntry::new("Amazon", "Only purchase if the seller is \"CZTL\". Beware of fakes."),
    ]
}

/// Rendered standing directive, cheap to clone and never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions(Arc<str>);

impl Instructions {
    /// Use already rendered directive text as is
    pub fn new<S: AsRef<str>>(text: S) -> Self {
        Self(Arc::from(text.as_ref()))
    }

    /// Render the bundled directive template
    pub fn render(context: &DirectiveContext) -> Result<Self, tera::Error> {
        let template = bundled_prompt("system.md")
            .ok_or_else(|| tera::Error::msg("bundled prompt system.md is missing"))?;
        Ok(Self::new(load_prompt(template, context)?))
    }

    /// Render a directive template from disk
    pub fn from_template_file(
        path: impl AsRef<Path>,
        context: &DirectiveContext,
    ) -> Result<Self, tera::Error> {
        Ok(Self::new(load_prompt_file(path.as_ref(), context)?))
    }

    /// The CZTL directive with the default FAQ and policies
    pub fn cztl() -> Result<Self, tera::Error> {
        Self::render(&DirectiveContext::default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
