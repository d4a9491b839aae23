//! Optional free-text explanations for decisions and simulation outcomes.
//!
//! Narratives come from an external generative-language service. Nothing in
//! the engine depends on them: [`Narrator`] swaps in fixed placeholder text
//! whenever the service is unconfigured or a call fails.

mod gemini;

pub use gemini::GeminiNarrator;

use crate::config::NarrativeConfig;
use crate::workflows::pricing::domain::{PricingDecision, UserProfile};
use crate::workflows::pricing::simulation::SimulationSummary;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

pub const INSIGHT_UNAVAILABLE: &str = "AI Service Unavailable (Missing API Key)";
pub const INSIGHT_FAILED: &str = "Error generating insight.";
pub const SUMMARY_UNAVAILABLE: &str = "AI Service Unavailable";
pub const SUMMARY_FAILED: &str = "Error generating summary.";

/// Aggregate figures handed to the executive summary prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyMetrics {
    pub users: usize,
    pub conversion_rate: f64,
    pub avg_discount: u32,
    pub revenue: f64,
    pub revenue_uplift: f64,
}

impl From<&SimulationSummary> for StrategyMetrics {
    fn from(summary: &SimulationSummary) -> Self {
        Self {
            users: summary.total,
            conversion_rate: summary.conversion_rate,
            avg_discount: summary.avg_discount,
            revenue: summary.revenue,
            revenue_uplift: summary.revenue_uplift,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("narrative service returned {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("narrative service returned no text")]
    EmptyResponse,
}

/// Backend able to turn pricing context into prose.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, NarrativeError>;
}

/// Facade that never fails: errors degrade to placeholder strings.
#[derive(Clone, Default)]
pub struct Narrator {
    generator: Option<Arc<dyn NarrativeGenerator>>,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Narrator {
    pub fn new(generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn disabled() -> Self {
        Self { generator: None }
    }

    /// Build a Gemini-backed narrator when an API key is configured.
    pub fn from_config(config: &NarrativeConfig) -> Self {
        let Some(api_key) = &config.api_key else {
            warn!("narrative API key not configured; insights will use placeholder text");
            return Self::disabled();
        };

        match GeminiNarrator::new(
            api_key.clone(),
            config.model.clone(),
            config.endpoint.clone(),
        ) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(err) => {
                warn!(error = %err, "narrative client unavailable; insights will use placeholder text");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn user_insight(&self, profile: &UserProfile, decision: &PricingDecision) -> String {
        let prompt = insight_prompt(profile, decision);
        self.generate_or(&prompt, INSIGHT_UNAVAILABLE, INSIGHT_FAILED)
            .await
    }

    pub async fn strategy_summary(&self, metrics: &StrategyMetrics) -> String {
        let prompt = summary_prompt(metrics);
        self.generate_or(&prompt, SUMMARY_UNAVAILABLE, SUMMARY_FAILED)
            .await
    }

    async fn generate_or(&self, prompt: &str, unavailable: &str, failed: &str) -> String {
        let Some(generator) = &self.generator else {
            return unavailable.to_string();
        };

        match generator.generate(prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "narrative generation failed; using placeholder");
                failed.to_string()
            }
        }
    }
}

pub(crate) fn insight_prompt(profile: &UserProfile, decision: &PricingDecision) -> String {
    format!(
        "You are a senior pricing analyst for an EdTech product. \
         Review this learner and the discount the pricing engine chose.\n\n\
         Learner signals:\n\
         - Device: {}\n\
         - City tier: {}\n\
         - Mock tests taken: {}\n\
         - Added to cart: {}\n\
         - Competitor signal: {}\n\
         - Days inactive: {}\n\n\
         Scores:\n\
         - Intent: {}\n\
         - Affordability: {}\n\
         - Churn risk: {}\n\n\
         Decision: {}% discount ({})\n\n\
         In two sentences, explain why this discount fits the persona or what risk it carries.",
        profile.device_type,
        profile.city_tier.number(),
        profile.mock_tests_taken,
        yes_no(profile.added_to_cart),
        yes_no(profile.competitor_signal),
        profile.last_active_days,
        decision.scores.intent_score,
        decision.scores.affordability_score,
        decision.scores.churn_score,
        decision.discount,
        decision.reason,
    )
}

pub(crate) fn summary_prompt(metrics: &StrategyMetrics) -> String {
    format!(
        "Summarize this dynamic discounting experiment for executives.\n\
         - Users simulated: {}\n\
         - Conversion rate: {:.1}%\n\
         - Average discount: {}%\n\
         - Estimated revenue: {:.0}\n\
         - Revenue uplift vs list price: {:+.1}%\n\n\
         Discounts range from 0 to 75% based on intent, affordability and churn scores. \
         In at most 50 words, state whether the strategy worked or suggest one adjustment.",
        metrics.users,
        metrics.conversion_rate,
        metrics.avg_discount,
        metrics.revenue,
        metrics.revenue_uplift
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
