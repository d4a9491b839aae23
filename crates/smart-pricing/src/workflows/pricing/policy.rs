use super::domain::{DiscountTier, UserScores};

const HIGH_CHURN: f64 = 0.6;
const HIGH_INTENT: f64 = 0.5;
const VERY_HIGH_INTENT: f64 = 0.75;
const LOW_AFFORDABILITY: f64 = 0.4;

/// One row of the discount table.
pub(crate) struct DiscountRule {
    pub tier: DiscountTier,
    pub applies: fn(&UserScores) -> bool,
}

/// Ordered rule table. The first matching rule wins; comparisons are strict.
pub(crate) const RULES: [DiscountRule; 4] = [
    DiscountRule {
        tier: DiscountTier::WinBack,
        applies: high_churn_high_intent,
    },
    DiscountRule {
        tier: DiscountTier::PriceSensitiveRetention,
        applies: high_churn_low_affordability,
    },
    DiscountRule {
        tier: DiscountTier::ConversionNudge,
        applies: very_high_intent_low_affordability,
    },
    DiscountRule {
        tier: DiscountTier::ClosingTheDeal,
        applies: very_high_intent,
    },
];

/// Map scores to a discount tier, falling back to standard pricing.
pub fn decide_discount(scores: &UserScores) -> DiscountTier {
    RULES
        .iter()
        .find(|rule| (rule.applies)(scores))
        .map(|rule| rule.tier)
        .unwrap_or(DiscountTier::Standard)
}

fn high_churn_high_intent(scores: &UserScores) -> bool {
    scores.churn_score > HIGH_CHURN && scores.intent_score > HIGH_INTENT
}

fn high_churn_low_affordability(scores: &UserScores) -> bool {
    scores.churn_score > HIGH_CHURN && scores.affordability_score < LOW_AFFORDABILITY
}

fn very_high_intent_low_affordability(scores: &UserScores) -> bool {
    very_high_intent(scores) && scores.affordability_score < LOW_AFFORDABILITY
}

fn very_high_intent(scores: &UserScores) -> bool {
    scores.intent_score > VERY_HIGH_INTENT
}
