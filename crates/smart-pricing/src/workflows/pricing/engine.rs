use super::domain::{PricingDecision, UserProfile};
use super::policy::decide_discount;
use super::scoring::calculate_scores;

/// Score a profile and attach the discount decision it earns.
pub fn analyze_user(profile: &UserProfile) -> PricingDecision {
    let scores = calculate_scores(profile);
    let tier = decide_discount(&scores);
    PricingDecision::from_tier(tier, scores)
}

/// Deterministic pass over a profile set, in input order.
pub fn analyze_all(profiles: &[UserProfile]) -> Vec<PricingDecision> {
    profiles.iter().map(analyze_user).collect()
}
