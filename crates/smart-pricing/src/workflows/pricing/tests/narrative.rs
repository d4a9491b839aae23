use super::common::{
    canned_narrator, engaged_metro_profile, lapsed_engaged_profile, offline_narrator,
};
use crate::config::{NarrativeConfig, DEFAULT_NARRATIVE_ENDPOINT, DEFAULT_NARRATIVE_MODEL};
use crate::workflows::pricing::engine::analyze_user;
use crate::workflows::pricing::narrative::{
    insight_prompt, summary_prompt, Narrator, StrategyMetrics, INSIGHT_FAILED,
    INSIGHT_UNAVAILABLE, SUMMARY_FAILED, SUMMARY_UNAVAILABLE,
};

fn metrics() -> StrategyMetrics {
    StrategyMetrics {
        users: 15,
        conversion_rate: 46.7,
        avg_discount: 38,
        revenue: 4350.0,
        revenue_uplift: 12.5,
    }
}

#[tokio::test]
async fn disabled_narrator_returns_unavailable_text() {
    let narrator = Narrator::disabled();
    let profile = engaged_metro_profile();
    let decision = analyze_user(&profile);

    assert!(!narrator.is_enabled());
    assert_eq!(
        narrator.user_insight(&profile, &decision).await,
        INSIGHT_UNAVAILABLE
    );
    assert_eq!(narrator.strategy_summary(&metrics()).await, SUMMARY_UNAVAILABLE);
}

#[tokio::test]
async fn failing_backend_degrades_to_placeholder() {
    let narrator = offline_narrator();
    let profile = engaged_metro_profile();
    let decision = analyze_user(&profile);

    assert!(narrator.is_enabled());
    assert_eq!(narrator.user_insight(&profile, &decision).await, INSIGHT_FAILED);
    assert_eq!(narrator.strategy_summary(&metrics()).await, SUMMARY_FAILED);
}

#[tokio::test]
async fn backend_text_is_passed_through() {
    let narrator = canned_narrator("Deep discount justified.");
    let profile = lapsed_engaged_profile();
    let decision = analyze_user(&profile);
    assert_eq!(
        narrator.user_insight(&profile, &decision).await,
        "Deep discount justified."
    );
}

#[test]
fn missing_api_key_disables_narrator() {
    let config = NarrativeConfig {
        api_key: None,
        model: DEFAULT_NARRATIVE_MODEL.to_string(),
        endpoint: DEFAULT_NARRATIVE_ENDPOINT.to_string(),
    };
    assert!(!Narrator::from_config(&config).is_enabled());

    let configured = NarrativeConfig {
        api_key: Some("key".to_string()),
        ..config
    };
    assert!(Narrator::from_config(&configured).is_enabled());
}

#[test]
fn insight_prompt_carries_signals_and_decision() {
    let profile = lapsed_engaged_profile();
    let decision = analyze_user(&profile);
    let prompt = insight_prompt(&profile, &decision);

    assert!(prompt.contains("Device: iOS"));
    assert!(prompt.contains("City tier: 1"));
    assert!(prompt.contains("Mock tests taken: 3"));
    assert!(prompt.contains("Added to cart: Yes"));
    assert!(prompt.contains("Competitor signal: Yes"));
    assert!(prompt.contains("Days inactive: 45"));
    assert!(prompt.contains("Churn risk: 1"));
    assert!(prompt.contains("75% discount (High Churn Risk + High Intent (Win-back priority))"));
}

#[test]
fn summary_prompt_carries_aggregates() {
    let prompt = summary_prompt(&metrics());
    assert!(prompt.contains("Users simulated: 15"));
    assert!(prompt.contains("Conversion rate: 46.7%"));
    assert!(prompt.contains("Average discount: 38%"));
    assert!(prompt.contains("Estimated revenue: 4350"));
    assert!(prompt.contains("Revenue uplift vs list price: +12.5%"));
}
