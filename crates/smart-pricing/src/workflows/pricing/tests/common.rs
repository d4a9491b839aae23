use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::pricing::domain::{CityTier, DeviceType, UserProfile, UserScores};
use crate::workflows::pricing::narrative::{NarrativeError, NarrativeGenerator, Narrator};
use crate::workflows::pricing::profiles::ProfileSet;
use crate::workflows::pricing::service::PricingService;
use crate::workflows::pricing::simulation::DEFAULT_BASE_PRICE;

/// Profile with every signal at its minimum.
pub(super) fn quiet_profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: None,
        mock_tests_taken: 0,
        added_to_cart: false,
        page_visits: 0,
        device_type: DeviceType::Android,
        city_tier: CityTier::Tier2,
        is_uninstalled: false,
        last_active_days: 0,
        competitor_signal: false,
        install_source: None,
    }
}

/// iOS, tier 1, fully engaged, no churn signals.
pub(super) fn engaged_metro_profile() -> UserProfile {
    UserProfile {
        mock_tests_taken: 3,
        added_to_cart: true,
        page_visits: 4,
        device_type: DeviceType::Ios,
        city_tier: CityTier::Tier1,
        ..quiet_profile("engaged")
    }
}

/// Fully engaged user who has also uninstalled, lapsed and looked at a rival.
pub(super) fn lapsed_engaged_profile() -> UserProfile {
    UserProfile {
        is_uninstalled: true,
        last_active_days: 45,
        competitor_signal: true,
        ..engaged_metro_profile()
    }
}

pub(super) fn scores(intent: f64, affordability: f64, churn: f64) -> UserScores {
    UserScores {
        intent_score: intent,
        affordability_score: affordability,
        churn_score: churn,
    }
}

/// Every combination of the boolean and threshold-crossing inputs.
pub(super) fn profile_grid() -> Vec<UserProfile> {
    let mut profiles = Vec::new();
    let mut index = 0;
    for device in DeviceType::ordered() {
        for tier in CityTier::ordered() {
            for bits in 0u8..64 {
                index += 1;
                profiles.push(UserProfile {
                    id: format!("grid-{index}"),
                    name: None,
                    mock_tests_taken: if bits & 1 != 0 { 3 } else { 2 },
                    added_to_cart: bits & 2 != 0,
                    page_visits: if bits & 4 != 0 { 4 } else { 3 },
                    device_type: device,
                    city_tier: tier,
                    is_uninstalled: bits & 8 != 0,
                    last_active_days: if bits & 16 != 0 { 31 } else { 30 },
                    competitor_signal: bits & 32 != 0,
                    install_source: None,
                });
            }
        }
    }
    profiles
}

pub(super) fn service_with(profiles: Vec<UserProfile>) -> PricingService {
    PricingService::new(
        ProfileSet::new(profiles),
        Narrator::disabled(),
        DEFAULT_BASE_PRICE,
    )
}

pub(super) fn service_with_narrator(narrator: Narrator) -> PricingService {
    PricingService::new(
        ProfileSet::new(vec![engaged_metro_profile()]),
        narrator,
        DEFAULT_BASE_PRICE,
    )
}

pub(super) struct CannedNarrative(pub &'static str);

#[async_trait]
impl NarrativeGenerator for CannedNarrative {
    async fn generate(&self, _prompt: &str) -> Result<String, NarrativeError> {
        Ok(self.0.to_string())
    }
}

pub(super) struct OfflineNarrative;

#[async_trait]
impl NarrativeGenerator for OfflineNarrative {
    async fn generate(&self, _prompt: &str) -> Result<String, NarrativeError> {
        Err(NarrativeError::Backend {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

pub(super) fn canned_narrator(text: &'static str) -> Narrator {
    Narrator::new(Arc::new(CannedNarrative(text)))
}

pub(super) fn offline_narrator() -> Narrator {
    Narrator::new(Arc::new(OfflineNarrative))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
