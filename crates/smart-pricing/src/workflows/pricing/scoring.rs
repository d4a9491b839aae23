use super::domain::{CityTier, DeviceType, UserProfile, UserScores};

const MOCK_TEST_THRESHOLD: u32 = 2;
const MOCK_TEST_WEIGHT: f64 = 0.3;
const CART_WEIGHT: f64 = 0.3;
const PAGE_VISIT_THRESHOLD: u32 = 3;
const PAGE_VISIT_WEIGHT: f64 = 0.2;

const UNINSTALL_WEIGHT: f64 = 0.4;
const INACTIVITY_THRESHOLD_DAYS: u32 = 30;
const INACTIVITY_WEIGHT: f64 = 0.3;
const COMPETITOR_WEIGHT: f64 = 0.3;

/// Derive intent, affordability and churn scores for a profile.
///
/// Each score is rounded with [`round_to_hundredths`] so that policy
/// thresholds compare against exact two-decimal values.
pub fn calculate_scores(profile: &UserProfile) -> UserScores {
    UserScores {
        intent_score: round_to_hundredths(intent(profile)),
        affordability_score: round_to_hundredths(affordability(profile)),
        churn_score: round_to_hundredths(churn(profile)),
    }
}

/// Round to two decimals, half away from zero on the value scaled by 100.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) const fn device_contribution(device: DeviceType) -> f64 {
    match device {
        DeviceType::Ios => 0.9,
        DeviceType::Android => 0.4,
        DeviceType::Web => 0.6,
    }
}

pub(crate) const fn city_contribution(tier: CityTier) -> f64 {
    match tier {
        CityTier::Tier1 => 0.9,
        CityTier::Tier2 => 0.6,
        CityTier::Tier3 => 0.3,
    }
}

fn intent(profile: &UserProfile) -> f64 {
    let mut score = 0.0;
    if profile.mock_tests_taken > MOCK_TEST_THRESHOLD {
        score += MOCK_TEST_WEIGHT;
    }
    if profile.added_to_cart {
        score += CART_WEIGHT;
    }
    if profile.page_visits > PAGE_VISIT_THRESHOLD {
        score += PAGE_VISIT_WEIGHT;
    }
    score
}

// Two-signal average of device and city contributions.
fn affordability(profile: &UserProfile) -> f64 {
    (device_contribution(profile.device_type) + city_contribution(profile.city_tier)) / 2.0
}

fn churn(profile: &UserProfile) -> f64 {
    let mut score = 0.0;
    if profile.is_uninstalled {
        score += UNINSTALL_WEIGHT;
    }
    if profile.last_active_days > INACTIVITY_THRESHOLD_DAYS {
        score += INACTIVITY_WEIGHT;
    }
    if profile.competitor_signal {
        score += COMPETITOR_WEIGHT;
    }
    score
}
