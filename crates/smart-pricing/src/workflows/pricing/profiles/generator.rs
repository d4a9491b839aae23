use crate::workflows::pricing::domain::{CityTier, DeviceType, InstallSource, UserProfile};
use rand::Rng;

/// Synthesize a demo population with ids `U001`, `U002`, ...
pub fn generate_profiles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<UserProfile> {
    (1..=count)
        .map(|index| UserProfile {
            id: format!("U{index:03}"),
            name: Some(format!("User {index}")),
            mock_tests_taken: rng.gen_range(0..5),
            added_to_cart: rng.gen_bool(0.4),
            page_visits: rng.gen_range(0..8),
            device_type: if rng.gen_bool(0.5) {
                DeviceType::Android
            } else {
                DeviceType::Ios
            },
            city_tier: random_tier(rng),
            is_uninstalled: rng.gen_bool(0.3),
            last_active_days: rng.gen_range(0..60),
            competitor_signal: rng.gen_bool(0.2),
            install_source: Some(if rng.gen_bool(0.5) {
                InstallSource::Organic
            } else {
                InstallSource::Inorganic
            }),
        })
        .collect()
}

fn random_tier<R: Rng + ?Sized>(rng: &mut R) -> CityTier {
    if rng.gen_bool(0.3) {
        CityTier::Tier1
    } else if rng.gen_bool(0.6) {
        CityTier::Tier2
    } else {
        CityTier::Tier3
    }
}
