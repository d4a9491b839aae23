use metrics_exporter_prometheus::PrometheusHandle;
use smart_pricing::config::AppConfig;
use smart_pricing::error::AppError;
use smart_pricing::workflows::pricing::profiles::generate_profiles;
use smart_pricing::workflows::pricing::service::rng_from_seed;
use smart_pricing::workflows::pricing::{
    CityTier, DeviceType, Narrator, PricingService, ProfileImporter, ProfileSet, UserProfile,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Size of the synthetic population loaded when no profile file is given.
pub(crate) const DEMO_POPULATION: usize = 15;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Profiles from `path` when given, otherwise a freshly generated demo set.
pub(crate) fn load_profiles(
    path: Option<&Path>,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<UserProfile>, AppError> {
    match path {
        Some(path) => Ok(ProfileImporter::from_path(path)?),
        None => Ok(generate_profiles(count, &mut rng_from_seed(seed))),
    }
}

pub(crate) fn build_service(config: &AppConfig, profiles: Vec<UserProfile>) -> PricingService {
    PricingService::new(
        ProfileSet::new(profiles),
        Narrator::from_config(&config.narrative),
        config.pricing.base_price,
    )
}

pub(crate) fn parse_device(raw: &str) -> Result<DeviceType, String> {
    raw.parse()
}

pub(crate) fn parse_city_tier(raw: &str) -> Result<CityTier, String> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a city tier ({err})"))?;
    CityTier::try_from(value).map_err(|err| err.to_string())
}

/// User cap for a simulation run. The first user is processed before any
/// check can stop the run, so zero is refused up front.
pub(crate) fn parse_limit(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(err) => Err(format!("failed to parse '{raw}' as a user limit ({err})")),
    }
}
