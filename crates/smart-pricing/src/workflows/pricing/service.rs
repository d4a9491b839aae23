use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::domain::{PricingDecision, UserProfile};
use super::engine::analyze_user;
use super::narrative::{Narrator, StrategyMetrics};
use super::profiles::{generate_profiles, ProfileImportError, ProfileSet};
use super::simulation::{BatchSimulator, SimulationReport, SimulationSummary};

/// Decision plus the narrative explaining it.
#[derive(Debug, Clone, Serialize)]
pub struct InsightView {
    pub decision: PricingDecision,
    pub insight: String,
}

/// Service owning the loaded population and the optional narrator.
pub struct PricingService {
    profiles: Mutex<ProfileSet>,
    narrator: Narrator,
    base_price: f64,
}

/// Seeded RNG for reproducible runs, entropy-seeded otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl PricingService {
    pub fn new(profiles: ProfileSet, narrator: Narrator, base_price: f64) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            narrator,
            base_price,
        }
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub fn analyze(&self, profile: &UserProfile) -> PricingDecision {
        analyze_user(profile)
    }

    /// Snapshot of the loaded profiles.
    pub fn profiles(&self) -> Vec<UserProfile> {
        self.lock_profiles().profiles().to_vec()
    }

    pub fn profile_count(&self) -> usize {
        self.lock_profiles().len()
    }

    /// Replace the loaded set with an imported document. Rejections leave it untouched.
    pub fn import_value(&self, payload: Value) -> Result<usize, ProfileImportError> {
        self.lock_profiles().replace_from_value(payload)
    }

    pub fn import_json(&self, payload: &str) -> Result<usize, ProfileImportError> {
        self.lock_profiles().replace_from_json(payload)
    }

    /// Replace the loaded set with a synthetic population.
    pub fn generate(&self, count: usize, seed: Option<u64>) -> usize {
        let mut rng = rng_from_seed(seed);
        let profiles = generate_profiles(count, &mut rng);
        let loaded = self.lock_profiles().replace(profiles);
        info!(count = loaded, ?seed, "generated synthetic profiles");
        loaded
    }

    /// Run the conversion simulation over a snapshot of the loaded set.
    pub fn simulate(&self, seed: Option<u64>) -> SimulationReport {
        let profiles = self.profiles();
        let mut simulator =
            BatchSimulator::with_base_price(profiles, rng_from_seed(seed), self.base_price);
        let status = simulator.run();
        simulator.into_report(status)
    }

    pub async fn insight(&self, profile: &UserProfile) -> InsightView {
        let decision = analyze_user(profile);
        let insight = self.narrator.user_insight(profile, &decision).await;
        InsightView { decision, insight }
    }

    pub async fn strategy_summary(&self, summary: &SimulationSummary) -> String {
        self.narrator
            .strategy_summary(&StrategyMetrics::from(summary))
            .await
    }

    fn lock_profiles(&self) -> MutexGuard<'_, ProfileSet> {
        self.profiles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
