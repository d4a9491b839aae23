//! Behavioral discount engine: scoring, the ordered discount policy, batch
//! conversion simulation, and the profile sources and narrative hooks that
//! surround them.

pub mod domain;
mod engine;
pub mod narrative;
mod policy;
pub mod profiles;
pub mod router;
mod scoring;
pub mod service;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use domain::{
    BatchResult, CityTier, DeviceType, DiscountTier, InstallSource, InvalidCityTier,
    PricingDecision, UserProfile, UserScores,
};
pub use engine::{analyze_all, analyze_user};
pub use narrative::{NarrativeError, NarrativeGenerator, Narrator, StrategyMetrics};
pub use policy::decide_discount;
pub use profiles::{ProfileImportError, ProfileImporter, ProfileSet};
pub use router::pricing_router;
pub use scoring::{calculate_scores, round_to_hundredths};
pub use service::{InsightView, PricingService};
pub use simulation::{
    BatchSimulator, RunStatus, SimulationProgress, SimulationReport, SimulationStats,
    SimulationSummary, DEFAULT_BASE_PRICE,
};
