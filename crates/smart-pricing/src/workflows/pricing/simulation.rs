use super::domain::{BatchResult, PricingDecision, UserProfile};
use super::engine::analyze_user;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// List price a discount is applied against when estimating revenue.
pub const DEFAULT_BASE_PRICE: f64 = 1000.0;

const BASE_CONVERSION: f64 = 0.10;
const DEEP_DISCOUNT_FLOOR: u8 = 70;
const DEEP_DISCOUNT_LIFT: f64 = 0.50;
const DISCOUNT_FLOOR: u8 = 45;
const DISCOUNT_LIFT: f64 = 0.30;
const INTENT_FLOOR: f64 = 0.5;
const INTENT_LIFT: f64 = 0.30;

/// Modeled purchase probability for a decision. Values above 1.0 are kept as-is.
pub fn conversion_probability(decision: &PricingDecision) -> f64 {
    probability_at(decision.discount, decision.scores.intent_score)
}

/// Purchase probability for the same user had they been offered the list price.
pub fn standard_conversion_probability(decision: &PricingDecision) -> f64 {
    probability_at(0, decision.scores.intent_score)
}

fn probability_at(discount: u8, intent_score: f64) -> f64 {
    let mut probability = BASE_CONVERSION;
    if discount >= DEEP_DISCOUNT_FLOOR {
        probability += DEEP_DISCOUNT_LIFT;
    } else if discount >= DISCOUNT_FLOOR {
        probability += DISCOUNT_LIFT;
    }
    if intent_score > INTENT_FLOOR {
        probability += INTENT_LIFT;
    }
    probability
}

/// Draw a uniform value in `[0, 1)` and compare it against the modeled probability.
pub fn simulate_conversion<R: Rng + ?Sized>(decision: &PricingDecision, rng: &mut R) -> bool {
    let draw: f64 = rng.gen();
    draw < conversion_probability(decision)
}

/// Price paid after the discount is applied.
pub fn net_price(base_price: f64, discount: u8) -> f64 {
    base_price * f64::from(100u8.saturating_sub(discount)) / 100.0
}

/// Running aggregate over simulated results.
///
/// The accumulator only ever grows, so the figures it reports are valid for
/// whatever prefix of the batch has been recorded so far.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationStats {
    base_price: f64,
    total: usize,
    converted: usize,
    discount_total: u64,
    revenue: f64,
    baseline_revenue: f64,
}

impl SimulationStats {
    pub fn new(base_price: f64) -> Self {
        Self {
            base_price,
            total: 0,
            converted: 0,
            discount_total: 0,
            revenue: 0.0,
            baseline_revenue: 0.0,
        }
    }

    /// Rebuild the aggregate from an arbitrary slice of results.
    pub fn from_results<'a, I>(results: I, base_price: f64) -> Self
    where
        I: IntoIterator<Item = &'a BatchResult>,
    {
        let mut stats = Self::new(base_price);
        for result in results {
            stats.record(result);
        }
        stats
    }

    pub fn record(&mut self, result: &BatchResult) {
        self.total += 1;
        self.discount_total += u64::from(result.decision.discount);
        self.baseline_revenue +=
            self.base_price * standard_conversion_probability(&result.decision);
        if result.converted {
            self.converted += 1;
            self.revenue += net_price(self.base_price, result.decision.discount);
        }
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn converted(&self) -> usize {
        self.converted
    }

    /// Converted share as a percentage rounded to one decimal place.
    pub fn conversion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let rate = self.converted as f64 / self.total as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }

    /// Mean discount rounded to the nearest whole percent.
    pub fn avg_discount(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.discount_total as f64 / self.total as f64).round() as u32
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    /// Expected revenue had every recorded user been offered the list price.
    pub fn baseline_revenue(&self) -> f64 {
        self.baseline_revenue
    }

    /// Revenue change against the list-price baseline, as a percentage rounded to one decimal.
    pub fn revenue_uplift(&self) -> f64 {
        if self.baseline_revenue <= 0.0 {
            return 0.0;
        }
        let uplift = (self.revenue - self.baseline_revenue) / self.baseline_revenue * 100.0;
        (uplift * 10.0).round() / 10.0
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            total: self.total,
            converted: self.converted,
            conversion_rate: self.conversion_rate(),
            avg_discount: self.avg_discount(),
            revenue: self.revenue,
            baseline_revenue: self.baseline_revenue,
            revenue_uplift: self.revenue_uplift(),
            base_price: self.base_price,
        }
    }
}

impl Default for SimulationStats {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PRICE)
    }
}

/// Serializable snapshot of [`SimulationStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total: usize,
    pub converted: usize,
    pub conversion_rate: f64,
    pub avg_discount: u32,
    pub revenue: f64,
    pub baseline_revenue: f64,
    pub revenue_uplift: f64,
    pub base_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Aborted,
}

/// View handed to progress observers after each processed user.
#[derive(Debug, Clone, Copy)]
pub struct SimulationProgress<'a> {
    pub processed: usize,
    pub total: usize,
    pub latest: &'a BatchResult,
    pub stats: &'a SimulationStats,
}

impl SimulationProgress<'_> {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.processed as f64 / self.total as f64 * 100.0).round() as u8
    }
}

/// Completed (or aborted) simulation with its results and aggregate figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: SimulationSummary,
    pub results: Vec<BatchResult>,
}

/// Sequential batch runner. Owns the result list and the accumulator for one run.
pub struct BatchSimulator<R> {
    profiles: Vec<UserProfile>,
    results: Vec<BatchResult>,
    stats: SimulationStats,
    rng: R,
    started_at: DateTime<Utc>,
}

impl<R: Rng> BatchSimulator<R> {
    pub fn new(profiles: Vec<UserProfile>, rng: R) -> Self {
        Self::with_base_price(profiles, rng, DEFAULT_BASE_PRICE)
    }

    pub fn with_base_price(profiles: Vec<UserProfile>, rng: R, base_price: f64) -> Self {
        let capacity = profiles.len();
        Self {
            profiles,
            results: Vec::with_capacity(capacity),
            stats: SimulationStats::new(base_price),
            rng,
            started_at: Utc::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.profiles.len()
    }

    pub fn processed(&self) -> usize {
        self.results.len()
    }

    pub fn is_finished(&self) -> bool {
        self.results.len() >= self.profiles.len()
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Progress after the most recent step, or `None` before the first one.
    pub fn progress(&self) -> Option<SimulationProgress<'_>> {
        self.results.last().map(|latest| SimulationProgress {
            processed: self.results.len(),
            total: self.profiles.len(),
            latest,
            stats: &self.stats,
        })
    }

    /// Process the next profile in input order.
    pub fn step(&mut self) -> Option<&BatchResult> {
        let profile = self.profiles.get(self.results.len())?.clone();
        let decision = analyze_user(&profile);
        let converted = simulate_conversion(&decision, &mut self.rng);
        debug!(
            user_id = %profile.id,
            discount = decision.discount,
            converted,
            "simulated user"
        );

        let result = BatchResult {
            profile,
            decision,
            converted,
        };
        self.stats.record(&result);
        self.results.push(result);
        self.results.last()
    }

    /// Process every remaining profile.
    pub fn run(&mut self) -> RunStatus {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    /// Process remaining profiles, letting the observer stop the run between steps.
    pub fn run_with<F>(&mut self, mut observer: F) -> RunStatus
    where
        F: FnMut(SimulationProgress<'_>) -> ControlFlow<()>,
    {
        self.log_start();
        while self.step().is_some() {
            if let Some(progress) = self.progress() {
                if observer(progress).is_break() {
                    break;
                }
            }
        }
        self.finish_status()
    }

    /// Like [`run_with`](Self::run_with) but waits `tick` before every step.
    pub async fn run_paced<F>(&mut self, tick: Duration, mut observer: F) -> RunStatus
    where
        F: FnMut(SimulationProgress<'_>) -> ControlFlow<()>,
    {
        if tick.is_zero() {
            return self.run_with(observer);
        }

        self.log_start();
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if self.step().is_none() {
                break;
            }
            if let Some(progress) = self.progress() {
                if observer(progress).is_break() {
                    break;
                }
            }
        }
        self.finish_status()
    }

    pub fn into_report(self, status: RunStatus) -> SimulationReport {
        SimulationReport {
            status,
            started_at: self.started_at,
            finished_at: Utc::now(),
            summary: self.stats.summary(),
            results: self.results,
        }
    }

    fn log_start(&self) {
        info!(
            total = self.profiles.len(),
            resumed_at = self.results.len(),
            "starting batch simulation"
        );
    }

    fn finish_status(&self) -> RunStatus {
        let status = if self.is_finished() {
            RunStatus::Completed
        } else {
            RunStatus::Aborted
        };
        info!(
            ?status,
            processed = self.stats.total(),
            converted = self.stats.converted(),
            conversion_rate = self.stats.conversion_rate(),
            "batch simulation finished"
        );
        status
    }
}
