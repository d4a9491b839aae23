use crate::infra::{
    build_service, load_profiles, parse_city_tier, parse_device, parse_limit, DEMO_POPULATION,
};
use chrono::SecondsFormat;
use clap::{Args, ValueEnum};
use smart_pricing::config::AppConfig;
use smart_pricing::error::AppError;
use smart_pricing::telemetry;
use smart_pricing::workflows::pricing::profiles::{export_template_csv, export_template_json};
use smart_pricing::workflows::pricing::service::rng_from_seed;
use smart_pricing::workflows::pricing::{
    analyze_user, BatchSimulator, CityTier, DeviceType, InsightView, PricingDecision, RunStatus,
    SimulationProgress, SimulationReport, UserProfile,
};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Full profile as a JSON object; overrides the individual signal flags
    #[arg(long)]
    pub(crate) profile_json: Option<String>,
    #[arg(long, default_value = "cli-user")]
    pub(crate) id: String,
    #[arg(long, default_value_t = 0)]
    pub(crate) mock_tests: u32,
    #[arg(long)]
    pub(crate) added_to_cart: bool,
    #[arg(long, default_value_t = 0)]
    pub(crate) page_visits: u32,
    /// iOS, Android or Web
    #[arg(long, default_value = "Android", value_parser = parse_device)]
    pub(crate) device: DeviceType,
    /// 1 (metro), 2 or 3 (rural)
    #[arg(long, default_value = "2", value_parser = parse_city_tier)]
    pub(crate) city_tier: CityTier,
    #[arg(long)]
    pub(crate) uninstalled: bool,
    #[arg(long, default_value_t = 0)]
    pub(crate) last_active_days: u32,
    #[arg(long)]
    pub(crate) competitor_signal: bool,
    /// Ask the narrative service to explain the decision
    #[arg(long)]
    pub(crate) insight: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Number of synthetic profiles to generate when no input file is given
    #[arg(long, default_value_t = DEMO_POPULATION)]
    pub(crate) count: usize,
    /// Seed for profile generation and conversion draws
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// JSON or CSV profile file to simulate instead of a generated set
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Delay between users in milliseconds (defaults to PRICING_TICK_MS)
    #[arg(long)]
    pub(crate) tick_ms: Option<u64>,
    /// Stop after this many users
    #[arg(long, value_parser = parse_limit)]
    pub(crate) limit: Option<usize>,
    /// Request an executive summary from the narrative service
    #[arg(long)]
    pub(crate) summary: bool,
    /// Print the full run report as JSON instead of a live table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TemplateArgs {
    #[arg(long, value_enum, default_value_t = TemplateFormat::Json)]
    pub(crate) format: TemplateFormat,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum TemplateFormat {
    Json,
    Csv,
}

impl AnalyzeArgs {
    fn into_profile(self) -> Result<(UserProfile, bool), AppError> {
        let insight = self.insight;
        if let Some(raw) = self.profile_json {
            let profile: UserProfile = serde_json::from_str(&raw)?;
            return Ok((profile, insight));
        }

        let profile = UserProfile {
            id: self.id,
            name: None,
            mock_tests_taken: self.mock_tests,
            added_to_cart: self.added_to_cart,
            page_visits: self.page_visits,
            device_type: self.device,
            city_tier: self.city_tier,
            is_uninstalled: self.uninstalled,
            last_active_days: self.last_active_days,
            competitor_signal: self.competitor_signal,
            install_source: None,
        };
        Ok((profile, insight))
    }
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let (profile, insight) = args.into_profile()?;

    if !insight {
        render_decision(&profile, &analyze_user(&profile));
        return Ok(());
    }

    let config = load_command_config()?;
    let service = build_service(&config, Vec::new());
    let InsightView { decision, insight } = service.insight(&profile).await;
    render_decision(&profile, &decision);
    println!("\nInsight: {insight}");
    Ok(())
}

pub(crate) async fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        count,
        seed,
        input,
        tick_ms,
        limit,
        summary,
        json,
    } = args;

    let config = load_command_config()?;
    let profiles = load_profiles(input.as_deref(), count, seed)?;
    let tick = match tick_ms {
        Some(ms) => Duration::from_millis(ms),
        None if json => Duration::ZERO,
        None => config.pricing.tick,
    };

    // Generation and conversion draws share the seed but not the stream.
    let rng = rng_from_seed(seed.map(|seed| seed.wrapping_add(1)));
    let mut simulator = BatchSimulator::with_base_price(profiles, rng, config.pricing.base_price);

    if !json {
        println!(
            "Simulating {} users at base price {:.0}",
            simulator.total(),
            config.pricing.base_price
        );
        println!(
            "{:>4}  {:<8} {:<8} {:<6} {:>8}  {:<9} Reason",
            "%", "User", "Device", "Tier", "Discount", "Outcome"
        );
    }

    let status = simulator
        .run_paced(tick, |progress| {
            if !json {
                render_progress(&progress);
            }
            match limit {
                Some(limit) if progress.processed >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        })
        .await;
    let report = simulator.into_report(status);

    let narrative = if summary {
        let service = build_service(&config, Vec::new());
        Some(service.strategy_summary(&report.summary).await)
    } else {
        None
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    if let Some(narrative) = narrative {
        println!("\nExecutive summary: {narrative}");
    }
    Ok(())
}

/// Configuration plus log output for one-shot commands that touch the
/// simulator or the narrative service.
fn load_command_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_template(args: TemplateArgs) -> Result<(), AppError> {
    let document = match args.format {
        TemplateFormat::Json => export_template_json()?,
        TemplateFormat::Csv => export_template_csv()?,
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, document)?;
            println!("Template written to {}", path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}

fn render_decision(profile: &UserProfile, decision: &PricingDecision) {
    println!(
        "Profile {} ({} / {})",
        profile.id,
        profile.device_type,
        profile.city_tier.label()
    );
    println!(
        "- Scores: intent {:.2} | affordability {:.2} | churn {:.2}",
        decision.scores.intent_score,
        decision.scores.affordability_score,
        decision.scores.churn_score
    );
    println!("- Discount: {}%", decision.discount);
    println!("- Reason: {}", decision.reason);
}

fn render_progress(progress: &SimulationProgress<'_>) {
    let result = progress.latest;
    println!(
        "{:>3}%  {:<8} {:<8} {:<6} {:>7}%  {:<9} {}",
        progress.percent(),
        result.profile.id,
        result.profile.device_type.label(),
        format!("T{}", result.profile.city_tier.number()),
        result.decision.discount,
        if result.converted { "converted" } else { "dropped" },
        result.decision.reason
    );
}

fn render_report(report: &SimulationReport) {
    let summary = &report.summary;
    let label = match report.status {
        RunStatus::Completed => "completed",
        RunStatus::Aborted => "stopped early",
    };
    println!(
        "\nSimulation {label} at {}",
        report
            .finished_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!(
        "- {} users | {} converted | {:.1}% conversion",
        summary.total, summary.converted, summary.conversion_rate
    );
    println!("- Average discount {}%", summary.avg_discount);
    println!(
        "- Estimated revenue {:.0} ({:+.1}% vs list price)",
        summary.revenue, summary.revenue_uplift
    );
    let elapsed = report.finished_at - report.started_at;
    println!("- Elapsed {} ms", elapsed.num_milliseconds());
}
