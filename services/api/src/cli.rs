use crate::commands::{
    run_analyze, run_simulate, run_template, AnalyzeArgs, SimulateArgs, TemplateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use smart_pricing::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Smart Pricing Engine",
    about = "Score learners, pick discounts and simulate conversion from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single profile and print the discount decision
    Analyze(AnalyzeArgs),
    /// Run a batch conversion simulation over generated or imported profiles
    Simulate(SimulateArgs),
    /// Print a sample profile file to edit and import
    Template(TemplateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload profiles from a JSON or CSV file instead of generating a demo set
    #[arg(long)]
    pub(crate) profiles: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Simulate(args) => run_simulate(args).await,
        Command::Template(args) => run_template(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["smart-pricing-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn simulate_flags_parse() {
        let cli = Cli::try_parse_from([
            "smart-pricing-api",
            "simulate",
            "--count",
            "40",
            "--seed",
            "7",
            "--tick-ms",
            "0",
            "--limit",
            "10",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Simulate(args)) => {
                assert_eq!(args.count, 40);
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.tick_ms, Some(0));
                assert_eq!(args.limit, Some(10));
                assert!(!args.summary);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn simulate_rejects_zero_limit() {
        let result = Cli::try_parse_from(["smart-pricing-api", "simulate", "--limit", "0"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["smart-pricing-api", "simulate", "--limit", "1"])
            .expect("parses");
        match cli.command {
            Some(Command::Simulate(args)) => assert_eq!(args.limit, Some(1)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn analyze_rejects_unknown_city_tier() {
        let result = Cli::try_parse_from(["smart-pricing-api", "analyze", "--city-tier", "5"]);
        assert!(result.is_err());
    }
}
