use std::path::PathBuf;

use clap::Parser;

use blackjack_bench::config::{BenchmarkConfig, ResolvedOutputs};
use blackjack_bench::logging::init_logging;
use blackjack_bench::tournament::TournamentRunner;

/// Table benchmarking harness for blackjack agents.
#[derive(Debug, Parser)]
#[command(
    name = "blackjack-bench",
    author,
    version,
    about = "Deterministic blackjack table harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds to play.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the RNG seed for the shoe and the agents.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of decks in the shoe.
    #[arg(long, value_name = "DECKS")]
    decks: Option<u16>,

    /// Exit after validating the configuration (no rounds are played).
    #[arg(long)]
    validate_only: bool,

    /// Write structured telemetry regardless of config.
    #[arg(long)]
    telemetry: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.table.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.table.seed = Some(seed);
    }

    if let Some(decks) = cli.decks {
        config.table.rules.n_decks = decks;
    }

    if cli.telemetry {
        config.logging.enable_structured = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let rounds = config.table.rounds;
    let decks = config.table.rules.n_decks;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({rounds} rounds, {decks}-deck shoe)",
        if agent_count == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = TournamentRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: table run skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} rounds, {} reshuffles → {} rows at {}",
        summary.rounds_played,
        summary.reshuffles,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }
    if let Some(outputs) = summary.telemetry_outputs.as_ref() {
        println!("Telemetry summary (JSON): {}", outputs.json_path.display());
        println!(
            "Telemetry summary (Markdown): {}",
            outputs.markdown_path.display()
        );
        let planner = &outputs.summary.planner;
        if let Some(avg_margin) = planner.avg_best_margin {
            println!(
                "  Planner searches: {} events, avg best-vs-next value {:.3}",
                planner.count, avg_margin
            );
        } else {
            println!("  Planner searches: {} events captured", planner.count);
        }
        if !outputs.summary.decisions.agent_counts.is_empty() {
            println!(
                "  Decisions per agent: {:?}",
                outputs.summary.decisions.agent_counts
            );
        }
    }

    Ok(())
}
