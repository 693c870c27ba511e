mod seating;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use blackjack_bot::{AgentPolicy, Policy, PolicyError, PolicySpec, RoundContext, ThresholdPolicy};
use blackjack_core::{Observation, RoundError, RoundOutcome, RoundState, Seat, Table};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs};
use crate::telemetry::{
    TelemetryError, TelemetryOutputs, append_highlights_to_markdown, write_summary_outputs,
};

pub use seating::agent_seeds;

/// Primary entry point for orchestrating a run of rounds at one table.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub rounds_played: usize,
    pub rows_written: usize,
    pub reshuffles: u64,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub telemetry_outputs: Option<TelemetryOutputs>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Play every configured round, streaming one JSONL row per seat and round.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let base_seed = self.config.table.seed.unwrap_or(0);
        let mut table = Table::with_seed(self.config.table.rules, base_seed)
            .map_err(|err| RunnerError::Rules(format!("{err:?}")))?;
        let mut seats = self
            .agents
            .iter()
            .zip(agent_seeds(base_seed, self.agents.len()))
            .map(|(agent, seed)| SeatState::new(agent, seed))
            .collect::<Result<Vec<_>, _>>()?;
        let mut dealer = ThresholdPolicy::new(self.config.table.dealer_target);
        let mut analytics = AnalyticsCollector::new(&self.config);
        let mut rows_written = 0usize;

        for round_index in 0..self.config.table.rounds {
            let outcome = self.play_round(round_index, &mut table, &mut seats, &mut dealer)?;
            analytics.record_round(&outcome)?;
            rows_written += write_round_rows(&mut writer, &self.config, round_index, &outcome)?;
        }

        writer.flush()?;

        let summary = analytics.finalize(table.reshuffles());
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_dir = self
            .outputs
            .summary_md
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let telemetry_path = if self.logging_enabled {
            Some(telemetry_dir.join("telemetry.jsonl"))
        } else {
            None
        };

        let telemetry_outputs = if let Some(path) = telemetry_path.as_ref() {
            write_summary_outputs(path, &telemetry_dir)?
        } else {
            None
        };

        if let Some(outputs) = telemetry_outputs.as_ref() {
            append_highlights_to_markdown(&self.outputs.summary_md, outputs)?;
        }

        Ok(RunSummary {
            rounds_played: self.config.table.rounds,
            rows_written,
            reshuffles: table.reshuffles(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            telemetry_outputs,
        })
    }

    fn play_round(
        &self,
        round_index: usize,
        table: &mut Table,
        seats: &mut [SeatState],
        dealer: &mut ThresholdPolicy,
    ) -> Result<RoundResult, RunnerError> {
        let mut round = table.deal(seats.len())?;

        for (index, seat_state) in seats.iter_mut().enumerate() {
            let seat = seat_at(index)?;
            let mut ctx = RoundContext::new();
            let mut metrics = DecisionMetrics::default();

            while !round.legal_actions(seat).is_empty() {
                let observation = Observation::new(&round, seat);
                let start = Instant::now();
                let action = seat_state
                    .policy
                    .decide(&observation, &mut ctx)
                    .map_err(|source| RunnerError::Decision {
                        agent: seat_state.agent_name.clone(),
                        source,
                    })?;
                let elapsed_ms = metrics.record(start.elapsed());

                if self.logging_enabled && tracing::enabled!(Level::INFO) {
                    event!(
                        target: "blackjack_bench::decision",
                        Level::INFO,
                        run_id = %self.config.run_id,
                        round_index = round_index as u32,
                        seat = %seat,
                        agent = %seat_state.agent_name,
                        total = observation.value().total(),
                        upcard = %format_cards(observation.dealer_cards()),
                        action = action.as_str(),
                        elapsed_ms
                    );
                }

                table.apply(&mut round, seat, action)?;
            }

            seat_state.last_metrics = metrics.finalize();
        }

        let dealer_seat = round.dealer();
        let mut dealer_ctx = RoundContext::new();
        while !round.legal_actions(dealer_seat).is_empty() {
            let observation = Observation::new(&round, dealer_seat);
            let action = dealer
                .decide(&observation, &mut dealer_ctx)
                .map_err(|source| RunnerError::Decision {
                    agent: "dealer".to_string(),
                    source,
                })?;
            table.apply(&mut round, dealer_seat, action)?;
        }

        let result = RoundResult::collect(&round, seats)?;
        table.collect(round);
        Ok(result)
    }
}

fn seat_at(index: usize) -> Result<Seat, RunnerError> {
    Seat::from_index(index)
        .ok_or_else(|| RunnerError::game(format!("invalid seat index generated: {index}")))
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn format_cards(cards: &[blackjack_core::Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn write_round_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    round_index: usize,
    outcome: &RoundResult,
) -> Result<usize, RunnerError> {
    let round_id = format!("R{round_index:06}");

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = RoundLogRow {
            run_id: config.run_id.clone(),
            round_id: round_id.clone(),
            round_index,
            seat: seat_result.seat.to_string(),
            agent: seat_result.agent_name.clone(),
            cards: seat_result.cards.clone(),
            score: seat_result.score,
            dealer_cards: outcome.dealer_cards.clone(),
            dealer_score: outcome.dealer_score,
            outcome: seat_result.outcome,
            decisions: seat_result.metrics.decisions,
            speed_ms_decision: seat_result.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

struct SeatState {
    agent_name: String,
    policy: AgentPolicy,
    last_metrics: DecisionSummary,
}

impl SeatState {
    fn new(agent: &AgentBlueprint, seed: u64) -> Result<Self, RunnerError> {
        let policy = agent
            .spec
            .build(Some(seed))
            .map_err(|source| RunnerError::Decision {
                agent: agent.name.clone(),
                source,
            })?;
        Ok(Self {
            agent_name: agent.name.clone(),
            policy,
            last_metrics: DecisionSummary::default(),
        })
    }
}

/// Everything recorded about one finished round.
pub struct RoundResult {
    pub dealer_cards: Vec<String>,
    pub dealer_score: u8,
    pub seat_results: Vec<SeatResult>,
}

impl RoundResult {
    fn collect(round: &RoundState, seats: &[SeatState]) -> Result<Self, RunnerError> {
        let dealer = round.dealer();
        let mut seat_results = Vec::with_capacity(seats.len());
        for (index, seat_state) in seats.iter().enumerate() {
            let seat = seat_at(index)?;
            seat_results.push(SeatResult {
                agent_name: seat_state.agent_name.clone(),
                agent_kind: seat_state.policy.name().to_string(),
                seat,
                cards: round.hand(seat).iter().map(|c| c.to_string()).collect(),
                score: round.score(seat),
                outcome: round.outcome(seat),
                metrics: seat_state.last_metrics.clone(),
            });
        }

        Ok(Self {
            dealer_cards: round.hand(dealer).iter().map(|c| c.to_string()).collect(),
            dealer_score: round.score(dealer),
            seat_results,
        })
    }
}

pub struct SeatResult {
    pub agent_name: String,
    pub agent_kind: String,
    pub seat: Seat,
    pub cards: Vec<String>,
    pub score: u8,
    pub outcome: RoundOutcome,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Clone, Default)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct RoundLogRow {
    run_id: String,
    round_id: String,
    round_index: usize,
    seat: String,
    agent: String,
    cards: Vec<String>,
    score: u8,
    dealer_cards: Vec<String>,
    dealer_score: u8,
    outcome: RoundOutcome,
    decisions: u32,
    speed_ms_decision: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("agent '{agent}' failed to decide: {source}")]
    Decision {
        agent: String,
        #[source]
        source: PolicyError,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid table rules: {0}")]
    Rules(String),
    #[error("round execution failed: {message}")]
    Game { message: String },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("telemetry summarisation failed: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}

impl From<RoundError> for RunnerError {
    fn from(err: RoundError) -> Self {
        RunnerError::game(format!("{err:?}"))
    }
}

struct AgentBlueprint {
    name: String,
    spec: PolicySpec,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, RunnerError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, RunnerError> {
        // build once up front so bad planner settings fail before any round runs
        config
            .policy
            .build(Some(0))
            .map_err(|source| RunnerError::Decision {
                agent: config.name.clone(),
                source,
            })?;
        Ok(Self {
            name: config.name.clone(),
            spec: config.policy.clone(),
        })
    }
}
