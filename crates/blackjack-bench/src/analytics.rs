use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::tournament::{DecisionSummary, RoundResult};
use blackjack_core::RoundOutcome;

const CONFIDENCE_LEVEL: f64 = 0.95;
const FALLBACK_Z: f64 = 1.96;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
    latency_budget_ms: u64,
    n_decks: u16,
    dealer_target: u8,
    dealer_busts: u32,
    rounds: u32,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(
                    agent.name.clone(),
                    agent.policy.kind(),
                    config.metrics.latency_budget_ms,
                ),
            );
            order.push(agent.name.clone());
        }

        Self {
            agents,
            agent_order: order,
            latency_budget_ms: config.metrics.latency_budget_ms,
            n_decks: config.table.rules.n_decks,
            dealer_target: config.table.dealer_target,
            dealer_busts: 0,
            rounds: 0,
        }
    }

    pub fn record_round(&mut self, outcome: &RoundResult) -> Result<(), AnalyticsError> {
        self.rounds += 1;
        if outcome.dealer_score == 0 {
            self.dealer_busts += 1;
        }

        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_round(f64::from(seat.score), seat.outcome, &seat.metrics);
        }

        Ok(())
    }

    pub fn finalize(mut self, reshuffles: u64) -> AnalyticsSummary {
        let z = confidence_z();
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report(z));
            }
        }

        AnalyticsSummary {
            agents: reports,
            rounds: self.rounds as usize,
            n_decks: self.n_decks,
            dealer_target: self.dealer_target,
            dealer_bust_rate: ratio(self.dealer_busts, self.rounds),
            reshuffles,
            latency_budget_ms: self.latency_budget_ms,
        }
    }
}

struct AgentAccumulator {
    name: String,
    kind: &'static str,
    total_score: f64,
    rounds: u32,
    wins: u32,
    losses: u32,
    pushes: u32,
    busts: u32,
    total_latency_ms: f64,
    total_decisions: u64,
    latency_budget_ms: u64,
}

impl AgentAccumulator {
    fn new(name: String, kind: &'static str, latency_budget_ms: u64) -> Self {
        Self {
            name,
            kind,
            total_score: 0.0,
            rounds: 0,
            wins: 0,
            losses: 0,
            pushes: 0,
            busts: 0,
            total_latency_ms: 0.0,
            total_decisions: 0,
            latency_budget_ms,
        }
    }

    fn record_round(&mut self, score: f64, outcome: RoundOutcome, metrics: &DecisionSummary) {
        self.total_score += score;
        self.rounds += 1;
        match outcome {
            RoundOutcome::Win => self.wins += 1,
            RoundOutcome::Loss => self.losses += 1,
            RoundOutcome::Push => self.pushes += 1,
        }
        if score == 0.0 {
            self.busts += 1;
        }
        self.total_latency_ms += metrics.total_ms;
        self.total_decisions += u64::from(metrics.decisions);
    }

    fn into_report(self, z: f64) -> AgentReport {
        let avg_score = if self.rounds == 0 {
            0.0
        } else {
            self.total_score / f64::from(self.rounds)
        };

        let avg_latency = if self.total_decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.total_decisions as f64
        };

        AgentReport {
            name: self.name,
            kind: self.kind.to_string(),
            rounds: self.rounds as usize,
            wins: self.wins as usize,
            losses: self.losses as usize,
            pushes: self.pushes as usize,
            busts: self.busts as usize,
            win_rate: ratio(self.wins, self.rounds),
            loss_rate: ratio(self.losses, self.rounds),
            push_rate: ratio(self.pushes, self.rounds),
            avg_score,
            win_ci95: proportion_interval(self.wins, self.rounds, z),
            decisions: self.total_decisions,
            average_ms_per_decision: avg_latency,
            over_budget: avg_latency > self.latency_budget_ms as f64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub agents: Vec<AgentReport>,
    pub rounds: usize,
    pub n_decks: u16,
    pub dealer_target: u8,
    pub dealer_bust_rate: f64,
    pub reshuffles: u64,
    pub latency_budget_ms: u64,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.render_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }

    pub fn render_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Table Summary\n\n");
        rows.push_str(&format!(
            "Rounds: {} | Decks: {} | Dealer stands on {} | Dealer bust rate: {:.1}% | Reshuffles: {}\n\n",
            self.rounds,
            self.n_decks,
            self.dealer_target,
            self.dealer_bust_rate * 100.0,
            self.reshuffles
        ));
        rows.push_str(&format!(
            "Latency budget: {} ms average per decision\n\n",
            self.latency_budget_ms
        ));
        rows.push_str("| Agent | Kind | Rounds | Win % | Loss % | Push % | Bust % | Avg score | Win 95% CI | Avg ms/decision | Over Budget |\n");
        rows.push_str("|-------|------|--------|-------|--------|--------|--------|-----------|------------|-----------------|-------------|\n");

        for agent in &self.agents {
            let bust_rate = if agent.rounds == 0 {
                0.0
            } else {
                agent.busts as f64 / agent.rounds as f64
            };
            rows.push_str(&format!(
                "| {name} | {kind} | {rounds} | {win:.1}% | {loss:.1}% | {push:.1}% | {bust:.1}% | {avg:.3} | [{ci_low:.3}, {ci_high:.3}] | {latency:.2} | {over_budget} |\n",
                name = agent.name,
                kind = agent.kind,
                rounds = agent.rounds,
                win = agent.win_rate * 100.0,
                loss = agent.loss_rate * 100.0,
                push = agent.push_rate * 100.0,
                bust = bust_rate * 100.0,
                avg = agent.avg_score,
                ci_low = agent.win_ci95.0,
                ci_high = agent.win_ci95.1,
                latency = agent.average_ms_per_decision,
                over_budget = if agent.over_budget { "Yes" } else { "No" },
            ));
        }
        rows
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: String,
    pub rounds: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub busts: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub push_rate: f64,
    pub avg_score: f64,
    pub win_ci95: (f64, f64),
    pub decisions: u64,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub over_budget: bool,
}

fn ratio(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(total)
    }
}

/// Two-sided standard normal quantile for the configured confidence level.
fn confidence_z() -> f64 {
    Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
        .unwrap_or(FALLBACK_Z)
}

/// Normal-approximation interval for a win proportion, clamped to [0, 1].
fn proportion_interval(successes: u32, trials: u32, z: f64) -> (f64, f64) {
    if trials == 0 {
        return (0.0, 0.0);
    }
    let p = ratio(successes, trials);
    let margin = z * (p * (1.0 - p) / f64::from(trials)).sqrt();
    ((p - margin).max(0.0), (p + margin).min(1.0))
}
