mod pomcp;
mod random;
mod threshold;

pub use pomcp::PomcpPolicy;
pub use random::RandomPolicy;
pub use threshold::ThresholdPolicy;

use crate::pomcp::{ConfigError, DecisionContext, PlannerError, PomcpConfig, SearchBudget};
use blackjack_core::{Action, Observation, SampledWorld};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SIMULATIONS: usize = 1_000;

/// Mutable state one agent carries through a single round.
///
/// The orchestrator hands every agent a fresh context when a round starts and
/// drops it when the round ends.
#[derive(Debug, Default)]
pub struct RoundContext {
    search: DecisionContext<Action, SampledWorld>,
}

impl RoundContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &DecisionContext<Action, SampledWorld> {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut DecisionContext<Action, SampledWorld> {
        &mut self.search
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    #[error("no legal actions remain for this seat")]
    NoLegalActions,
    #[error("invalid planner configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<PlannerError> for PolicyError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::NoLegalActions => PolicyError::NoLegalActions,
        }
    }
}

/// One decision per call: observation and round context in, action out.
pub trait Policy: Send {
    fn name(&self) -> &str;

    fn decide(
        &mut self,
        observation: &Observation,
        ctx: &mut RoundContext,
    ) -> Result<Action, PolicyError>;
}

/// The closed set of agents a table can seat.
pub enum AgentPolicy {
    Random(RandomPolicy),
    Threshold(ThresholdPolicy),
    Pomcp(Box<PomcpPolicy>),
}

impl AgentPolicy {
    pub fn as_pomcp(&self) -> Option<&PomcpPolicy> {
        match self {
            AgentPolicy::Pomcp(policy) => Some(policy.as_ref()),
            _ => None,
        }
    }
}

impl Policy for AgentPolicy {
    fn name(&self) -> &str {
        match self {
            AgentPolicy::Random(policy) => policy.name(),
            AgentPolicy::Threshold(policy) => policy.name(),
            AgentPolicy::Pomcp(policy) => policy.name(),
        }
    }

    fn decide(
        &mut self,
        observation: &Observation,
        ctx: &mut RoundContext,
    ) -> Result<Action, PolicyError> {
        match self {
            AgentPolicy::Random(policy) => policy.decide(observation, ctx),
            AgentPolicy::Threshold(policy) => policy.decide(observation, ctx),
            AgentPolicy::Pomcp(policy) => policy.decide(observation, ctx),
        }
    }
}

/// Serializable description of an agent, as written in run configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicySpec {
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
    Threshold {
        #[serde(default = "default_target")]
        target: u8,
        #[serde(default)]
        hit_soft: bool,
    },
    Pomcp {
        #[serde(default)]
        planner: PomcpConfig,
        #[serde(default = "default_simulations")]
        simulations: usize,
        /// Replaces the simulation count with a wall-clock limit when set.
        #[serde(default)]
        time_limit_ms: Option<u64>,
    },
}

impl PolicySpec {
    /// Builds the agent. `seed` applies when the description carries none of its own.
    pub fn build(&self, seed: Option<u64>) -> Result<AgentPolicy, PolicyError> {
        let policy = match self {
            PolicySpec::Random { seed: own } => AgentPolicy::Random(RandomPolicy::new(own.or(seed))),
            PolicySpec::Threshold { target, hit_soft } => {
                let mut policy = ThresholdPolicy::new(*target);
                if *hit_soft {
                    policy = policy.hitting_soft();
                }
                AgentPolicy::Threshold(policy)
            }
            PolicySpec::Pomcp {
                planner,
                simulations,
                time_limit_ms,
            } => {
                let mut config = *planner;
                config.seed = config.seed.or(seed);
                let budget = match time_limit_ms {
                    Some(ms) => SearchBudget::TimeLimit(Duration::from_millis(*ms)),
                    None => SearchBudget::Simulations(*simulations),
                };
                AgentPolicy::Pomcp(Box::new(PomcpPolicy::new(config, budget)?))
            }
        };
        Ok(policy)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PolicySpec::Random { .. } => "random",
            PolicySpec::Threshold { .. } => "threshold",
            PolicySpec::Pomcp { .. } => "pomcp",
        }
    }
}

fn default_target() -> u8 {
    17
}

fn default_simulations() -> usize {
    DEFAULT_SIMULATIONS
}
