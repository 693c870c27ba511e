use super::{Policy, PolicyError, RoundContext, ThresholdPolicy};
use crate::pomcp::{ConfigError, Pomcp, PomcpConfig, SearchBudget, SearchReport};
use blackjack_core::{Action, Observation, SampledWorld};

/// Planner-backed agent: every decision runs a fresh search budget and keeps
/// the chosen subtree in the round context.
pub struct PomcpPolicy {
    planner: Pomcp<SampledWorld, ThresholdPolicy>,
    budget: SearchBudget,
}

impl PomcpPolicy {
    pub fn new(config: PomcpConfig, budget: SearchBudget) -> Result<Self, ConfigError> {
        Self::with_rollout(config, ThresholdPolicy::default(), budget)
    }

    pub fn with_rollout(
        config: PomcpConfig,
        rollout: ThresholdPolicy,
        budget: SearchBudget,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            planner: Pomcp::new(config, rollout)?,
            budget,
        })
    }

    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    pub fn last_report(&self) -> Option<&SearchReport<Action>> {
        self.planner.last_report()
    }
}

impl Policy for PomcpPolicy {
    fn name(&self) -> &str {
        "pomcp"
    }

    fn decide(
        &mut self,
        observation: &Observation,
        ctx: &mut RoundContext,
    ) -> Result<Action, PolicyError> {
        let action = self
            .planner
            .decide(observation, ctx.search_mut(), self.budget)?;
        Ok(action)
    }
}
