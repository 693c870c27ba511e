use super::{Policy, PolicyError, RoundContext};
use crate::pomcp::RolloutPolicy;
use blackjack_core::{Action, HandValue, Observation, SampledWorld};

const DEFAULT_TARGET: u8 = 17;

/// Dealer-style rule: keep drawing until the hand total reaches `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    target: u8,
    hit_soft: bool,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

impl ThresholdPolicy {
    pub fn new(target: u8) -> Self {
        Self {
            target,
            hit_soft: false,
        }
    }

    /// Also draw on a soft total equal to the target.
    pub fn hitting_soft(mut self) -> Self {
        self.hit_soft = true;
        self
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn choose(&self, value: HandValue) -> Action {
        let total = value.total();
        if total < self.target || (self.hit_soft && value.is_soft() && total == self.target) {
            Action::Hit
        } else {
            Action::Stand
        }
    }
}

impl Policy for ThresholdPolicy {
    fn name(&self) -> &str {
        "threshold"
    }

    fn decide(
        &mut self,
        observation: &Observation,
        _ctx: &mut RoundContext,
    ) -> Result<Action, PolicyError> {
        if observation.is_terminal() {
            return Err(PolicyError::NoLegalActions);
        }
        Ok(self.choose(observation.value()))
    }
}

impl RolloutPolicy<SampledWorld> for ThresholdPolicy {
    fn rollout_action(&self, particle: &SampledWorld) -> Action {
        self.choose(particle.value())
    }
}
