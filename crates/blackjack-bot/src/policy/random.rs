use super::{Policy, PolicyError, RoundContext};
use blackjack_core::{Action, Observation};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Uniform choice among the legal actions.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(
        &mut self,
        observation: &Observation,
        _ctx: &mut RoundContext,
    ) -> Result<Action, PolicyError> {
        observation
            .legal_actions()
            .choose(&mut self.rng)
            .copied()
            .ok_or(PolicyError::NoLegalActions)
    }
}
