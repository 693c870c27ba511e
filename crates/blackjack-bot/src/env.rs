//! Binds the blackjack table to the planner contract.

use crate::pomcp::{Observable, Particle};
use blackjack_core::{Action, Observation, SampledWorld};
use rand::Rng;

impl Particle for SampledWorld {
    type Action = Action;

    fn legal_actions(&self) -> Vec<Action> {
        SampledWorld::legal_actions(self)
    }

    fn step<R: Rng + ?Sized>(&self, action: Action, rng: &mut R) -> (Self, f64) {
        match SampledWorld::step(self, action, rng) {
            Ok(outcome) => outcome,
            Err(err) => unreachable!("planner stepped {action} from an illegal position: {err:?}"),
        }
    }
}

impl Observable for Observation {
    type Particle = SampledWorld;

    fn legal_actions(&self) -> Vec<Action> {
        Observation::legal_actions(self)
    }

    fn sample_particle<R: Rng + ?Sized>(&self, rng: &mut R) -> SampledWorld {
        self.sample_world(rng)
    }

    fn is_consistent(&self, particle: &SampledWorld) -> bool {
        particle.seat() == self.seat() && particle.observe() == *self
    }
}
