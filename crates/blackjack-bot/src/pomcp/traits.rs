use rand::Rng;
use std::fmt::Debug;

/// A fully determined stand-in for the hidden environment state.
///
/// Stepping never mutates the particle; it yields a successor and the
/// immediate reward of the transition.
pub trait Particle: Clone {
    type Action: Copy + Eq + Debug;

    /// Legal actions in enumeration order; empty iff terminal.
    fn legal_actions(&self) -> Vec<Self::Action>;

    fn step<R: Rng + ?Sized>(&self, action: Self::Action, rng: &mut R) -> (Self, f64);
}

/// The acting agent's partial view of the environment.
pub trait Observable {
    type Particle: Particle;

    fn legal_actions(&self) -> Vec<<Self::Particle as Particle>::Action>;

    /// Draws one hidden-information completion consistent with this view.
    fn sample_particle<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Particle;

    /// Whether `particle` could be the true state behind this view.
    fn is_consistent(&self, particle: &Self::Particle) -> bool;
}

/// Fixed, non-learning policy used past the tree frontier.
pub trait RolloutPolicy<P: Particle> {
    /// Must be deterministic for a given particle.
    fn rollout_action(&self, particle: &P) -> P::Action;
}
