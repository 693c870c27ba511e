//! Unweighted particle approximation of the belief at a history node.

use super::traits::{Observable, Particle};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct BeliefSet<P> {
    particles: Vec<P>,
}

impl<P> Default for BeliefSet<P> {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
        }
    }
}

impl<P: Particle> BeliefSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `count` independent hidden-information completions of `observation`.
    pub fn seed<O, R>(observation: &O, count: usize, rng: &mut R) -> Self
    where
        O: Observable<Particle = P>,
        R: Rng + ?Sized,
    {
        let mut belief = Self::new();
        belief.reinvigorate(observation, count, rng);
        belief
    }

    /// Adds `count` fresh particles drawn the same way [`BeliefSet::seed`] does.
    pub fn reinvigorate<O, R>(&mut self, observation: &O, count: usize, rng: &mut R)
    where
        O: Observable<Particle = P>,
        R: Rng + ?Sized,
    {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(observation.sample_particle(rng));
        }
    }

    /// Drops particles the observation rules out.
    pub fn retain_consistent<O>(&mut self, observation: &O)
    where
        O: Observable<Particle = P>,
    {
        self.particles
            .retain(|particle| observation.is_consistent(particle));
    }

    pub fn insert(&mut self, particle: P) {
        self.particles.push(particle);
    }

    /// Uniform draw; `None` only when the set is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&P> {
        if self.particles.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.particles.len());
        self.particles.get(index)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[P] {
        &self.particles
    }
}
