use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_DISCOUNT: f64 = 0.8;
const DEFAULT_EPSILON: f64 = 1e-7;
const DEFAULT_EXPLORATION: f64 = 7.0;
const DEFAULT_PARTICLES: usize = 128;
const DEFAULT_REINVIGORATION: usize = 16;

/// Tuning parameters of the planner, checked once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PomcpConfig {
    #[serde(default = "default_discount")]
    pub discount: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_exploration")]
    pub exploration: f64,
    #[serde(default = "default_particles")]
    pub n_particles: usize,
    #[serde(default = "default_reinvigoration")]
    pub reinvigoration: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PomcpConfig {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            epsilon: DEFAULT_EPSILON,
            exploration: DEFAULT_EXPLORATION,
            n_particles: DEFAULT_PARTICLES,
            reinvigoration: DEFAULT_REINVIGORATION,
            seed: None,
        }
    }
}

impl PomcpConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.discount > 0.0 && self.discount < 1.0) {
            return Err(ConfigError::Discount(self.discount));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(ConfigError::Epsilon(self.epsilon));
        }
        if !(self.exploration >= 0.0 && self.exploration.is_finite()) {
            return Err(ConfigError::Exploration(self.exploration));
        }
        if self.n_particles == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.reinvigoration == 0 {
            return Err(ConfigError::NoReinvigoration);
        }
        Ok(())
    }

    /// Depth at which `discount^depth` first drops below `epsilon`; 0 for an
    /// invalid configuration.
    pub fn horizon(&self) -> u32 {
        if self.validate().is_err() {
            return 0;
        }
        let mut depth = 0u32;
        while !self.beyond_horizon(depth) {
            depth += 1;
        }
        depth
    }

    pub(crate) fn beyond_horizon(&self, depth: u32) -> bool {
        let exponent = i32::try_from(depth).unwrap_or(i32::MAX);
        self.discount.powi(exponent) < self.epsilon
    }
}

fn default_discount() -> f64 {
    DEFAULT_DISCOUNT
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_exploration() -> f64 {
    DEFAULT_EXPLORATION
}

fn default_particles() -> usize {
    DEFAULT_PARTICLES
}

fn default_reinvigoration() -> usize {
    DEFAULT_REINVIGORATION
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("discount must lie strictly between 0 and 1 (got {0})")]
    Discount(f64),
    #[error("epsilon must lie strictly between 0 and 1 (got {0})")]
    Epsilon(f64),
    #[error("exploration constant must be finite and non-negative (got {0})")]
    Exploration(f64),
    #[error("particle count must be greater than zero")]
    NoParticles,
    #[error("reinvigoration size must be greater than zero")]
    NoReinvigoration,
}

/// How much search a single decision may spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBudget {
    /// Exactly this many simulations from the root.
    Simulations(usize),
    /// Simulate until the deadline passes; at least one simulation always runs.
    TimeLimit(Duration),
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget::Simulations(1_000)
    }
}
