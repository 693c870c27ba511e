//! Partially Observable Monte-Carlo Planning.
//!
//! The planner is generic over the environment through [`Particle`] and
//! [`Observable`]. A decision seeds (or reuses) a particle belief at the root,
//! runs UCB-guided simulations that grow the tree by one node per trial,
//! estimates returns past the frontier with a [`RolloutPolicy`], and then
//! re-roots the caller's [`DecisionContext`] on the chosen branch.

mod belief;
mod config;
mod context;
mod node;
mod planner;
mod traits;

pub use belief::BeliefSet;
pub use config::{ConfigError, PomcpConfig, SearchBudget};
pub use context::DecisionContext;
pub use node::SearchNode;
pub use planner::{ChildStats, PlannerError, Pomcp, SearchReport};
pub use traits::{Observable, Particle, RolloutPolicy};
