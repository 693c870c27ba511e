pub mod env;
pub mod policy;
pub mod pomcp;

pub use policy::{
    AgentPolicy, Policy, PolicyError, PolicySpec, PomcpPolicy, RandomPolicy, RoundContext,
    ThresholdPolicy,
};
pub use pomcp::{DecisionContext, PlannerError, Pomcp, PomcpConfig, SearchBudget, SearchReport};
