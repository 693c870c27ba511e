use super::belief::BeliefSet;
use super::config::{ConfigError, PomcpConfig, SearchBudget};
use super::context::DecisionContext;
use super::node::SearchNode;
use super::traits::{Observable, Particle, RolloutPolicy};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt::Debug;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlannerError {
    #[error("decision requested for an observation with no legal actions")]
    NoLegalActions,
}

/// Statistics of one root child at the moment a decision was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildStats<A> {
    pub action: A,
    pub returns: u64,
    pub value: f64,
}

/// Summary of the search behind the most recent decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport<A> {
    pub chosen: A,
    pub simulations: usize,
    pub root_visits: u64,
    pub belief_size: usize,
    pub children: Vec<ChildStats<A>>,
    /// No child had statistics, so the rollout policy picked the action.
    pub fallback: bool,
    pub reinvigorated: bool,
    pub elapsed: Duration,
}

impl<A> SearchReport<A> {
    /// Gap between the two best child values, when at least two were tried.
    pub fn margin(&self) -> Option<f64> {
        let mut values: Vec<f64> = self
            .children
            .iter()
            .filter(|child| child.returns > 0)
            .map(|child| child.value)
            .collect();
        if values.len() < 2 {
            return None;
        }
        values.sort_by(|a, b| b.total_cmp(a));
        Some(values[0] - values[1])
    }
}

/// Online POMCP planner.
///
/// The planner owns its configuration, the default rollout policy, and the
/// single RNG that drives particle sampling and simulated transitions. Tree
/// state lives in the caller's [`DecisionContext`].
pub struct Pomcp<P: Particle, RP> {
    config: PomcpConfig,
    rollout_policy: RP,
    rng: StdRng,
    last_report: Option<SearchReport<P::Action>>,
}

impl<P, RP> Pomcp<P, RP>
where
    P: Particle,
    RP: RolloutPolicy<P>,
{
    pub fn new(config: PomcpConfig, rollout_policy: RP) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rollout_policy,
            rng,
            last_report: None,
        })
    }

    pub fn config(&self) -> &PomcpConfig {
        &self.config
    }

    pub fn last_report(&self) -> Option<&SearchReport<P::Action>> {
        self.last_report.as_ref()
    }

    /// Searches from `observation` and commits to the best root action.
    ///
    /// The root stored in `ctx` is reused when present, keeping only the
    /// particles consistent with `observation`. On return `ctx` holds the
    /// subtree under the chosen action.
    pub fn decide<O>(
        &mut self,
        observation: &O,
        ctx: &mut DecisionContext<P::Action, P>,
        budget: SearchBudget,
    ) -> Result<P::Action, PlannerError>
    where
        O: Observable<Particle = P>,
    {
        let legal = observation.legal_actions();
        if legal.is_empty() {
            return Err(PlannerError::NoLegalActions);
        }

        let started = Instant::now();
        let mut root = match ctx.take_root() {
            Some(mut node) => {
                node.belief_mut().retain_consistent(observation);
                node
            }
            None => SearchNode::root(BeliefSet::seed(
                observation,
                self.config.n_particles,
                &mut self.rng,
            )),
        };

        let reinvigorated = root.belief().is_empty();
        if reinvigorated {
            root.belief_mut()
                .reinvigorate(observation, self.config.reinvigoration, &mut self.rng);
        }

        let mut simulations = 0usize;
        while within_budget(budget, simulations, started) {
            let Some(particle) = root.belief().sample(&mut self.rng).cloned() else {
                break;
            };
            self.simulate(&particle, &mut root, 0);
            simulations += 1;
        }

        let (action, fallback) = match root.best_child(&legal) {
            Some(index) => match root.children().get(index).and_then(|c| c.action()) {
                Some(action) => (*action, false),
                None => (self.fallback_action(&root, &legal), true),
            },
            None => (self.fallback_action(&root, &legal), true),
        };

        let report = SearchReport {
            chosen: action,
            simulations,
            root_visits: root.visit_count(),
            belief_size: root.belief().len(),
            children: root
                .children()
                .iter()
                .filter_map(|child| {
                    child.action().map(|action| ChildStats {
                        action: *action,
                        returns: child.return_count(),
                        value: child.value_estimate(),
                    })
                })
                .collect(),
            fallback,
            reinvigorated,
            elapsed: started.elapsed(),
        };
        log_decision(&report);
        self.last_report = Some(report);

        let next = match root.child_index(action) {
            Some(index) => root.into_child(index),
            None => None,
        };
        ctx.set_root(next.unwrap_or_else(|| SearchNode::root(BeliefSet::default())));
        Ok(action)
    }

    /// One simulation trial from `node` with `particle` standing in for the
    /// hidden state. Returns the discounted return seen from `depth`.
    pub(crate) fn simulate(
        &mut self,
        particle: &P,
        node: &mut SearchNode<P::Action, P>,
        depth: u32,
    ) -> f64 {
        if self.config.beyond_horizon(depth) {
            return 0.0;
        }

        if !node.is_expanded() {
            node.expand(&particle.legal_actions());
            // counts as the node's first traversal, so ln(visits) >= 0 later
            node.mark_visit();
            return self.rollout(particle, depth);
        }

        let legal = particle.legal_actions();
        if legal.is_empty() {
            return 0.0;
        }
        let Some(index) = node.select_child(&legal, self.config.exploration) else {
            return 0.0;
        };

        let total = {
            let Some(child) = node.child_mut(index) else {
                return 0.0;
            };
            let Some(action) = child.action().copied() else {
                return 0.0;
            };
            let (next, reward) = particle.step(action, &mut self.rng);
            let total = reward + self.config.discount * self.simulate(&next, child, depth + 1);
            child.record(total);
            total
        };

        node.belief_mut().insert(particle.clone());
        node.mark_visit();
        total
    }

    /// Plays the default policy from `particle` without touching the tree.
    pub(crate) fn rollout(&mut self, particle: &P, depth: u32) -> f64 {
        if self.config.beyond_horizon(depth) {
            return 0.0;
        }
        let legal = particle.legal_actions();
        let Some(first) = legal.first().copied() else {
            return 0.0;
        };

        let preferred = self.rollout_policy.rollout_action(particle);
        let action = if legal.contains(&preferred) {
            preferred
        } else {
            first
        };
        let (next, reward) = particle.step(action, &mut self.rng);
        reward + self.config.discount * self.rollout(&next, depth + 1)
    }

    fn fallback_action(
        &mut self,
        root: &SearchNode<P::Action, P>,
        legal: &[P::Action],
    ) -> P::Action {
        let preferred = root
            .belief()
            .sample(&mut self.rng)
            .map(|particle| self.rollout_policy.rollout_action(particle));
        match preferred {
            Some(action) if legal.contains(&action) => action,
            _ => legal[0],
        }
    }
}

fn within_budget(budget: SearchBudget, simulations: usize, started: Instant) -> bool {
    match budget {
        SearchBudget::Simulations(limit) => simulations < limit,
        SearchBudget::TimeLimit(limit) => simulations == 0 || started.elapsed() < limit,
    }
}

fn log_decision<A: Debug>(report: &SearchReport<A>) {
    if !tracing::enabled!(target: "blackjack_bot::pomcp", Level::INFO) {
        return;
    }

    let values = report
        .children
        .iter()
        .map(|child| child.value.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let visits = report
        .children
        .iter()
        .map(|child| format!("{:?}:{}", child.action, child.returns))
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "blackjack_bot::pomcp",
        Level::INFO,
        chosen = ?report.chosen,
        simulations = report.simulations,
        root_visits = report.root_visits,
        belief_size = report.belief_size,
        fallback = report.fallback,
        reinvigorated = report.reinvigorated,
        margin = report.margin().unwrap_or(0.0),
        child_values = %format!("[{values}]"),
        child_visits = %visits,
        elapsed_ms = report.elapsed.as_secs_f64() * 1_000.0,
    );
}
