use super::node::SearchNode;

/// Per-round, per-agent search state carried between decisions.
///
/// The orchestrator creates one empty context per agent at the start of a
/// round and drops it when the round ends. The planner keeps nothing else
/// between calls.
#[derive(Debug, Clone)]
pub struct DecisionContext<A, P> {
    root: Option<SearchNode<A, P>>,
}

impl<A, P> Default for DecisionContext<A, P> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<A, P> DecisionContext<A, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&SearchNode<A, P>> {
        self.root.as_ref()
    }

    pub(crate) fn take_root(&mut self) -> Option<SearchNode<A, P>> {
        self.root.take()
    }

    pub(crate) fn set_root(&mut self, node: SearchNode<A, P>) {
        self.root = Some(node);
    }
}
