use super::belief::BeliefSet;

/// One action/observation history prefix in the search tree.
///
/// A node exclusively owns its children, so dropping a node drops its whole
/// subtree. `visit_count` counts simulations that passed through the node and
/// feeds the UCB logarithm; `return_count` counts the returns averaged into
/// `value_estimate` by the parent on the unwind.
#[derive(Debug, Clone)]
pub struct SearchNode<A, P> {
    action: Option<A>,
    visit_count: u64,
    return_count: u64,
    value_estimate: f64,
    children: Vec<SearchNode<A, P>>,
    belief: BeliefSet<P>,
}

impl<A, P> SearchNode<A, P> {
    pub fn root(belief: BeliefSet<P>) -> Self {
        Self {
            action: None,
            visit_count: 0,
            return_count: 0,
            value_estimate: 0.0,
            children: Vec::new(),
            belief,
        }
    }

    fn child(action: A) -> Self {
        Self {
            action: Some(action),
            visit_count: 0,
            return_count: 0,
            value_estimate: 0.0,
            children: Vec::new(),
            belief: BeliefSet::default(),
        }
    }

    /// The action that led here; `None` only for a node created as a root.
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }

    pub fn return_count(&self) -> u64 {
        self.return_count
    }

    pub fn value_estimate(&self) -> f64 {
        self.value_estimate
    }

    pub fn children(&self) -> &[SearchNode<A, P>] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn belief(&self) -> &BeliefSet<P> {
        &self.belief
    }

    pub fn belief_mut(&mut self) -> &mut BeliefSet<P> {
        &mut self.belief
    }

    pub(crate) fn child_mut(&mut self, index: usize) -> Option<&mut SearchNode<A, P>> {
        self.children.get_mut(index)
    }

    pub(crate) fn mark_visit(&mut self) {
        self.visit_count += 1;
    }

    /// Folds one more return into the running mean.
    pub(crate) fn record(&mut self, total: f64) {
        self.return_count += 1;
        self.value_estimate += (total - self.value_estimate) / self.return_count as f64;
    }

    /// Detaches the child at `index`, dropping every sibling subtree with `self`.
    pub(crate) fn into_child(mut self, index: usize) -> Option<SearchNode<A, P>> {
        if index < self.children.len() {
            Some(self.children.swap_remove(index))
        } else {
            None
        }
    }
}

impl<A: Copy + Eq, P> SearchNode<A, P> {
    /// Creates one child per action, in the given order. Runs at most once.
    pub(crate) fn expand(&mut self, legal: &[A]) {
        if self.is_expanded() {
            return;
        }
        self.children = legal.iter().copied().map(Self::child).collect();
    }

    pub fn child_index(&self, action: A) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.action == Some(action))
    }

    /// UCB choice among the children whose action is in `legal`.
    ///
    /// An unvisited child always wins over visited ones. Ties keep the first
    /// child in expansion order.
    pub(crate) fn select_child(&self, legal: &[A], exploration: f64) -> Option<usize> {
        let candidates = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.action.is_some_and(|action| legal.contains(&action)));

        let log_visits = (self.visit_count.max(1) as f64).ln();
        let mut best: Option<(usize, f64)> = None;
        for (index, child) in candidates {
            if child.return_count == 0 {
                return Some(index);
            }
            let bonus = (log_visits / child.return_count as f64).sqrt();
            let score = child.value_estimate + exploration * bonus;
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Child with the highest value among those with at least one return.
    pub(crate) fn best_child(&self, legal: &[A]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, child) in self.children.iter().enumerate() {
            let Some(action) = child.action else {
                continue;
            };
            if child.return_count == 0 || !legal.contains(&action) {
                continue;
            }
            if best.is_none_or(|(_, top)| child.value_estimate > top) {
                best = Some((index, child.value_estimate));
            }
        }
        best.map(|(index, _)| index)
    }
}
