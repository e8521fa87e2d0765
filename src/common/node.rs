use std::cmp::Ordering;

use super::State;

/// Frontier entry shared by the uniform-cost and A* searches. Uniform-cost
/// search stores its accumulated cost in both fields.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenNode {
    pub(crate) state: State,
    pub(crate) f_cost: f64,
    pub(crate) g_cost: f64,
}

impl OpenNode {
    pub(crate) fn new(state: State, f_cost: f64, g_cost: f64) -> Self {
        OpenNode {
            state,
            f_cost,
            g_cost,
        }
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    // Only the f cost carries meaning. The remaining keys exist so that
    // pop order is deterministic; callers must not rely on them.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .total_cmp(&other.f_cost)
            // Higher g cost has higher priority
            .then_with(|| other.g_cost.total_cmp(&self.g_cost))
            .then_with(|| self.state.cmp(&other.state))
    }
}
