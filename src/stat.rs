use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub cost: f64,
    pub path_len: usize,
    pub time_us: usize,
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub stale_nodes: usize,
}

impl Stats {
    pub(crate) fn print(&self, strategy: &str) {
        info!(
            "{strategy}: Cost {:.4} Path length {:?} Time(microseconds) {:?} Expanded nodes {:?} Generated nodes {:?} Stale nodes {:?}",
            self.cost, self.path_len, self.time_us, self.expanded_nodes, self.generated_nodes, self.stale_nodes
        );
    }
}
