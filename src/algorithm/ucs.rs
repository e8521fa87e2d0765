use super::best_first_search;
use crate::common::SearchResult;
use crate::cost::RawHazardCost;
use crate::hazard::HazardField;
use crate::map::Grid;
use crate::space::TimeExpandedSpace;
use crate::stat::Stats;

use tracing::instrument;

/// Uniform-cost search minimising the raw hazard accumulated along the
/// route, start cell included. Ties between equal costs are popped in an
/// unspecified but deterministic order.
#[instrument(skip_all, name = "ucs", fields(start = format!("{start:?}")), level = "debug")]
pub fn uniform_cost_search(
    grid: &Grid,
    hazard: &HazardField,
    start: (usize, usize),
    stats: &mut Stats,
) -> SearchResult {
    let (space, start_state) = TimeExpandedSpace::new(grid, hazard, start)?;
    best_first_search(&space, start_state, &RawHazardCost, |_| 0.0, stats)
}
