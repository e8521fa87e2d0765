use super::best_first_search;
use crate::common::SearchResult;
use crate::cost::{WeightedCost, Weights};
use crate::hazard::HazardField;
use crate::map::Grid;
use crate::space::TimeExpandedSpace;
use crate::stat::Stats;

use tracing::instrument;

/// A* over the time-expanded graph with the weighted hazard cost and the
/// nearest-exit Manhattan heuristic. Returns the minimum weighted cost over
/// all routes that reach an exit before the hazard field runs out.
#[instrument(skip_all, name = "a_star", fields(start = format!("{start:?}")), level = "debug")]
pub fn a_star_search(
    grid: &Grid,
    hazard: &HazardField,
    start: (usize, usize),
    weights: Weights,
    stats: &mut Stats,
) -> SearchResult {
    weights.validate()?;
    let (space, start_state) = TimeExpandedSpace::new(grid, hazard, start)?;
    let model = WeightedCost::new(weights);

    best_first_search(
        &space,
        start_state,
        &model,
        |state| model.heuristic(grid, state.row, state.col),
        stats,
    )
}
