use super::{construct_path, Trace};
use crate::common::{SearchError, SearchResult, Solution};
use crate::cost::{CostModel, RawHazardCost};
use crate::hazard::HazardField;
use crate::map::Grid;
use crate::space::TimeExpandedSpace;
use crate::stat::Stats;

use std::collections::{HashSet, VecDeque};
use tracing::{debug, instrument, trace};

/// Breadth-first search for the route reaching an exit in the fewest time
/// steps. The reported cost is the raw hazard accumulated along that route;
/// among routes of equal length the first one explored wins, so the cost
/// is not minimised.
#[instrument(skip_all, name = "bfs", fields(start = format!("{start:?}")), level = "debug")]
pub fn bfs_search(
    grid: &Grid,
    hazard: &HazardField,
    start: (usize, usize),
    stats: &mut Stats,
) -> SearchResult {
    let (space, start_state) = TimeExpandedSpace::new(grid, hazard, start)?;
    let model = RawHazardCost;

    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    let mut trace = Trace::new();

    queue.push_back((start_state, model.start_cost(hazard, &start_state)));
    visited.insert(start_state);

    while let Some((current, cost)) = queue.pop_front() {
        trace!("expand node: {current} cost {cost}");
        stats.expanded_nodes += 1;

        if space.is_exit(&current) {
            debug!("reach exit {current} with cost {cost}");
            return Ok(Solution {
                cost,
                path: construct_path(&trace, current),
            });
        }

        for neighbor in space.successors(&current) {
            // Visited by full (t, row, col): a cell may be revisited later.
            if !visited.insert(neighbor) {
                continue;
            }
            trace.insert(neighbor, current);
            queue.push_back((neighbor, cost + model.step_cost(hazard, &neighbor)));
            stats.generated_nodes += 1;
        }
    }

    debug!("cannot find solution");
    Err(SearchError::Unreachable {
        horizon: space.horizon(),
    })
}
