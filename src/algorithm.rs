mod astar;
mod bfs;
mod ucs;

pub use astar::a_star_search;
pub use bfs::bfs_search;
pub use ucs::uniform_cost_search;

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

use crate::common::{OpenNode, Path, SearchError, SearchResult, Solution, State};
use crate::cost::CostModel;
use crate::space::TimeExpandedSpace;
use crate::stat::Stats;

/// Parent link of every reached state; the start state has none.
type Trace = HashMap<State, State>;

fn construct_path(trace: &Trace, mut current: State) -> Path {
    let mut path = vec![current];
    while let Some(&parent) = trace.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// Label-correcting best-first search over the time-expanded graph, ordered
/// by `g + heuristic`. With a zero heuristic this is uniform-cost search.
///
/// A state is re-opened whenever a strictly cheaper `g` is found for it;
/// frontier entries made obsolete that way are skipped when popped.
fn best_first_search<C, H>(
    space: &TimeExpandedSpace,
    start: State,
    model: &C,
    heuristic: H,
    stats: &mut Stats,
) -> SearchResult
where
    C: CostModel,
    H: Fn(&State) -> f64,
{
    let mut open_list = BTreeSet::new();
    let mut best_cost: HashMap<State, f64> = HashMap::new();
    let mut trace = Trace::new();

    let start_g_cost = model.start_cost(space.hazard, &start);
    best_cost.insert(start, start_g_cost);
    open_list.insert(OpenNode::new(
        start,
        start_g_cost + heuristic(&start),
        start_g_cost,
    ));

    while let Some(current) = open_list.pop_first() {
        if best_cost
            .get(&current.state)
            .is_some_and(|&best| current.g_cost > best)
        {
            stats.stale_nodes += 1;
            continue;
        }

        trace!("expand node: {current:?}");
        stats.expanded_nodes += 1;

        if space.is_exit(&current.state) {
            debug!("reach exit {} with cost {}", current.state, current.g_cost);
            return Ok(Solution {
                cost: current.g_cost,
                path: construct_path(&trace, current.state),
            });
        }

        for neighbor in space.successors(&current.state) {
            let tentative_g_cost = current.g_cost + model.step_cost(space.hazard, &neighbor);
            if best_cost
                .get(&neighbor)
                .is_some_and(|&best| tentative_g_cost >= best)
            {
                continue;
            }

            best_cost.insert(neighbor, tentative_g_cost);
            trace.insert(neighbor, current.state);
            open_list.insert(OpenNode::new(
                neighbor,
                tentative_g_cost + heuristic(&neighbor),
                tentative_g_cost,
            ));
            stats.generated_nodes += 1;
        }
    }

    debug!("cannot find solution");
    Err(SearchError::Unreachable {
        horizon: space.horizon(),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::common::State;
    use crate::cost::CostModel;
    use crate::hazard::HazardField;
    use crate::map::Grid;
    use crate::space::TimeExpandedSpace;

    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    pub(crate) fn office() -> Grid {
        Grid::from_matrix(vec![
            vec![2, 0, 0, 0],
            vec![1, 1, 0, 1],
            vec![3, 0, 0, 2],
            vec![1, 0, 1, 1],
        ])
        .unwrap()
    }

    pub(crate) fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// 4x4 grid with random walls and exits, plus a random non-wall start.
    pub(crate) fn random_case(seed: u64, time_steps: usize) -> Option<(Grid, HazardField, (usize, usize))> {
        let mut rng = StdRng::seed_from_u64(seed);
        let matrix: Vec<Vec<u8>> = (0..4)
            .map(|_| {
                (0..4)
                    .map(|_| match rng.gen_range(0..10) {
                        0..=2 => 1,
                        3 => 2,
                        _ => 0,
                    })
                    .collect()
            })
            .collect();
        let grid = Grid::from_matrix(matrix).unwrap();
        let hazard = HazardField::random(time_steps, 4, 4, &mut rng);

        let open: Vec<(usize, usize)> = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&(r, c)| grid.is_passable(r, c))
            .collect();
        if open.is_empty() {
            return None;
        }
        let start = open[rng.gen_range(0..open.len())];
        Some((grid, hazard, start))
    }

    /// Exhaustive minimum over every time-bounded route from `state` that
    /// stops at the first exit it touches. `cost` is what was paid so far.
    pub(crate) fn brute_force_min_cost<C: CostModel>(
        space: &TimeExpandedSpace,
        state: State,
        cost: f64,
        model: &C,
    ) -> Option<f64> {
        if space.is_exit(&state) {
            return Some(cost);
        }
        space
            .successors(&state)
            .filter_map(|next| {
                brute_force_min_cost(space, next, cost + model.step_cost(space.hazard, &next), model)
            })
            .min_by(f64::total_cmp)
    }

    /// Fewest time steps to any exit, by exhaustive enumeration.
    pub(crate) fn brute_force_min_steps(space: &TimeExpandedSpace, state: State) -> Option<usize> {
        if space.is_exit(&state) {
            return Some(state.t);
        }
        space
            .successors(&state)
            .filter_map(|next| brute_force_min_steps(space, next))
            .min()
    }
}
