use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

use crate::algorithm::{a_star_search, bfs_search, uniform_cost_search};
use crate::common::SearchResult;
use crate::cost::Weights;
use crate::hazard::HazardField;
use crate::map::Grid;
use crate::stat::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fewest time steps, raw hazard reported.
    Bfs,
    /// Least accumulated raw hazard.
    Ucs,
    /// Least weighted cost, guided by the nearest-exit heuristic.
    Astar,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Bfs, Strategy::Ucs, Strategy::Astar];

    pub fn solver(self, weights: Weights) -> Box<dyn Solver + Send> {
        match self {
            Strategy::Bfs => Box::new(BFS::new()),
            Strategy::Ucs => Box::new(UCS::new()),
            Strategy::Astar => Box::new(AStar::new(weights)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Bfs => "bfs",
            Strategy::Ucs => "ucs",
            Strategy::Astar => "astar",
        };
        f.write_str(name)
    }
}

pub trait Solver {
    fn strategy(&self) -> Strategy;

    fn solve(&mut self, grid: &Grid, hazard: &HazardField, start: (usize, usize)) -> SearchResult;

    fn stats(&self) -> &Stats;
}

/// Runs `search`, then records wall time and the outcome into `stats`.
fn timed_solve<F>(strategy: Strategy, stats: &mut Stats, search: F) -> SearchResult
where
    F: FnOnce(&mut Stats) -> SearchResult,
{
    let solve_start_time = Instant::now();
    let result = search(&mut *stats);
    stats.time_us = solve_start_time.elapsed().as_micros() as usize;

    match &result {
        Ok(solution) => {
            stats.cost = solution.cost;
            stats.path_len = solution.path.len();
            stats.print(&strategy.to_string());
        }
        Err(err) => info!("{strategy} solve fails: {err}"),
    }
    result
}

#[derive(Debug, Default)]
pub struct BFS {
    stats: Stats,
}

impl BFS {
    pub fn new() -> Self {
        BFS::default()
    }
}

impl Solver for BFS {
    fn strategy(&self) -> Strategy {
        Strategy::Bfs
    }

    fn solve(&mut self, grid: &Grid, hazard: &HazardField, start: (usize, usize)) -> SearchResult {
        timed_solve(Strategy::Bfs, &mut self.stats, |stats| {
            bfs_search(grid, hazard, start, stats)
        })
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}

#[derive(Debug, Default)]
pub struct UCS {
    stats: Stats,
}

impl UCS {
    pub fn new() -> Self {
        UCS::default()
    }
}

impl Solver for UCS {
    fn strategy(&self) -> Strategy {
        Strategy::Ucs
    }

    fn solve(&mut self, grid: &Grid, hazard: &HazardField, start: (usize, usize)) -> SearchResult {
        timed_solve(Strategy::Ucs, &mut self.stats, |stats| {
            uniform_cost_search(grid, hazard, start, stats)
        })
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}

#[derive(Debug, Default)]
pub struct AStar {
    weights: Weights,
    stats: Stats,
}

impl AStar {
    pub fn new(weights: Weights) -> Self {
        AStar {
            weights,
            stats: Stats::default(),
        }
    }
}

impl Solver for AStar {
    fn strategy(&self) -> Strategy {
        Strategy::Astar
    }

    fn solve(&mut self, grid: &Grid, hazard: &HazardField, start: (usize, usize)) -> SearchResult {
        let weights = self.weights;
        timed_solve(Strategy::Astar, &mut self.stats, |stats| {
            a_star_search(grid, hazard, start, weights, stats)
        })
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}

/// Outcome of one strategy in a side-by-side run.
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub result: SearchResult,
    pub stats: Stats,
}

/// Runs every requested strategy on its own thread. The grid and hazard
/// field are shared read-only; each search owns its frontier and records.
/// Runs come back in the order of `strategies`.
pub fn solve_all(
    grid: &Grid,
    hazard: &HazardField,
    start: (usize, usize),
    weights: Weights,
    strategies: &[Strategy],
) -> Vec<StrategyRun> {
    thread::scope(|scope| {
        let handles: Vec<_> = strategies
            .iter()
            .map(|&strategy| {
                scope.spawn(move || {
                    let mut solver = strategy.solver(weights);
                    let result = solver.solve(grid, hazard, start);
                    debug!("{strategy} finished");
                    StrategyRun {
                        strategy,
                        result,
                        stats: solver.stats().clone(),
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    })
}
