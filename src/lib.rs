//! Time-aware escape routes through a grid floor plan under a hazard
//! field that changes over time.
//!
//! The search graph is time-expanded: a node is a `(t, row, col)` state and
//! every edge advances time by one step, either by moving to a 4-connected
//! neighbour or by waiting. Three strategies walk it:
//!
//! * [`bfs_search`]: fewest time steps to any exit.
//! * [`uniform_cost_search`]: least accumulated raw hazard.
//! * [`a_star_search`]: least weighted cost (hazard, step and danger
//!   penalty), guided by the Manhattan distance to the nearest exit.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod cost;
pub mod hazard;
pub mod map;
pub mod scenario;
pub mod solver;
pub mod space;
pub mod stat;

pub use algorithm::{a_star_search, bfs_search, uniform_cost_search};
pub use common::{InputError, Move, Path, SearchError, SearchResult, Solution, State};
pub use cost::Weights;
pub use hazard::HazardField;
pub use map::{Cell, Grid};
