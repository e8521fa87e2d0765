//! Step costs and the A* heuristic.
//!
//! Two cost semantics coexist:
//!
//! * [`RawHazardCost`] charges the raw hazard of every entered state. The
//!   breadth-first and uniform-cost searches use it, so their cost is the
//!   cumulative hazard exposure along the route.
//! * [`WeightedCost`] charges `w1 * hazard + w2 + penalty`, where the penalty
//!   `w3` applies once the hazard reaches the danger threshold. A* uses it,
//!   so its cost also accounts for route length.
//!
//! Both models charge the start state on time 0 (without the per-step term).

use serde::{Deserialize, Serialize};

use crate::common::{InputError, State};
use crate::hazard::HazardField;
use crate::map::Grid;

/// Weights of the composite A* cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// `w1`, multiplier on the hazard value.
    pub hazard_weight: f64,
    /// `w2`, flat cost of every move including waiting.
    pub step_weight: f64,
    /// `w3`, added when the hazard is at or above `danger_threshold`.
    pub danger_penalty: f64,
    pub danger_threshold: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            hazard_weight: 0.6,
            step_weight: 0.3,
            danger_penalty: 0.1,
            danger_threshold: 0.4,
        }
    }
}

impl Weights {
    /// Negative weights would break the heuristic's lower bound.
    pub fn validate(&self) -> Result<(), InputError> {
        for (name, value) in [
            ("hazard_weight", self.hazard_weight),
            ("step_weight", self.step_weight),
            ("danger_penalty", self.danger_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::InvalidWeights(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        if self.danger_threshold.is_nan() {
            return Err(InputError::InvalidWeights(
                "danger_threshold must be a number".to_string(),
            ));
        }
        Ok(())
    }
}

pub trait CostModel {
    /// Cost charged for occupying the start state.
    fn start_cost(&self, hazard: &HazardField, state: &State) -> f64;

    /// Cost of moving into `state`.
    fn step_cost(&self, hazard: &HazardField, state: &State) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawHazardCost;

impl CostModel for RawHazardCost {
    fn start_cost(&self, hazard: &HazardField, state: &State) -> f64 {
        hazard.at(state.t, state.row, state.col)
    }

    fn step_cost(&self, hazard: &HazardField, state: &State) -> f64 {
        hazard.at(state.t, state.row, state.col)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedCost {
    pub weights: Weights,
}

impl WeightedCost {
    pub fn new(weights: Weights) -> Self {
        WeightedCost { weights }
    }

    fn exposure(&self, hazard: &HazardField, state: &State) -> f64 {
        let value = hazard.at(state.t, state.row, state.col);
        let penalty = if value >= self.weights.danger_threshold {
            self.weights.danger_penalty
        } else {
            0.0
        };
        self.weights.hazard_weight * value + penalty
    }

    /// `w2` times the Manhattan distance to the nearest exit. Walls and time
    /// are ignored, so this never overestimates the remaining weighted cost.
    pub fn heuristic(&self, grid: &Grid, row: usize, col: usize) -> f64 {
        grid.exits()
            .iter()
            .map(|&(er, ec)| row.abs_diff(er) + col.abs_diff(ec))
            .min()
            .map_or(f64::INFINITY, |distance| {
                self.weights.step_weight * distance as f64
            })
    }
}

impl CostModel for WeightedCost {
    fn start_cost(&self, hazard: &HazardField, state: &State) -> f64 {
        self.exposure(hazard, state)
    }

    fn step_cost(&self, hazard: &HazardField, state: &State) -> f64 {
        self.exposure(hazard, state) + self.weights.step_weight
    }
}
