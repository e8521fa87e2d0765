use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::InputError;
use crate::map::Grid;

/// Per-cell hazard intensity for each discrete time step, `layers[t][r][c]`.
/// Produced outside the crate and never mutated by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HazardField {
    layers: Vec<Vec<Vec<f64>>>,
}

impl HazardField {
    pub fn new(layers: Vec<Vec<Vec<f64>>>) -> Self {
        HazardField { layers }
    }

    pub fn uniform(time_steps: usize, rows: usize, cols: usize, value: f64) -> Self {
        HazardField {
            layers: vec![vec![vec![value; cols]; rows]; time_steps],
        }
    }

    /// Independent samples in `[0, 1)` for every `(t, r, c)`.
    pub fn random<R: Rng + ?Sized>(time_steps: usize, rows: usize, cols: usize, rng: &mut R) -> Self {
        let layers = (0..time_steps)
            .map(|_| {
                (0..rows)
                    .map(|_| (0..cols).map(|_| rng.gen::<f64>()).collect())
                    .collect()
            })
            .collect();
        HazardField { layers }
    }

    /// Number of defined time steps `T`; valid times are `0..T`.
    pub fn horizon(&self) -> usize {
        self.layers.len()
    }

    pub fn at(&self, t: usize, row: usize, col: usize) -> f64 {
        self.layers[t][row][col]
    }

    pub fn layer(&self, t: usize) -> Option<&[Vec<f64>]> {
        self.layers.get(t).map(Vec::as_slice)
    }

    /// Checks the field against `grid`: at least one layer, every layer the
    /// grid's shape, every value non-negative and finite.
    pub fn validate(&self, grid: &Grid) -> Result<(), InputError> {
        if self.layers.is_empty() {
            return Err(InputError::EmptyHazardField);
        }

        for (t, layer) in self.layers.iter().enumerate() {
            let found_rows = layer.len();
            let ragged_cols = layer.iter().map(Vec::len).find(|&n| n != grid.cols);
            if found_rows != grid.rows || ragged_cols.is_some() {
                return Err(InputError::LayerShapeMismatch {
                    layer: t,
                    rows: grid.rows,
                    cols: grid.cols,
                    found_rows,
                    found_cols: ragged_cols.unwrap_or_else(|| layer.first().map_or(0, Vec::len)),
                });
            }

            for (row, values) in layer.iter().enumerate() {
                for (col, &value) in values.iter().enumerate() {
                    if !value.is_finite() || value < 0.0 {
                        return Err(InputError::InvalidHazardValue { t, row, col, value });
                    }
                }
            }
        }

        Ok(())
    }
}
