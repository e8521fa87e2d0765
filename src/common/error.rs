use thiserror::Error;

/// Why an input pair (grid, hazard field, start) was rejected before search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("grid has no cells")]
    EmptyGrid,
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell label {label} at ({row}, {col})")]
    UnknownCell { row: usize, col: usize, label: u8 },
    #[error("hazard field has no time layers")]
    EmptyHazardField,
    #[error("hazard layer {layer} is {found_rows}x{found_cols}, grid is {rows}x{cols}")]
    LayerShapeMismatch {
        layer: usize,
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
    #[error("hazard value {value} at (t={t}, {row}, {col}) is not a non-negative finite number")]
    InvalidHazardValue {
        t: usize,
        row: usize,
        col: usize,
        value: f64,
    },
    #[error("start ({row}, {col}) is outside the {rows}x{cols} grid")]
    StartOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("invalid search weights: {0}")]
    InvalidWeights(String),
}

/// Terminal failure of a search. Every failure is an ordinary value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The grid carries no exit cell, detected before any expansion.
    #[error("grid contains no exit")]
    NoExit,
    /// Frontier exhausted before any exit was reached within the horizon.
    #[error("no exit reachable within {horizon} time steps")]
    Unreachable { horizon: usize },
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
}
