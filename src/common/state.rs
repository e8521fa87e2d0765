use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hazard::HazardField;
use crate::map::{Cell, Grid};

/// A node of the time-expanded graph. Time is part of identity: the same
/// cell at two different times is two different states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub t: usize,
    pub row: usize,
    pub col: usize,
}

impl State {
    pub fn new(t: usize, row: usize, col: usize) -> Self {
        State { t, row, col }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Candidate successor under `step`, or `None` if it leaves the
    /// non-negative quadrant. Bounds, walls and horizon are checked by the
    /// state space.
    pub fn apply(&self, step: Move) -> Option<State> {
        let (dr, dc) = step.offset();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(State {
            t: self.t + 1,
            row,
            col,
        })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(t={}, {}, {})", self.t, self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    Wait,
}

impl Move {
    /// Expansion order shared by every strategy.
    pub const ALL: [Move; 5] = [Move::Up, Move::Down, Move::Left, Move::Right, Move::Wait];

    pub fn offset(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
            Move::Wait => (0, 0),
        }
    }

    /// The move that takes `from` to `to`, if they are one step apart.
    pub fn between(from: &State, to: &State) -> Option<Move> {
        if to.t != from.t + 1 {
            return None;
        }
        Move::ALL
            .into_iter()
            .find(|step| from.apply(*step).as_ref() == Some(to))
    }
}

pub type Path = Vec<State>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub cost: f64,
    pub path: Path,
}

impl Solution {
    /// Number of moves (including waits) taken by the route.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn exit(&self) -> Option<(usize, usize)> {
        self.path.last().map(State::position)
    }

    /// Checks that the route starts at `start` on time 0, moves by exactly
    /// one legal move per step, never enters a wall or leaves the horizon,
    /// and ends on an exit.
    pub fn verify(&self, grid: &Grid, hazard: &HazardField, start: (usize, usize)) -> bool {
        let Some(first) = self.path.first() else {
            return false;
        };
        if first.t != 0 || first.position() != start {
            return false;
        }

        for window in self.path.windows(2) {
            let (from, to) = (&window[0], &window[1]);
            if Move::between(from, to).is_none() {
                return false;
            }
            if to.t >= hazard.horizon() || !grid.in_bounds(to.row, to.col) {
                return false;
            }
            if grid.cell(to.row, to.col) == Cell::Wall {
                return false;
            }
        }

        self.path
            .last()
            .is_some_and(|last| grid.is_exit(last.row, last.col))
    }
}
