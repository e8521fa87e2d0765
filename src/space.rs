use crate::common::{InputError, Move, SearchError, State};
use crate::hazard::HazardField;
use crate::map::Grid;

/// The graph every strategy walks: nodes are `(t, row, col)` states, edges
/// are the five moves into the next time layer.
#[derive(Debug, Clone, Copy)]
pub struct TimeExpandedSpace<'a> {
    pub grid: &'a Grid,
    pub hazard: &'a HazardField,
}

impl<'a> TimeExpandedSpace<'a> {
    /// Validates the inputs in a fixed order (hazard shape, start bounds,
    /// exit presence) and returns the space together with the start state.
    pub fn new(
        grid: &'a Grid,
        hazard: &'a HazardField,
        start: (usize, usize),
    ) -> Result<(Self, State), SearchError> {
        hazard.validate(grid)?;

        if !grid.in_bounds(start.0, start.1) {
            return Err(InputError::StartOutOfBounds {
                row: start.0,
                col: start.1,
                rows: grid.rows,
                cols: grid.cols,
            }
            .into());
        }

        if grid.exits().is_empty() {
            return Err(SearchError::NoExit);
        }

        Ok((TimeExpandedSpace { grid, hazard }, State::new(0, start.0, start.1)))
    }

    pub fn horizon(&self) -> usize {
        self.hazard.horizon()
    }

    pub fn is_exit(&self, state: &State) -> bool {
        self.grid.is_exit(state.row, state.col)
    }

    /// Whether `state` can still be expanded without leaving the horizon.
    pub fn has_next_layer(&self, state: &State) -> bool {
        state.t + 1 < self.horizon()
    }

    /// Valid successors of `state` in `Move::ALL` order. Empty once the next
    /// time step would fall outside the hazard field.
    pub fn successors(&self, state: &State) -> impl Iterator<Item = State> + '_ {
        let expandable = self.has_next_layer(state);
        let state = *state;
        Move::ALL
            .into_iter()
            .filter(move |_| expandable)
            .filter_map(move |step| state.apply(step))
            .filter(|next| {
                self.grid.in_bounds(next.row, next.col) && self.grid.is_passable(next.row, next.col)
            })
    }
}
