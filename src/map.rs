use anyhow::{anyhow, Context};
use serde::Serialize;
use std::collections::VecDeque;
use std::fs;

use crate::common::{InputError, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Free,
    Wall,
    Exit,
    Start,
}

impl Cell {
    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }

    pub fn label(self) -> u8 {
        match self {
            Cell::Free => 0,
            Cell::Wall => 1,
            Cell::Exit => 2,
            Cell::Start => 3,
        }
    }

    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' | 'G' => Some(Cell::Free),
            '@' | 'T' | '#' => Some(Cell::Wall),
            'E' => Some(Cell::Exit),
            'S' => Some(Cell::Start),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    fn try_from(label: u8) -> Result<Self, Self::Error> {
        match label {
            0 => Ok(Cell::Free),
            1 => Ok(Cell::Wall),
            2 => Ok(Cell::Exit),
            3 => Ok(Cell::Start),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridStatistics {
    pub free: usize,
    pub wall: usize,
    pub exit: usize,
    pub start: usize,
}

impl GridStatistics {
    pub fn total(&self) -> usize {
        self.free + self.wall + self.exit + self.start
    }
}

/// Static floor plan. Immutable once built; searches only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Vec<Cell>>,
    exits: Vec<(usize, usize)>,
}

impl Grid {
    /// Builds a grid from label codes (0 free, 1 wall, 2 exit, 3 start).
    pub fn from_matrix(matrix: Vec<Vec<u8>>) -> Result<Self, InputError> {
        let cols = matrix.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(InputError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(matrix.len());
        for (row, labels) in matrix.into_iter().enumerate() {
            if labels.len() != cols {
                return Err(InputError::RaggedGrid {
                    row,
                    expected: cols,
                    found: labels.len(),
                });
            }
            let cell_row = labels
                .into_iter()
                .enumerate()
                .map(|(col, label)| {
                    Cell::try_from(label).map_err(|label| InputError::UnknownCell { row, col, label })
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(cell_row);
        }

        Ok(Self::from_cells(cells))
    }

    fn from_cells(cells: Vec<Vec<Cell>>) -> Self {
        let rows = cells.len();
        let cols = cells[0].len();
        let exits = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .filter(|&(r, c)| cells[r][c] == Cell::Exit)
            .collect();

        Grid {
            rows,
            cols,
            cells,
            exits,
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("failed to read map file {path}"))?;
        Self::parse_map(&text).with_context(|| format!("malformed map file {path}"))
    }

    /// Parses a text floor plan: a `type` line, `height N`, `width N`, a
    /// `map` line, then `height` rows of cell characters.
    pub fn parse_map(text: &str) -> anyhow::Result<Self> {
        let mut lines = text.lines();

        let _type = lines.next().ok_or_else(|| anyhow!("missing type line"))?;
        let height = parse_header(lines.next(), "height")?;
        let width = parse_header(lines.next(), "width")?;
        let _map = lines.next().ok_or_else(|| anyhow!("missing map line"))?;

        let mut cells = Vec::with_capacity(height);
        for (row, line) in lines.take(height).enumerate() {
            let cell_row = line
                .trim_end()
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    Cell::from_char(ch)
                        .ok_or_else(|| anyhow!("unknown cell character {ch:?} at ({row}, {col})"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            if cell_row.len() != width {
                return Err(anyhow!(
                    "row {row} has {} cells, header says {width}",
                    cell_row.len()
                ));
            }
            cells.push(cell_row);
        }

        if cells.len() != height || height == 0 {
            return Err(anyhow!(
                "expected {height} rows, found {}",
                cells.len()
            ));
        }

        Ok(Self::from_cells(cells))
    }

    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.label()).collect())
            .collect()
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn is_passable(&self, row: usize, col: usize) -> bool {
        self.cells[row][col].is_passable()
    }

    pub fn is_exit(&self, row: usize, col: usize) -> bool {
        self.cells[row][col] == Cell::Exit
    }

    pub fn exits(&self) -> &[(usize, usize)] {
        &self.exits
    }

    /// First Start-labelled cell in row-major order. Informational only.
    pub fn start_cell(&self) -> Option<(usize, usize)> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .find(|&(r, c)| self.cells[r][c] == Cell::Start)
    }

    /// Passable cells reachable in one move, including staying in place.
    pub fn get_neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut neighbors = Vec::new();

        for step in Move::ALL {
            let (dr, dc) = step.offset();
            let (Some(new_row), Some(new_col)) =
                (row.checked_add_signed(dr), col.checked_add_signed(dc))
            else {
                continue;
            };
            if self.in_bounds(new_row, new_col) && self.is_passable(new_row, new_col) {
                neighbors.push((new_row, new_col));
            }
        }

        neighbors
    }

    pub fn statistics(&self) -> GridStatistics {
        let mut stats = GridStatistics::default();
        for cell in self.cells.iter().flatten() {
            match cell {
                Cell::Free => stats.free += 1,
                Cell::Wall => stats.wall += 1,
                Cell::Exit => stats.exit += 1,
                Cell::Start => stats.start += 1,
            }
        }
        stats
    }

    /// Whether any exit is reachable from `start` ignoring time and hazard.
    pub fn has_static_escape_route(&self, start: (usize, usize)) -> bool {
        if !self.in_bounds(start.0, start.1) {
            return false;
        }
        let reached = self.flood(&[start]);
        self.exits.iter().any(|&(r, c)| reached[r][c])
    }

    /// Whether some free cell cannot be reached from any passable border
    /// cell, i.e. the plan contains a sealed room.
    pub fn has_enclosed_areas(&self) -> bool {
        let border: Vec<(usize, usize)> = (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .filter(|&(r, c)| {
                (r == 0 || c == 0 || r + 1 == self.rows || c + 1 == self.cols)
                    && self.is_passable(r, c)
            })
            .collect();
        let reached = self.flood(&border);

        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .any(|(r, c)| self.cells[r][c] == Cell::Free && !reached[r][c])
    }

    fn flood(&self, sources: &[(usize, usize)]) -> Vec<Vec<bool>> {
        let mut reached = vec![vec![false; self.cols]; self.rows];
        let mut queue = VecDeque::new();

        for &(r, c) in sources {
            if !reached[r][c] {
                reached[r][c] = true;
                queue.push_back((r, c));
            }
        }

        while let Some((r, c)) = queue.pop_front() {
            for (nr, nc) in self.get_neighbors(r, c) {
                if !reached[nr][nc] {
                    reached[nr][nc] = true;
                    queue.push_back((nr, nc));
                }
            }
        }

        reached
    }
}

fn parse_header(line: Option<&str>, key: &str) -> anyhow::Result<usize> {
    let line = line.ok_or_else(|| anyhow!("missing {key} line"))?;
    let mut parts = line.split_whitespace();
    if parts.next() != Some(key) {
        return Err(anyhow!("expected `{key} N`, found {line:?}"));
    }
    parts
        .last()
        .ok_or_else(|| anyhow!("missing value in {key} line"))?
        .parse::<usize>()
        .with_context(|| format!("invalid {key} value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office() -> Grid {
        Grid::from_matrix(vec![
            vec![2, 0, 0, 0],
            vec![1, 1, 0, 1],
            vec![3, 0, 0, 2],
            vec![1, 0, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_read_map() {
        let map = Grid::from_file("map_file/test/office.map").unwrap();

        assert_eq!(map.rows, 4);
        assert_eq!(map.cols, 4);
        assert_eq!(map, office());

        assert!(map.is_exit(0, 0));
        assert!(!map.is_passable(1, 0));
        assert_eq!(map.start_cell(), Some((2, 0)));
        assert_eq!(map.exits(), &[(0, 0), (2, 3)]);

        let neighbors = map.get_neighbors(2, 1);
        assert_eq!(neighbors.len(), 4);
        assert!(neighbors.contains(&(2, 0)));
        assert!(neighbors.contains(&(2, 2)));
        assert!(neighbors.contains(&(3, 1)));
        assert!(neighbors.contains(&(2, 1)));
    }

    #[test]
    fn test_parse_map_errors() {
        assert!(Grid::parse_map("type octile\nheight 1\nwidth 2\nmap\n.X\n").is_err());
        assert!(Grid::parse_map("type octile\nheight 2\nwidth 2\nmap\n..\n").is_err());
        assert!(Grid::parse_map("type octile\nheight 1\nwidth 3\nmap\n..\n").is_err());
        assert!(Grid::parse_map("type octile\nwidth 1\nheight 1\nmap\n.\n").is_err());
    }

    #[test]
    fn test_from_matrix_rejects_malformed() {
        assert_eq!(Grid::from_matrix(vec![]), Err(InputError::EmptyGrid));
        assert_eq!(Grid::from_matrix(vec![vec![]]), Err(InputError::EmptyGrid));
        assert_eq!(
            Grid::from_matrix(vec![vec![0, 0], vec![0]]),
            Err(InputError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Grid::from_matrix(vec![vec![0, 7]]),
            Err(InputError::UnknownCell {
                row: 0,
                col: 1,
                label: 7
            })
        );
    }

    #[test]
    fn test_statistics_and_round_trip() {
        let grid = office();
        let stats = grid.statistics();
        assert_eq!(
            stats,
            GridStatistics {
                free: 7,
                wall: 6,
                exit: 2,
                start: 1
            }
        );
        assert_eq!(stats.total(), 16);
        assert_eq!(Grid::from_matrix(grid.to_matrix()).unwrap(), grid);
    }

    #[test]
    fn test_static_escape_route() {
        let grid = office();
        assert!(grid.has_static_escape_route((2, 0)));
        assert!(grid.has_static_escape_route((3, 1)));

        let sealed = Grid::from_matrix(vec![vec![3, 1, 2], vec![1, 1, 0]]).unwrap();
        assert!(!sealed.has_static_escape_route((0, 0)));
        assert!(!sealed.has_static_escape_route((5, 5)));
    }

    #[test]
    fn test_enclosed_areas() {
        assert!(!office().has_enclosed_areas());

        let room = Grid::from_matrix(vec![
            vec![2, 1, 1, 1, 0],
            vec![0, 1, 0, 1, 0],
            vec![0, 1, 1, 1, 0],
            vec![3, 0, 0, 0, 0],
        ])
        .unwrap();
        assert!(room.has_enclosed_areas());
    }
}
