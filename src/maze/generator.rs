//! Randomized depth-first maze carving on a rectangular grid
//!
//! Produces a perfect maze (a spanning tree over the grid) together with the
//! order in which cells were first visited. Level construction promotes a
//! prefix of that order to rooms.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One of the four grid directions.
///
/// North is decreasing row (`i`), West is decreasing column (`j`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Row/column step for this direction
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }

    /// The direction pointing back
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Passages out of a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Openings {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Openings {
    /// Whether a passage exists toward `dir`
    #[must_use]
    pub const fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    /// Open or close the passage toward `dir`
    pub fn set(&mut self, dir: Direction, open: bool) {
        match dir {
            Direction::North => self.north = open,
            Direction::South => self.south = open,
            Direction::East => self.east = open,
            Direction::West => self.west = open,
        }
    }

    /// Number of open sides
    #[must_use]
    pub fn count(&self) -> usize {
        Direction::ALL.iter().filter(|&&d| self.get(d)).count()
    }
}

/// Integer grid coordinate: `i` is the row, `j` the column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// The adjacent cell toward `dir` (may lie outside the grid)
    #[must_use]
    pub const fn step(self, dir: Direction) -> Self {
        let (di, dj) = dir.offset();
        Self {
            i: self.i + di,
            j: self.j + dj,
        }
    }
}

/// A carved grid: openings for every cell plus the DFS visitation order
#[derive(Debug, Clone)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    openings: Vec<Openings>,
    order: Vec<Cell>,
}

impl MazeGrid {
    /// Grid shape for a requested room count: `rows = floor(sqrt(n))`, `cols = ceil(n / rows)`.
    #[must_use]
    pub fn dimensions_for(target_rooms: usize) -> (usize, usize) {
        let target = target_rooms.max(1);
        let rows = (target as f64).sqrt().floor().max(1.0) as usize;
        let cols = target.div_ceil(rows);
        (rows, cols)
    }

    /// Carve a perfect maze over a `rows` x `cols` grid, starting at (0, 0).
    ///
    /// Zero dimensions are raised to one.
    pub fn carve<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let mut grid = Self {
            rows,
            cols,
            openings: vec![Openings::default(); rows * cols],
            order: Vec::with_capacity(rows * cols),
        };

        let mut visited = vec![false; rows * cols];
        let start = Cell::new(0, 0);
        visited[0] = true;
        grid.order.push(start);

        let mut stack = vec![start];
        let mut dirs = Direction::ALL;

        while let Some(&current) = stack.last() {
            dirs.shuffle(rng);

            let next = dirs.iter().find_map(|&dir| {
                let neighbor = current.step(dir);
                let index = grid.index(neighbor)?;
                (!visited[index]).then_some((dir, neighbor, index))
            });

            match next {
                Some((dir, neighbor, index)) => {
                    grid.open_between(current, dir);
                    visited[index] = true;
                    grid.order.push(neighbor);
                    stack.push(neighbor);
                }
                None => {
                    stack.pop();
                }
            }
        }

        log::trace!(
            "carved {}x{} maze, {} cells visited",
            rows,
            cols,
            grid.order.len()
        );
        grid
    }

    fn open_between(&mut self, cell: Cell, dir: Direction) {
        if let Some(index) = self.index(cell) {
            self.openings[index].set(dir, true);
        }
        let neighbor = cell.step(dir);
        if let Some(index) = self.index(neighbor) {
            self.openings[index].set(dir.opposite(), true);
        }
    }

    /// Flat index of an in-bounds cell
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        let in_bounds = cell.i >= 0
            && cell.j >= 0
            && (cell.i as usize) < self.rows
            && (cell.j as usize) < self.cols;
        in_bounds.then(|| cell.i as usize * self.cols + cell.j as usize)
    }

    /// Openings of a cell (all closed when out of bounds)
    #[must_use]
    pub fn openings(&self, cell: Cell) -> Openings {
        self.index(cell)
            .map(|index| self.openings[index])
            .unwrap_or_default()
    }

    /// Cells in the order they were first reached
    #[must_use]
    pub fn visitation_order(&self) -> &[Cell] {
        &self.order
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_dimensions() {
        assert_eq!(MazeGrid::dimensions_for(1), (1, 1));
        assert_eq!(MazeGrid::dimensions_for(3), (1, 3));
        assert_eq!(MazeGrid::dimensions_for(12), (3, 4));
        assert_eq!(MazeGrid::dimensions_for(16), (4, 4));
        assert_eq!(MazeGrid::dimensions_for(17), (4, 5));
    }

    #[test]
    fn test_carve_visits_every_cell_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = MazeGrid::carve(4, 5, &mut rng);

        assert_eq!(grid.visitation_order().len(), 20);
        assert_eq!(grid.visitation_order()[0], Cell::new(0, 0));

        let mut seen = rustc_hash::FxHashSet::default();
        for cell in grid.visitation_order() {
            assert!(seen.insert(*cell), "cell {cell:?} visited twice");
        }
    }

    #[test]
    fn test_carve_is_spanning_tree() {
        let mut rng = StdRng::seed_from_u64(99);
        let grid = MazeGrid::carve(5, 6, &mut rng);

        // A spanning tree over n cells has n - 1 edges; each edge is counted from both ends.
        let total: usize = grid
            .visitation_order()
            .iter()
            .map(|&c| grid.openings(c).count())
            .sum();
        assert_eq!(total, 2 * (30 - 1));
    }

    #[test]
    fn test_openings_symmetric_and_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = MazeGrid::carve(3, 4, &mut rng);

        for &cell in grid.visitation_order() {
            for dir in Direction::ALL {
                if grid.openings(cell).get(dir) {
                    let neighbor = cell.step(dir);
                    assert!(grid.index(neighbor).is_some());
                    assert!(grid.openings(neighbor).get(dir.opposite()));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = MazeGrid::carve(4, 4, &mut StdRng::seed_from_u64(1234));
        let b = MazeGrid::carve(4, 4, &mut StdRng::seed_from_u64(1234));

        assert_eq!(a.visitation_order(), b.visitation_order());
        for &cell in a.visitation_order() {
            assert_eq!(a.openings(cell), b.openings(cell));
        }
    }

    #[test]
    fn test_single_row_is_a_corridor() {
        let grid = MazeGrid::carve(1, 3, &mut StdRng::seed_from_u64(0));

        assert_eq!(
            grid.visitation_order(),
            &[Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]
        );
        assert!(grid.openings(Cell::new(0, 1)).east);
        assert!(grid.openings(Cell::new(0, 1)).west);
        assert!(!grid.openings(Cell::new(0, 0)).west);
    }
}
