/// Logical cell coordinate on the board.
///
/// Coordinates are signed so that a head stepping off the board can be
/// represented and rejected by [`Grid::contains`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this cell shifted by one step along `(dx, dy)`.
    #[must_use]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Square `size` x `size` board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    size: u16,
}

impl Grid {
    #[must_use]
    pub const fn new(size: u16) -> Self {
        Self { size }
    }

    #[must_use]
    pub fn size(self) -> u16 {
        self.size
    }

    /// Returns true iff `0 <= x < size` and `0 <= y < size`.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        let size = i32::from(self.size);
        (0..size).contains(&cell.x) && (0..size).contains(&cell.y)
    }

    /// Returns the total number of cells on the board.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    /// Iterates every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let size = i32::from(self.size);
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell { x, y }))
    }

    /// Returns the centre cell, rounding down.
    #[must_use]
    pub fn center(self) -> Cell {
        let half = i32::from(self.size / 2);
        Cell { x: half, y: half }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Grid};

    #[test]
    fn contains_accepts_every_in_bounds_cell() {
        let grid = Grid::new(20);

        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(19, 19)));
        assert!(grid.contains(Cell::new(10, 0)));
    }

    #[test]
    fn contains_rejects_cells_past_any_edge() {
        let grid = Grid::new(20);

        assert!(!grid.contains(Cell::new(20, 10)));
        assert!(!grid.contains(Cell::new(10, 20)));
        assert!(!grid.contains(Cell::new(-1, 10)));
        assert!(!grid.contains(Cell::new(10, -1)));
    }

    #[test]
    fn cells_covers_the_whole_board_once() {
        let grid = Grid::new(4);
        let cells: Vec<Cell> = grid.cells().collect();

        assert_eq!(cells.len(), grid.total_cells());
        assert_eq!(cells.first(), Some(&Cell::new(0, 0)));
        assert_eq!(cells.last(), Some(&Cell::new(3, 3)));
    }

    #[test]
    fn center_of_default_board_matches_start_head() {
        assert_eq!(Grid::new(20).center(), Cell::new(10, 10));
        assert_eq!(Grid::new(5).center(), Cell::new(2, 2));
    }
}
