use std::collections::VecDeque;

use crate::grid::Cell;
use crate::input::Direction;

/// Ordered snake body, head at the front.
///
/// The body is never empty. Growth keeps the pre-move tail cell in place, so
/// every stored segment is a real board coordinate.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Creates a straight snake of `length` cells with its head at `head`,
    /// trailing away from `heading`.
    #[must_use]
    pub fn new(head: Cell, heading: Direction, length: usize) -> Self {
        let back = heading.opposite().delta();
        let body = std::iter::successors(Some(head), |cell| Some(cell.offset(back)))
            .take(length.max(1))
            .collect();

        Self { body }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Returns the head cell offset by one step in `direction`.
    #[must_use]
    pub fn peek_next_head(&self, direction: Direction) -> Cell {
        self.head().offset(direction.delta())
    }

    /// Pushes a new head; drops the tail unless the snake `grew`.
    pub fn advance(&mut self, direction: Direction, grew: bool) {
        let next_head = self.peek_next_head(direction);
        self.body.push_front(next_head);
        if !grew {
            let _ = self.body.pop_back();
        }
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn self_collides(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Returns the last body cell.
    #[must_use]
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Cell> {
        self.body.iter()
    }
}
