//! Bounded trail of cells the forager has stood on.

use std::collections::VecDeque;

use crate::grid::Cell;

#[derive(Clone, Debug)]
pub struct MemoryTrail {
    cells: VecDeque<Cell>,
    capacity: usize,
}

impl MemoryTrail {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append `cell`, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, cell: Cell) {
        self.cells.push_back(cell);
        while self.cells.len() > self.capacity {
            self.cells.pop_front();
        }
    }

    /// Whether `cell` is among the `window` most recent entries.
    pub fn visited_recently(&self, cell: Cell, window: usize) -> bool {
        self.cells.iter().rev().take(window).any(|&c| c == cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
