//! Board geometry: cells, agent positions and maze layouts.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

// Layout characters
pub const CELL_WALL: char = '%';
pub const CELL_FOOD: char = '.';
pub const CELL_CAPSULE: char = 'o';

/// The layout used when none is supplied.
pub const DEFAULT_LAYOUT: &str = include_str!("../layouts/default_capture.lay");

/// An integer board cell. `y` grows northwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A continuous agent position. Engines with sub-cell movement may leave an
/// agent between two cells for a tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rounds to the closest cell (halves round away from zero).
    pub fn nearest_cell(self) -> Cell {
        Cell::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn is_on_grid(self) -> bool {
        let cell = self.nearest_cell();
        self.x == cell.x as f64 && self.y == cell.y as f64
    }

    pub fn translate(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl From<Cell> for Point {
    fn from(cell: Cell) -> Self {
        Point::new(cell.x as f64, cell.y as f64)
    }
}

/// Static maze description: walls, initial pellets and agent start cells.
#[derive(Clone, Debug)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    /// Indexed `[[x, y]]`.
    pub walls: Array2<bool>,
    /// Indexed `[[x, y]]`.
    pub food: Array2<bool>,
    pub capsules: Vec<Cell>,
    /// Start cell of agent `i` at position `i`.
    pub agent_starts: Vec<Cell>,
}

impl Layout {
    /// Parse a layout from its text form.
    ///
    /// The first text row is the northernmost row of the board.
    pub fn parse(text: &str) -> Result<Layout> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.is_empty())
            .collect();
        anyhow::ensure!(!rows.is_empty(), "Layout is empty");

        let width = rows[0].chars().count();
        let height = rows.len();
        for (row, line) in rows.iter().enumerate() {
            anyhow::ensure!(
                line.chars().count() == width,
                "Layout row {} has width {}, expected {}",
                row,
                line.chars().count(),
                width
            );
        }

        let mut walls = Array2::<bool>::from_elem((width, height), false);
        let mut food = Array2::<bool>::from_elem((width, height), false);
        let mut capsules = Vec::new();
        let mut starts: Vec<(usize, Cell)> = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row;
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match ch {
                    CELL_WALL => walls[[x, y]] = true,
                    CELL_FOOD => food[[x, y]] = true,
                    CELL_CAPSULE => capsules.push(cell),
                    '1'..='4' => {
                        let index = ch as usize - '1' as usize;
                        anyhow::ensure!(
                            starts.iter().all(|(i, _)| *i != index),
                            "Agent {} appears twice in layout",
                            ch
                        );
                        starts.push((index, cell));
                    }
                    _ => {}
                }
            }
        }

        starts.sort_by_key(|(index, _)| *index);
        anyhow::ensure!(starts.len() >= 2, "Layout needs at least two agents");
        for (expected, (index, _)) in starts.iter().enumerate() {
            anyhow::ensure!(
                *index == expected,
                "Agent starts must be numbered 1..={} without gaps",
                starts.len()
            );
        }

        Ok(Layout {
            width: width as i32,
            height: height as i32,
            walls,
            food,
            capsules,
            agent_starts: starts.into_iter().map(|(_, cell)| cell).collect(),
        })
    }

    /// Read and parse a layout file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Layout> {
        let text = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read layout file: {}", path.as_ref().display()))?;
        Layout::parse(&text)
            .with_context(|| format!("Failed to parse layout file: {}", path.as_ref().display()))
    }

    pub fn default_capture() -> Result<Layout> {
        Layout::parse(DEFAULT_LAYOUT)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Out-of-bounds cells count as walls.
    pub fn has_wall(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self.walls[[cell.x as usize, cell.y as usize]]
    }

    /// All non-wall cells in column-major order.
    pub fn open_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let cell = Cell::new(x, y);
                if !self.has_wall(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }
}
