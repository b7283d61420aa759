use std::collections::VecDeque;

use ndarray::Array2;

use crate::grid::{Cell, Layout};

/// Distance reported between cells with no path (or involving a wall cell).
pub const UNREACHABLE_DISTANCE: u32 = 100_000;

/// Shortest-path distance oracle through the maze corridors.
pub trait MazeDistance {
    fn maze_distance(&self, from: Cell, to: Cell) -> u32;
}

/// All-pairs maze distances, computed once per layout with one BFS per open
/// cell. Lookups are O(1).
#[derive(Clone, Debug)]
pub struct MazeDistancer {
    /// Dense index of each open cell, indexed `[[x, y]]`; `None` for walls.
    cell_index: Array2<Option<usize>>,
    /// `distances[[i, j]]` between dense indices `i` and `j`.
    distances: Array2<u32>,
}

impl MazeDistancer {
    pub fn new(layout: &Layout) -> Self {
        let cells = layout.open_cells();
        let shape = (layout.width as usize, layout.height as usize);
        let mut cell_index = Array2::<Option<usize>>::from_elem(shape, None);
        for (i, cell) in cells.iter().enumerate() {
            cell_index[[cell.x as usize, cell.y as usize]] = Some(i);
        }

        let n = cells.len();
        let mut distances = Array2::<u32>::from_elem((n, n), UNREACHABLE_DISTANCE);
        let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);

        for source in 0..n {
            distances[[source, source]] = 0;
            queue.clear();
            queue.push_back(source);

            while let Some(current) = queue.pop_front() {
                let steps = distances[[source, current]];
                let cell = cells[current];
                for (dx, dy) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
                    let next = cell.offset(dx, dy);
                    if layout.has_wall(next) {
                        continue;
                    }
                    if let Some(j) = cell_index[[next.x as usize, next.y as usize]] {
                        if distances[[source, j]] == UNREACHABLE_DISTANCE {
                            distances[[source, j]] = steps + 1;
                            queue.push_back(j);
                        }
                    }
                }
            }
        }

        Self {
            cell_index,
            distances,
        }
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        self.cell_index
            .get([cell.x as usize, cell.y as usize])
            .copied()
            .flatten()
    }
}

impl MazeDistance for MazeDistancer {
    fn maze_distance(&self, from: Cell, to: Cell) -> u32 {
        match (self.index_of(from), self.index_of(to)) {
            (Some(i), Some(j)) => self.distances[[i, j]],
            _ => UNREACHABLE_DISTANCE,
        }
    }
}

/// Smallest maze distance from `from` to any of `targets`, `None` when
/// `targets` is empty.
pub fn min_distance<D, I>(distancer: &D, from: Cell, targets: I) -> Option<u32>
where
    D: MazeDistance + ?Sized,
    I: IntoIterator<Item = Cell>,
{
    targets
        .into_iter()
        .map(|target| distancer.maze_distance(from, target))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = "
%%%%%%%
%1   2%
%%%%% %
%     %
%%%%%%%
";

    #[test]
    fn test_distance_same_cell() {
        let layout = Layout::parse(CORRIDOR).unwrap();
        let distancer = MazeDistancer::new(&layout);
        assert_eq!(distancer.maze_distance(Cell::new(1, 3), Cell::new(1, 3)), 0);
    }

    #[test]
    fn test_distance_follows_corridors() {
        let layout = Layout::parse(CORRIDOR).unwrap();
        let distancer = MazeDistancer::new(&layout);

        // Straight along the top corridor
        assert_eq!(distancer.maze_distance(Cell::new(1, 3), Cell::new(4, 3)), 3);
        // Around the wall through the gap at x = 5
        assert_eq!(distancer.maze_distance(Cell::new(1, 3), Cell::new(1, 1)), 10);
        assert_eq!(
            distancer.maze_distance(Cell::new(1, 1), Cell::new(1, 3)),
            distancer.maze_distance(Cell::new(1, 3), Cell::new(1, 1))
        );
    }

    #[test]
    fn test_distance_to_wall_is_unreachable() {
        let layout = Layout::parse(CORRIDOR).unwrap();
        let distancer = MazeDistancer::new(&layout);
        assert_eq!(
            distancer.maze_distance(Cell::new(1, 3), Cell::new(0, 0)),
            UNREACHABLE_DISTANCE
        );
        assert_eq!(
            distancer.maze_distance(Cell::new(1, 3), Cell::new(40, 40)),
            UNREACHABLE_DISTANCE
        );
    }

    #[test]
    fn test_disconnected_cells_are_unreachable() {
        let layout = Layout::parse("%%%%%%\n%1%%2%\n%%%%%%\n").unwrap();
        let distancer = MazeDistancer::new(&layout);
        assert_eq!(
            distancer.maze_distance(Cell::new(1, 1), Cell::new(4, 1)),
            UNREACHABLE_DISTANCE
        );
    }

    #[test]
    fn test_min_distance() {
        let layout = Layout::parse(CORRIDOR).unwrap();
        let distancer = MazeDistancer::new(&layout);
        let targets = vec![Cell::new(5, 1), Cell::new(3, 3)];
        assert_eq!(min_distance(&distancer, Cell::new(1, 3), targets), Some(2));
        assert_eq!(min_distance(&distancer, Cell::new(1, 3), Vec::new()), None);
    }
}
