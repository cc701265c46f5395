//! Geodesic distance fields via wavefront expansion.
//!
//! Straight-line proximity is not navigability: a wall can put a metrically
//! close goal arbitrarily far away in traversal cost. The planner therefore
//! works on a distance field propagated outward from the goal across
//! traversable cells only, so that descending the field always yields an
//! obstacle-respecting route.
//!
//! # Algorithm
//!
//! Brushfire expansion over the 8-connected grid: axis steps cost 1, diagonal
//! steps √2. Cells the front never reaches hold a sentinel one larger than
//! the longest real distance, so downstream arithmetic over the field stays
//! finite.

use std::collections::VecDeque;

use crate::core::types::GridCell;
use crate::grid::Grid;

const SQRT2: f32 = std::f32::consts::SQRT_2;

/// 8-connected neighbor offsets with step costs.
const NEIGHBORS: [(i32, i32, f32); 8] = [
    (-1, 0, 1.0),
    (1, 0, 1.0),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (-1, -1, SQRT2),
    (1, -1, SQRT2),
    (-1, 1, SQRT2),
    (1, 1, SQRT2),
];

/// Result of a steepest-descent walk over a distance field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descent {
    /// Cell the walk ended on.
    pub cell: GridCell,
    /// The start cell was unreachable from any seed.
    pub replan: bool,
    /// The walk terminated on the start cell itself.
    pub stop: bool,
}

/// A solved geodesic distance field over a traversability grid.
#[derive(Clone, Debug)]
pub struct DistanceField {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
    sentinel: f32,
}

impl DistanceField {
    /// Propagate distance outward from every set cell of `seeds` across
    /// traversable cells of `traversable` (1 = passable).
    ///
    /// Seeds on untraversable cells contribute nothing; the front never
    /// enters a blocked cell. Both grids must share a shape.
    pub fn solve(traversable: &Grid, seeds: &Grid) -> Self {
        assert!(
            traversable.same_shape(seeds),
            "traversability and seed grids must share a shape"
        );
        let rows = traversable.rows();
        let cols = traversable.cols();
        let mut data = vec![f32::MAX; rows * cols];
        let mut queue = VecDeque::new();

        for r in 0..rows {
            for c in 0..cols {
                if seeds.get(r, c) > 0.5 && traversable.get(r, c) > 0.5 {
                    data[r * cols + c] = 0.0;
                    queue.push_back((r as i32, c as i32));
                }
            }
        }

        while let Some((r, c)) = queue.pop_front() {
            let current = data[r as usize * cols + c as usize];
            for &(dr, dc, cost) in &NEIGHBORS {
                let nr = r + dr;
                let nc = c + dc;
                if nr < 0 || nc < 0 || nr >= rows as i32 || nc >= cols as i32 {
                    continue;
                }
                if traversable.get(nr as usize, nc as usize) <= 0.5 {
                    continue;
                }
                let idx = nr as usize * cols + nc as usize;
                let next = current + cost;
                if next < data[idx] {
                    data[idx] = next;
                    queue.push_back((nr, nc));
                }
            }
        }

        // Fill unreached cells with one more than the longest real distance,
        // keeping the field finite everywhere.
        let max_reached = data
            .iter()
            .copied()
            .filter(|&d| d != f32::MAX)
            .fold(0.0f32, f32::max);
        let sentinel = max_reached + 1.0;
        for d in &mut data {
            if *d == f32::MAX {
                *d = sentinel;
            }
        }

        Self {
            rows,
            cols,
            data,
            sentinel,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance at a cell. The cell must be in bounds.
    #[inline]
    pub fn distance(&self, cell: GridCell) -> f32 {
        self.data[cell.row as usize * self.cols + cell.col as usize]
    }

    /// The value held by cells the front never reached.
    #[inline]
    pub fn sentinel(&self) -> f32 {
        self.sentinel
    }

    /// Whether a cell was never reached by the front.
    #[inline]
    pub fn is_unreachable(&self, cell: GridCell) -> bool {
        self.distance(cell) >= self.sentinel
    }

    /// Follow the steepest-descent direction from `start` for at most
    /// `step_size` cells.
    ///
    /// `replan` is set when `start` itself is unreachable from the seeds;
    /// `stop` when no neighbor improves on the start cell (the agent is
    /// already sitting on a seed, or nothing around it is better).
    pub fn descend(&self, start: GridCell, step_size: usize) -> Descent {
        let replan = self.is_unreachable(start);
        let mut current = start;
        for _ in 0..step_size {
            let mut best = current;
            let mut best_dist = self.distance(current);
            for &(dr, dc, _) in &NEIGHBORS {
                let next = GridCell::new(current.row + dr, current.col + dc);
                if next.row < 0
                    || next.col < 0
                    || next.row >= self.rows as i32
                    || next.col >= self.cols as i32
                {
                    continue;
                }
                let d = self.distance(next);
                if d < best_dist {
                    best_dist = d;
                    best = next;
                }
            }
            if best == current {
                break;
            }
            current = best;
        }
        Descent {
            cell: current,
            replan,
            stop: current == start,
        }
    }
}

/// Find the traversable cell geodesically nearest to a mask.
///
/// Expands a front from every set mask cell across the whole grid (blocked
/// cells included, so a goal buried inside an obstacle still resolves to
/// its closest reachable stand-in) and returns the first traversable cell
/// at minimal distance. Returns `None` when the mask is empty or the grid
/// has no traversable cell.
pub fn nearest_traversable_to_mask(traversable: &Grid, mask: &Grid) -> Option<GridCell> {
    assert!(
        traversable.same_shape(mask),
        "traversability and mask grids must share a shape"
    );
    let rows = traversable.rows();
    let cols = traversable.cols();
    let mut dist = vec![f32::MAX; rows * cols];
    let mut queue = VecDeque::new();

    for r in 0..rows {
        for c in 0..cols {
            if mask.get(r, c) > 0.5 {
                dist[r * cols + c] = 0.0;
                queue.push_back((r as i32, c as i32));
            }
        }
    }
    if queue.is_empty() {
        return None;
    }

    while let Some((r, c)) = queue.pop_front() {
        let current = dist[r as usize * cols + c as usize];
        for &(dr, dc, cost) in &NEIGHBORS {
            let nr = r + dr;
            let nc = c + dc;
            if nr < 0 || nc < 0 || nr >= rows as i32 || nc >= cols as i32 {
                continue;
            }
            let idx = nr as usize * cols + nc as usize;
            let next = current + cost;
            if next < dist[idx] {
                dist[idx] = next;
                queue.push_back((nr, nc));
            }
        }
    }

    let mut best: Option<(GridCell, f32)> = None;
    for r in 0..rows {
        for c in 0..cols {
            if traversable.get(r, c) <= 0.5 {
                continue;
            }
            let d = dist[r * cols + c];
            if d == f32::MAX {
                continue;
            }
            match best {
                Some((_, bd)) if bd <= d => {}
                _ => best = Some((GridCell::new(r as i32, c as i32), d)),
            }
        }
    }
    best.map(|(cell, _)| cell)
}
