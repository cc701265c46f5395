//! Per-cycle traversability construction.
//!
//! The traversability grid is rebuilt from scratch every planning cycle:
//! dilated obstacles are inverted, accumulated collision cells are forced
//! blocked, visited cells forced free, and a disk around the agent forced
//! free so the planner can never wall itself in. The result carries a
//! 1-cell impassable frame so descent and propagation stay in bounds.

use crate::core::types::{GridCell, PlanningWindow};
use crate::grid::{morphology, Grid};

/// Build the framed traversability grid for one cycle.
///
/// `obstacles` is the binarized local window; `collision_map` and
/// `visited_map` are the persistent global accumulators, sampled through
/// `window`. `agent` is in local coordinates. The returned grid is
/// `(rows+2) x (cols+2)` with a blocked frame.
pub fn build(
    obstacles: &Grid,
    collision_map: &Grid,
    visited_map: &Grid,
    window: PlanningWindow,
    agent: GridCell,
    obs_dilation_radius: usize,
    agent_cell_radius: usize,
) -> Grid {
    let dilated = morphology::dilate(obstacles, obs_dilation_radius);

    let mut trav = Grid::new(obstacles.rows(), obstacles.cols());
    for r in 0..trav.rows() {
        for c in 0..trav.cols() {
            let mut free = 1.0 - dilated.get(r, c);
            let global = GridCell::new(r as i32 + window.gx1, c as i32 + window.gy1);
            if collision_map.contains(global) && collision_map.at(global) == 1.0 {
                free = 0.0;
            }
            if visited_map.contains(global) && visited_map.at(global) == 1.0 {
                free = 1.0;
            }
            trav.set(r, c, free);
        }
    }

    // The agent's own footprint is traversable no matter what the obstacle
    // and collision data claim about it.
    for (dr, dc) in morphology::disk(agent_cell_radius) {
        let cell = GridCell::new(agent.row + dr, agent.col + dc);
        if trav.contains(cell) {
            trav.set_at(cell, 1.0);
        }
    }

    trav.with_frame(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_window(n: i32) -> PlanningWindow {
        PlanningWindow::new(0, n, 0, n)
    }

    #[test]
    fn test_open_map_is_traversable_inside_frame() {
        let obstacles = Grid::new(8, 8);
        let collision = Grid::new(8, 8);
        let visited = Grid::new(8, 8);
        let trav = build(
            &obstacles,
            &collision,
            &visited,
            full_window(8),
            GridCell::new(4, 4),
            1,
            1,
        );
        assert_eq!(trav.rows(), 10);
        assert_eq!(trav.get(5, 5), 1.0);
        // Frame is blocked
        assert_eq!(trav.get(0, 0), 0.0);
        assert_eq!(trav.get(9, 9), 0.0);
    }

    #[test]
    fn test_obstacles_dilate_into_blocked_region() {
        let mut obstacles = Grid::new(9, 9);
        obstacles.set(4, 4, 1.0);
        let collision = Grid::new(9, 9);
        let visited = Grid::new(9, 9);
        let trav = build(
            &obstacles,
            &collision,
            &visited,
            full_window(9),
            GridCell::new(0, 0),
            2,
            1,
        );
        // Framed coordinates: +1. The obstacle and its dilation are blocked.
        assert_eq!(trav.get(5, 5), 0.0);
        assert_eq!(trav.get(5, 7), 0.0);
        // Outside the dilation radius stays free
        assert_eq!(trav.get(5, 8), 1.0);
    }

    #[test]
    fn test_collision_cells_forced_blocked() {
        let obstacles = Grid::new(8, 8);
        let mut collision = Grid::new(8, 8);
        collision.set(3, 3, 1.0);
        let visited = Grid::new(8, 8);
        let trav = build(
            &obstacles,
            &collision,
            &visited,
            full_window(8),
            GridCell::new(0, 0),
            1,
            1,
        );
        assert_eq!(trav.get(4, 4), 0.0);
    }

    #[test]
    fn test_visited_cells_override_obstacles() {
        let mut obstacles = Grid::new(8, 8);
        obstacles.set(3, 3, 1.0);
        let collision = Grid::new(8, 8);
        let mut visited = Grid::new(8, 8);
        visited.set(3, 3, 1.0);
        let trav = build(
            &obstacles,
            &collision,
            &visited,
            full_window(8),
            GridCell::new(0, 0),
            0,
            1,
        );
        assert_eq!(trav.get(4, 4), 1.0);
    }

    #[test]
    fn test_agent_footprint_always_traversable() {
        let mut obstacles = Grid::new(8, 8);
        obstacles.set(4, 4, 1.0);
        let mut collision = Grid::new(8, 8);
        collision.set(4, 4, 1.0);
        let visited = Grid::new(8, 8);
        let trav = build(
            &obstacles,
            &collision,
            &visited,
            full_window(8),
            GridCell::new(4, 4),
            2,
            1,
        );
        // Agent cell and its disk are free despite obstacle + collision
        assert_eq!(trav.get(5, 5), 1.0);
        assert_eq!(trav.get(4, 5), 1.0);
        assert_eq!(trav.get(6, 5), 1.0);
    }

    #[test]
    fn test_window_offsets_sample_global_maps() {
        let obstacles = Grid::new(4, 4);
        let mut collision = Grid::new(16, 16);
        // Global (6, 7) is local (1, 2) under a (5, 5) window offset
        collision.set(6, 7, 1.0);
        let visited = Grid::new(16, 16);
        let trav = build(
            &obstacles,
            &collision,
            &visited,
            PlanningWindow::new(5, 9, 5, 9),
            GridCell::new(0, 0),
            1,
            0,
        );
        assert_eq!(trav.get(2, 3), 0.0);
    }
}
