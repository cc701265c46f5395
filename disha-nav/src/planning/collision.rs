//! Stall-based collision inference.
//!
//! A commanded forward move that produces near-zero displacement means the
//! robot hit something perception did not see. The tracker widens its
//! inferred footprint on consecutive stalls and paints the patch ahead of
//! the robot's prior heading into the persistent collision map, where the
//! traversability builder treats it as an obstacle from then on.

use crate::core::types::{GridCell, Pose};
use crate::grid::Grid;

/// Per-axis displacement below which a move counts as a stall (meters).
const STALL_EPSILON: f32 = 0.05;

/// Cell pitch of the painted footprint (meters).
const FOOTPRINT_PITCH: f32 = 0.05;

/// Collision tracker state.
///
/// Holds only the footprint-width counter; pose history stays with the
/// planner, which passes the relevant pair into [`CollisionTracker::check`].
#[derive(Debug, Clone)]
pub struct CollisionTracker {
    col_width: usize,
}

impl Default for CollisionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionTracker {
    /// Create a tracker with the footprint width at its starting value.
    pub fn new() -> Self {
        Self { col_width: 1 }
    }

    /// Reset the footprint width to its starting value.
    pub fn reset(&mut self) {
        self.col_width = 1;
    }

    /// Current footprint width (cells).
    pub fn width(&self) -> usize {
        self.col_width
    }

    /// Check one completed forward move and paint the collision map if the
    /// displacement confirms a collision.
    ///
    /// On a stall the width counter grows by 2; when the pre-clamp value
    /// lands exactly on 7 the footprint switches to the extended geometry
    /// (length 4, rearward offset 3) for this cycle. The stored counter is
    /// then clamped to 5, so the extended branch retriggers on every later
    /// stall. This mirrors the long-standing behavior of the deployed
    /// planner; see DESIGN.md before changing it.
    pub fn check(
        &mut self,
        last: Pose,
        curr: Pose,
        collision_threshold: f32,
        map_resolution_cm: usize,
        collision_map: &mut Grid,
    ) {
        let mut buf = 4usize;
        let mut length = 2usize;

        let stalled =
            (last.x - curr.x).abs() < STALL_EPSILON && (last.y - curr.y).abs() < STALL_EPSILON;
        if stalled {
            self.col_width += 2;
            if self.col_width == 7 {
                length = 4;
                buf = 3;
                log::debug!("repeated stalls, extending collision footprint");
            }
            self.col_width = self.col_width.min(5);
        } else {
            self.col_width = 1;
        }

        let dist = last.distance(&curr);
        if dist >= collision_threshold {
            return;
        }

        let width = self.col_width;
        log::info!(
            "collision inferred at ({:.2}, {:.2}), painting {}x{} footprint",
            last.x,
            last.y,
            length,
            width
        );

        let (sin_t, cos_t) = last.theta.to_radians().sin_cos();
        let resolution = map_resolution_cm as f32;
        for i in 0..length {
            for j in 0..width {
                let lon = (i + buf) as f32;
                let lat = j as f32 - (width / 2) as f32;
                let wx = last.x + FOOTPRINT_PITCH * (lon * cos_t + lat * sin_t);
                let wy = last.y + FOOTPRINT_PITCH * (lon * sin_t - lat * cos_t);
                let cell = GridCell::new(
                    (wy * 100.0 / resolution) as i32,
                    (wx * 100.0 / resolution) as i32,
                );
                let cell = collision_map.clamp_cell(cell);
                collision_map.set_at(cell, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stalled_pose() -> Pose {
        Pose::new(1.0, 1.0, 0.0)
    }

    #[test]
    fn test_width_progression_on_consecutive_stalls() {
        let mut tracker = CollisionTracker::new();
        let mut map = Grid::new(100, 100);
        assert_eq!(tracker.width(), 1);

        let expected = [3, 5, 5, 5];
        for &want in &expected {
            tracker.check(stalled_pose(), stalled_pose(), 0.2, 5, &mut map);
            assert_eq!(tracker.width(), want);
        }
    }

    #[test]
    fn test_movement_resets_width() {
        let mut tracker = CollisionTracker::new();
        let mut map = Grid::new(100, 100);
        tracker.check(stalled_pose(), stalled_pose(), 0.2, 5, &mut map);
        tracker.check(stalled_pose(), stalled_pose(), 0.2, 5, &mut map);
        assert_eq!(tracker.width(), 5);

        let moved = Pose::new(2.0, 1.0, 0.0);
        tracker.check(stalled_pose(), moved, 0.2, 5, &mut map);
        assert_eq!(tracker.width(), 1);
    }

    #[test]
    fn test_no_painting_above_threshold() {
        let mut tracker = CollisionTracker::new();
        let mut map = Grid::new(100, 100);
        // Sub-stall per-axis displacement would widen the counter, but the
        // total displacement here clears the collision threshold.
        let last = Pose::new(1.0, 1.0, 0.0);
        let curr = Pose::new(1.04, 1.04, 0.0);
        tracker.check(last, curr, 0.05, 5, &mut map);
        assert!(map.is_all_zero());
        assert_eq!(tracker.width(), 3);
    }

    #[test]
    fn test_stall_paints_ahead_of_heading() {
        let mut tracker = CollisionTracker::new();
        let mut map = Grid::new(100, 100);
        // Heading 0 degrees: footprint lands at increasing x (columns),
        // offset by the buffer distance.
        tracker.check(stalled_pose(), stalled_pose(), 0.2, 5, &mut map);
        assert!(map.count_nonzero() > 0);
        for cell in map.nonzero_cells() {
            assert!(cell.col > 20, "footprint should be ahead of the robot");
        }
    }

    #[test]
    fn test_widening_footprints_paint_more_cells() {
        let resolution = 5;
        let mut counts = Vec::new();
        let mut tracker = CollisionTracker::new();
        for _ in 0..4 {
            let mut map = Grid::new(100, 100);
            tracker.check(stalled_pose(), stalled_pose(), 0.2, resolution, &mut map);
            counts.push(map.count_nonzero());
        }
        // Width grows 3 -> 5, then the extended length kicks in.
        assert!(counts[1] >= counts[0]);
        assert!(counts[2] >= counts[1]);
        assert_eq!(counts[2], counts[3]);
    }

    #[test]
    fn test_painting_clamps_to_bounds() {
        let mut tracker = CollisionTracker::new();
        let mut map = Grid::new(20, 20);
        // Robot at the map corner, heading outward: every painted cell must
        // clamp into the grid.
        let pose = Pose::new(0.95, 0.95, 45.0);
        tracker.check(pose, pose, 0.2, 5, &mut map);
        assert!(map.count_nonzero() > 0);
        for cell in map.nonzero_cells() {
            assert!(map.contains(cell));
        }
    }
}
