//! Value types shared across the planner.

use serde::{Deserialize, Serialize};

/// Robot pose in the global frame.
///
/// Position (x, y) in meters, heading in degrees. The upstream pose
/// estimator reports headings in degrees and the turn increment is
/// configured in degrees, so the planner keeps that unit throughout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Heading in degrees
    pub theta: f32,
}

impl Pose {
    /// Create a new pose.
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// Euclidean distance to another pose (meters).
    #[inline]
    pub fn distance(&self, other: &Pose) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A grid cell as (row, col). Signed so intermediate results of coordinate
/// conversion can fall outside the grid before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    /// Create a new cell.
    #[inline]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Offsets mapping a local grid window into the global map frame.
///
/// `(gx1, gx2)` bound the rows and `(gy1, gy2)` the columns of the window
/// within the global map: local `(r, c)` is global `(r + gx1, c + gy1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningWindow {
    pub gx1: i32,
    pub gx2: i32,
    pub gy1: i32,
    pub gy2: i32,
}

impl PlanningWindow {
    /// Create a new window.
    pub fn new(gx1: i32, gx2: i32, gy1: i32, gy2: i32) -> Self {
        Self { gx1, gx2, gy1, gy2 }
    }
}

/// A discrete motion command, one per control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscreteAction {
    MoveForward,
    TurnLeft,
    TurnRight,
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pose_distance() {
        let a = Pose::new(0.0, 0.0, 0.0);
        let b = Pose::new(3.0, 4.0, 90.0);
        assert_relative_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_window_maps_local_to_global() {
        let w = PlanningWindow::new(10, 50, 20, 60);
        let local = GridCell::new(5, 7);
        assert_eq!(local.row + w.gx1, 15);
        assert_eq!(local.col + w.gy1, 27);
    }
}
