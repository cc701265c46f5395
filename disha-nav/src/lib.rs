//! DishaNav - discrete motion-decision core for grid navigation
//!
//! Given a local occupancy window, a goal mask, and the robot's pose,
//! DishaNav produces exactly one discrete motion command per control cycle
//! (turn left, turn right, move forward, or stop) plus the set of cells
//! deemed closest reachable goal. Routing decisions come from an
//! obstacle-respecting geodesic distance field, not straight-line
//! heuristics, so goals behind walls and furniture are approached through
//! real openings instead of oscillating against the nearest surface.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   planning/planner                  │  ← Per-cycle state machine
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │    planning/{short_term_goal, collision,            │  ← Cycle pipeline
//! │               traversability, wavefront}            │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                grid/ (storage, morphology)          │  ← Grid primitives
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 core/ (types, math)                 │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The crate is synchronous and single-threaded: one [`DiscretePlanner`]
//! instance owns all persistent state for an episode, and the external
//! control loop calls [`DiscretePlanner::plan`] once per cycle. Perception
//! (which produces the grids and pose) and actuation (which executes the
//! returned action) live outside this crate.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Grid primitives (depends on core)
// ============================================================================
pub mod grid;

// ============================================================================
// Layer 3: Planning pipeline (depends on core, grid)
// ============================================================================
pub mod planning;

// ============================================================================
// Crate-wide configuration and errors
// ============================================================================
pub mod config;
pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================
pub use crate::core::math;
pub use crate::core::types::{DiscreteAction, GridCell, PlanningWindow, Pose};
pub use config::PlannerConfig;
pub use error::{DishaError, Result};
pub use grid::{morphology, Grid};
pub use planning::{
    CollisionTracker, Descent, DiscretePlanner, DistanceField, GoalResolution,
    ShortTermGoalResolver,
};
