//! Planning pipeline: wavefront distances, traversability, short-term
//! goals, collision inference, and the discrete planner itself.

pub mod collision;
pub mod planner;
pub mod short_term_goal;
pub mod traversability;
pub mod wavefront;

pub use collision::CollisionTracker;
pub use planner::DiscretePlanner;
pub use short_term_goal::{GoalResolution, ShortTermGoalResolver};
pub use wavefront::{nearest_traversable_to_mask, Descent, DistanceField};
