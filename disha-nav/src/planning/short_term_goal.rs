//! Short-term goal resolution.
//!
//! Turns a goal (or frontier) mask into a bounded-step waypoint plus
//! replan/stop signals, by way of a fresh geodesic solve over this cycle's
//! traversability. Two seeding modes exist:
//!
//! - **precise**: a single seed at the closest point of the goal that is
//!   actually reachable; used when the exact goal must be approached.
//! - **dilated**: every cell of the goal mask grown by the goal-dilation
//!   radius seeds the solve; any sufficiently close approach counts, which
//!   is what exploration and frontier targets want.
//!
//! Alongside the locomotion waypoint, a second solve seeded at the agent
//! identifies the goal cells geodesically nearest to it (the "closest goal"
//! mask handed to downstream consumers).

use crate::config::PlannerConfig;
use crate::core::math::cell_distance;
use crate::core::types::{GridCell, PlanningWindow};
use crate::grid::{morphology, Grid};
use crate::planning::traversability;
use crate::planning::wavefront::{nearest_traversable_to_mask, DistanceField};

/// Sentinel standing in for "not a goal cell" / "zero distance" when the
/// goal mask and agent field are combined multiplicatively.
const COMBINE_FILL: f32 = 10000.0;

/// Outcome of one short-term goal resolution.
#[derive(Debug, Clone)]
pub struct GoalResolution {
    /// Waypoint to move toward, in local grid coordinates.
    pub waypoint: GridCell,
    /// Goal cells geodesically nearest to the agent.
    pub closest_goal_mask: Grid,
    /// No admissible path to the goal was found.
    pub replan: bool,
    /// The goal is considered reached.
    pub stop: bool,
    /// Representative closest-goal cell, for orientation.
    pub closest_goal: GridCell,
}

/// Resolver for one planning cycle.
///
/// Borrows the planner's persistent grids and parameters; `resolve` may be
/// invoked more than once per cycle (the frontier fallback re-runs it).
pub struct ShortTermGoalResolver<'a> {
    pub obstacles: &'a Grid,
    pub collision_map: &'a Grid,
    pub visited_map: &'a Grid,
    pub window: PlanningWindow,
    pub config: &'a PlannerConfig,
    pub obs_dilation_radius: usize,
}

impl<'a> ShortTermGoalResolver<'a> {
    /// Resolve a waypoint toward `goal_map` from `agent` (local coords).
    pub fn resolve(&self, goal_map: &Grid, agent: GridCell, dilated_goal: bool) -> GoalResolution {
        if goal_map.is_all_zero() {
            log::warn!("goal mask is empty, nothing to plan toward");
            return GoalResolution {
                waypoint: agent,
                closest_goal_mask: Grid::new(goal_map.rows(), goal_map.cols()),
                replan: true,
                stop: false,
                closest_goal: agent,
            };
        }

        let trav = traversability::build(
            self.obstacles,
            self.collision_map,
            self.visited_map,
            self.window,
            agent,
            self.obs_dilation_radius,
            self.config.agent_cell_radius,
        );
        let padded_goal = goal_map.with_frame(0.0);
        let padded_agent = GridCell::new(agent.row + 1, agent.col + 1);

        // Seed selection per mode.
        let mut navigable_goal = None;
        let seeds = if dilated_goal {
            morphology::dilate(&padded_goal, self.config.goal_dilation_radius)
        } else {
            navigable_goal = nearest_traversable_to_mask(&trav, &padded_goal);
            let mut single = Grid::new(trav.rows(), trav.cols());
            if let Some(cell) = navigable_goal {
                single.set_at(cell, 1.0);
            }
            single
        };

        let field = DistanceField::solve(&trav, &seeds);
        let descent = field.descend(padded_agent, self.config.step_size);
        let waypoint = GridCell::new(descent.cell.row - 1, descent.cell.col - 1);
        let mut replan = descent.replan;
        let mut stop = descent.stop;

        // Closest-goal extraction: distances from the agent, masked onto the
        // goal cells by multiplication. Zeros on either side are pushed to a
        // large fill value so the minimum lands on a reachable goal cell.
        let mut agent_seed = Grid::new(trav.rows(), trav.cols());
        agent_seed.set_at(padded_agent, 1.0);
        let agent_field = DistanceField::solve(&trav, &agent_seed);

        let mut min_product = f32::MAX;
        let mut products = vec![0.0f32; trav.rows() * trav.cols()];
        for r in 0..trav.rows() {
            for c in 0..trav.cols() {
                let g = if padded_goal.get(r, c) == 0.0 {
                    COMBINE_FILL
                } else {
                    padded_goal.get(r, c)
                };
                let mut d = agent_field.distance(GridCell::new(r as i32, c as i32));
                if d == 0.0 {
                    d = COMBINE_FILL;
                }
                let p = g * d;
                products[r * trav.cols() + c] = p;
                if p < min_product {
                    min_product = p;
                }
            }
        }
        let mut padded_mask = Grid::new(trav.rows(), trav.cols());
        for r in 0..trav.rows() {
            for c in 0..trav.cols() {
                if products[r * trav.cols() + c] == min_product {
                    padded_mask.set(r, c, 1.0);
                }
            }
        }
        let closest_goal_mask = padded_mask.without_frame();
        let closest_goal = closest_goal_mask
            .nonzero_cells()
            .first()
            .copied()
            .unwrap_or(agent);

        // In precise mode the metric acceptance thresholds replace the
        // descent-derived signals entirely.
        if !dilated_goal {
            let resolution = self.config.map_resolution_cm as f32;
            let dist_to_goal_cm = cell_distance(agent, closest_goal) * resolution;
            stop = dist_to_goal_cm < self.config.min_goal_distance_cm;
            replan = match navigable_goal {
                Some(nav) => {
                    let nav_local = GridCell::new(nav.row - 1, nav.col - 1);
                    cell_distance(agent, nav_local) * resolution > self.config.min_goal_distance_cm
                }
                // No navigable stand-in exists at all
                None => true,
            };
            log::debug!(
                "precise goal: dist_to_goal={:.1}cm stop={} replan={}",
                dist_to_goal_cm,
                stop,
                replan
            );
        }

        log::debug!(
            "short-term goal: waypoint=({}, {}) replan={} stop={}",
            waypoint.row,
            waypoint.col,
            replan,
            stop
        );

        GoalResolution {
            waypoint,
            closest_goal_mask,
            replan,
            stop,
            closest_goal,
        }
    }
}
