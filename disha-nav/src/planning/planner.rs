//! Discrete planner: one action per control cycle.
//!
//! The planner owns every piece of persistent navigation state for an
//! episode (collision and visited maps, pose history, the adaptive obstacle
//! dilation radius, the cycle counter) and exposes two operations:
//! [`DiscretePlanner::reset`] at episode start and [`DiscretePlanner::plan`]
//! once per cycle. Each cycle runs pose conversion, visited marking,
//! collision checking, short-term goal resolution (with a frontier fallback
//! when the goal proves unreachable), and a deadbanded bearing policy that
//! emits exactly one of the four discrete actions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PlannerConfig;
use crate::core::math::{bearing_deg, cell_distance, normalize_angle_deg};
use crate::core::types::{DiscreteAction, GridCell, PlanningWindow, Pose};
use crate::error::{DishaError, Result};
use crate::grid::Grid;
use crate::planning::collision::CollisionTracker;
use crate::planning::short_term_goal::ShortTermGoalResolver;

/// Stateful discrete planner, one instance per episode.
pub struct DiscretePlanner {
    config: PlannerConfig,
    collision_map: Grid,
    visited_map: Grid,
    collision: CollisionTracker,
    last_pose: Option<Pose>,
    curr_pose: Pose,
    last_action: Option<DiscreteAction>,
    timestep: u64,
    obs_dilation_radius: usize,
    rng: StdRng,
}

impl DiscretePlanner {
    /// Create a planner. Fails eagerly on an invalid configuration.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let rng = if config.seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(config.seed)
        };
        let map_cells = config.map_cells();
        let center_m = config.map_size_cm as f32 / 100.0 / 2.0;
        let obs_dilation_radius = config.obs_dilation_radius;
        Ok(Self {
            config,
            collision_map: Grid::new(map_cells, map_cells),
            visited_map: Grid::new(map_cells, map_cells),
            collision: CollisionTracker::new(),
            last_pose: None,
            curr_pose: Pose::new(center_m, center_m, 0.0),
            last_action: None,
            timestep: 1,
            obs_dilation_radius,
            rng,
        })
    }

    /// Reset all episode state: both persistent maps zeroed, the dilation
    /// radius restored, the footprint width and cycle counter back to 1,
    /// pose history cleared to the map center.
    pub fn reset(&mut self) {
        self.collision_map.zero();
        self.visited_map.zero();
        self.collision.reset();
        self.last_pose = None;
        let center_m = self.config.map_size_cm as f32 / 100.0 / 2.0;
        self.curr_pose = Pose::new(center_m, center_m, 0.0);
        self.last_action = None;
        self.timestep = 1;
        self.obs_dilation_radius = self.config.obs_dilation_radius;
    }

    /// Plan one discrete action.
    ///
    /// `obstacle_map`, `goal_map` and `frontier_map` are equal-shaped local
    /// windows; `window` maps them into the global frame. `found_goal`
    /// marks whether the upstream goal detector has actually seen the goal
    /// this cycle; `use_dilated_goal` selects approach-region seeding for
    /// the first resolution attempt.
    ///
    /// Returns the action together with the closest-goal mask.
    #[allow(clippy::too_many_arguments)]
    pub fn plan(
        &mut self,
        obstacle_map: &Grid,
        goal_map: &Grid,
        frontier_map: &Grid,
        pose: Pose,
        window: PlanningWindow,
        found_goal: bool,
        use_dilated_goal: bool,
    ) -> Result<(DiscreteAction, Grid)> {
        if !obstacle_map.same_shape(goal_map) || !obstacle_map.same_shape(frontier_map) {
            return Err(DishaError::GridShape(format!(
                "obstacle {}x{}, goal {}x{}, frontier {}x{}",
                obstacle_map.rows(),
                obstacle_map.cols(),
                goal_map.rows(),
                goal_map.cols(),
                frontier_map.rows(),
                frontier_map.cols()
            )));
        }

        let mut obstacles = obstacle_map.clone();
        obstacles.binarize();

        self.last_pose = Some(self.curr_pose);
        let resolution = self.config.map_resolution_cm as f32;
        let start = obstacles.clamp_cell(GridCell::new(
            (pose.y * 100.0 / resolution - window.gx1 as f32) as i32,
            (pose.x * 100.0 / resolution - window.gy1 as f32) as i32,
        ));
        self.curr_pose = pose;

        let global_start = GridCell::new(start.row + window.gx1, start.col + window.gy1);
        if self.visited_map.contains(global_start) {
            self.visited_map.set_at(global_start, 1.0);
        }

        if self.last_action == Some(DiscreteAction::MoveForward) {
            if let Some(last) = self.last_pose {
                self.collision.check(
                    last,
                    self.curr_pose,
                    self.config.collision_threshold,
                    self.config.map_resolution_cm,
                    &mut self.collision_map,
                );
            }
        }

        let mut found_goal = found_goal;
        let mut resolution_result = {
            let resolver = ShortTermGoalResolver {
                obstacles: &obstacles,
                collision_map: &self.collision_map,
                visited_map: &self.visited_map,
                window,
                config: &self.config,
                obs_dilation_radius: self.obs_dilation_radius,
            };
            resolver.resolve(goal_map, start, use_dilated_goal)
        };

        // No admissible path to the goal: drop the accumulated collision
        // evidence, relax the obstacle inflation one step, and if the goal
        // had actually been seen, fall back to exploring the frontier.
        if resolution_result.replan && !resolution_result.stop {
            self.collision_map.zero();
            if self.obs_dilation_radius > self.config.min_obs_dilation_radius {
                self.obs_dilation_radius -= 1;
                log::debug!("reduced obstacle dilation to {}", self.obs_dilation_radius);
            }
            if found_goal {
                log::info!("goal unreachable, replanning toward the frontier");
                let resolver = ShortTermGoalResolver {
                    obstacles: &obstacles,
                    collision_map: &self.collision_map,
                    visited_map: &self.visited_map,
                    window,
                    config: &self.config,
                    obs_dilation_radius: self.obs_dilation_radius,
                };
                resolution_result = resolver.resolve(frontier_map, start, true);
                found_goal = false;
            }
        }

        self.timestep += 1;

        // Guard the orientation-target sample: an empty closest-goal mask
        // means upstream handed us no goal at all this cycle.
        let goal_cells = resolution_result.closest_goal_mask.nonzero_cells();
        if goal_cells.is_empty() {
            log::warn!("no goal available, stopping");
            self.last_action = Some(DiscreteAction::Stop);
            return Ok((DiscreteAction::Stop, resolution_result.closest_goal_mask));
        }

        // Bearing error to the waypoint drives locomotion.
        let relative_angle =
            normalize_angle_deg(pose.theta - bearing_deg(start, resolution_result.waypoint));

        // A uniformly sampled closest-goal cell drives final orientation.
        let target = goal_cells[self.rng.gen_range(0..goal_cells.len())];
        let distance_to_goal_cm = cell_distance(start, target) * resolution;
        let relative_angle_goal = normalize_angle_deg(pose.theta - bearing_deg(start, target));

        log::debug!(
            "cycle {}: waypoint angle {:.1}°, goal angle {:.1}°, goal distance {:.0}cm, \
             found_goal={}, stop={}",
            self.timestep,
            relative_angle,
            relative_angle_goal,
            distance_to_goal_cm,
            found_goal,
            resolution_result.stop
        );

        let turn = self.config.turn_angle_deg;
        let action = if !(found_goal && resolution_result.stop) {
            // Cruise toward the waypoint with a half-turn deadband.
            if relative_angle > turn / 2.0 {
                DiscreteAction::TurnRight
            } else if relative_angle < -turn / 2.0 {
                DiscreteAction::TurnLeft
            } else {
                DiscreteAction::MoveForward
            }
        } else {
            // Within stopping range: align to the sampled goal point under a
            // tighter deadband before committing to the stop.
            if relative_angle_goal > 2.0 * turn / 3.0 {
                DiscreteAction::TurnRight
            } else if relative_angle_goal < -2.0 * turn / 3.0 {
                DiscreteAction::TurnLeft
            } else {
                log::info!("goal reached, stopping");
                DiscreteAction::Stop
            }
        };

        self.last_action = Some(action);
        Ok((action, resolution_result.closest_goal_mask))
    }

    /// Configuration in effect.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Current cycle counter.
    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    /// Current adaptive obstacle-dilation radius.
    pub fn obs_dilation_radius(&self) -> usize {
        self.obs_dilation_radius
    }

    /// The persistent collision accumulator.
    pub fn collision_map(&self) -> &Grid {
        &self.collision_map
    }

    /// The persistent visited accumulator.
    pub fn visited_map(&self) -> &Grid {
        &self.visited_map
    }

    /// Current collision footprint width (cells).
    pub fn collision_width(&self) -> usize {
        self.collision.width()
    }

    /// The action chosen on the most recent cycle.
    pub fn last_action(&self) -> Option<DiscreteAction> {
        self.last_action
    }
}
