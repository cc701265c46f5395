//! Configuration for the discrete planner.

use crate::error::{DishaError, Result};
use serde::Deserialize;
use std::path::Path;

/// Planner configuration.
///
/// All values are fixed at construction; the planner never re-derives them.
/// Distances mix units the way the upstream mapper reports them: poses are
/// in meters, map geometry in centimeters, grid quantities in cells.
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Agent turn increment per TurnLeft/TurnRight action (degrees).
    #[serde(default = "default_turn_angle")]
    pub turn_angle_deg: f32,

    /// Forward displacement below which a commanded move counts as a
    /// collision (meters).
    #[serde(default = "default_collision_threshold")]
    pub collision_threshold: f32,

    /// Maximum number of cells the short-term goal may lie from the agent.
    #[serde(default = "default_step_size")]
    pub step_size: usize,

    /// Initial obstacle-dilation structuring-element radius (cells).
    #[serde(default = "default_obs_dilation_radius")]
    pub obs_dilation_radius: usize,

    /// Floor for the adaptive obstacle-dilation radius (cells).
    #[serde(default = "default_min_obs_dilation_radius")]
    pub min_obs_dilation_radius: usize,

    /// Goal-dilation structuring-element radius (cells), used when planning
    /// to an approach region instead of an exact goal cell.
    #[serde(default = "default_goal_dilation_radius")]
    pub goal_dilation_radius: usize,

    /// Global map side length (centimeters).
    #[serde(default = "default_map_size_cm")]
    pub map_size_cm: usize,

    /// Size of one map cell (centimeters).
    #[serde(default = "default_map_resolution_cm")]
    pub map_resolution_cm: usize,

    /// Metric distance under which the goal counts as reached (centimeters).
    #[serde(default = "default_min_goal_distance_cm")]
    pub min_goal_distance_cm: f32,

    /// Radius of the always-traversable disk around the agent's cell.
    #[serde(default = "default_agent_cell_radius")]
    pub agent_cell_radius: usize,

    /// Seed for the orientation-target sampler (0 = entropy-seeded).
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            turn_angle_deg: default_turn_angle(),
            collision_threshold: default_collision_threshold(),
            step_size: default_step_size(),
            obs_dilation_radius: default_obs_dilation_radius(),
            min_obs_dilation_radius: default_min_obs_dilation_radius(),
            goal_dilation_radius: default_goal_dilation_radius(),
            map_size_cm: default_map_size_cm(),
            map_resolution_cm: default_map_resolution_cm(),
            min_goal_distance_cm: default_min_goal_distance_cm(),
            agent_cell_radius: default_agent_cell_radius(),
            seed: default_seed(),
        }
    }
}

// Default value functions
fn default_turn_angle() -> f32 {
    30.0
}
fn default_collision_threshold() -> f32 {
    0.20
}
fn default_step_size() -> usize {
    5
}
fn default_obs_dilation_radius() -> usize {
    3
}
fn default_min_obs_dilation_radius() -> usize {
    1
}
fn default_goal_dilation_radius() -> usize {
    10
}
fn default_map_size_cm() -> usize {
    4800
}
fn default_map_resolution_cm() -> usize {
    5
}
fn default_min_goal_distance_cm() -> f32 {
    60.0
}
fn default_agent_cell_radius() -> usize {
    1
}
fn default_seed() -> u64 {
    0
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DishaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: PlannerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration, rejecting values the planner cannot run
    /// with rather than failing deep inside the solver.
    pub fn validate(&self) -> Result<()> {
        if self.map_resolution_cm == 0 {
            return Err(DishaError::Config("map_resolution_cm must be > 0".into()));
        }
        if self.map_size_cm == 0 || self.map_size_cm % self.map_resolution_cm != 0 {
            return Err(DishaError::Config(format!(
                "map_size_cm ({}) must be a positive multiple of map_resolution_cm ({})",
                self.map_size_cm, self.map_resolution_cm
            )));
        }
        if self.step_size == 0 {
            return Err(DishaError::Config("step_size must be > 0".into()));
        }
        if self.turn_angle_deg <= 0.0 {
            return Err(DishaError::Config("turn_angle_deg must be > 0".into()));
        }
        if self.collision_threshold <= 0.0 {
            return Err(DishaError::Config("collision_threshold must be > 0".into()));
        }
        if self.min_goal_distance_cm <= 0.0 {
            return Err(DishaError::Config("min_goal_distance_cm must be > 0".into()));
        }
        if self.obs_dilation_radius < self.min_obs_dilation_radius {
            return Err(DishaError::Config(format!(
                "obs_dilation_radius ({}) below its floor ({})",
                self.obs_dilation_radius, self.min_obs_dilation_radius
            )));
        }
        Ok(())
    }

    /// Global map side length in cells.
    pub fn map_cells(&self) -> usize {
        self.map_size_cm / self.map_resolution_cm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.map_cells(), 960);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let config = PlannerConfig {
            map_resolution_cm: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_indivisible_map_size_rejected() {
        let config = PlannerConfig {
            map_size_cm: 4801,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_step_size_rejected() {
        let config = PlannerConfig {
            step_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dilation_radius_below_floor_rejected() {
        let config = PlannerConfig {
            obs_dilation_radius: 1,
            min_obs_dilation_radius: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_from_toml() {
        let config: PlannerConfig = toml::from_str(
            r#"
            turn_angle_deg = 15.0
            step_size = 3
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.turn_angle_deg, 15.0);
        assert_eq!(config.step_size, 3);
        assert_eq!(config.seed, 42);
        // Unspecified fields fall back to defaults
        assert_eq!(config.map_size_cm, 4800);
    }
}
