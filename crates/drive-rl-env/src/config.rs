//! Driving environment configuration
//!
//! A [`DriveConfig`] is loaded once and never mutated. Every construction
//! path goes through [`DriveConfig::validate`], so the rest of the crate can
//! divide by the stage extent, target speed and turn rate without guards.

use std::cmp::Ordering;
use std::path::Path;

use drive_rl_core::{EnvironmentConfig, RLError, Result};
use serde::{Deserialize, Serialize};

/// Which reward terms feed the per-step total.
///
/// The direction and speed bonuses are always computed and reported; this
/// only decides whether they are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardPolicy {
    /// Progress, heading, goal-sight and tick terms only
    #[default]
    ProgressOnly,
    /// Additionally sum the direction and speed bonuses
    Composite,
}

/// Reward magnitudes. Penalties are stored as positive numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Multiplier on normalized distance closed per step
    pub progress_scale: f64,
    /// Multiplier on the negative heading dot product
    pub heading_penalty_scale: f64,
    /// Flat bonus when the forward ray sees the goal
    pub goal_sight_bonus: f64,
    /// Charged once per fixed physics tick
    pub tick_cost: f64,
    /// One-time penalty for hitting a wall or obstacle
    pub collision_penalty: f64,
    /// One-time reward for entering the goal
    pub goal_reward: f64,
    /// Multiplier on the heading dot product (diagnostic)
    pub direction_bonus_scale: f64,
    /// Lower clamp of the speed-toward-goal bonus (diagnostic)
    pub speed_bonus_min: f64,
    /// Upper clamp of the speed-toward-goal bonus (diagnostic)
    pub speed_bonus_max: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            progress_scale: 5.0,
            heading_penalty_scale: 0.05,
            goal_sight_bonus: 0.001,
            tick_cost: 0.001,
            collision_penalty: 5.0,
            goal_reward: 5.0,
            direction_bonus_scale: 0.01,
            speed_bonus_min: -0.05,
            speed_bonus_max: 0.10,
        }
    }
}

/// Immutable configuration of the driving agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Half the stage width along x; spawns lie in `[-x, x]`
    pub stage_half_extent_x: f64,
    /// Half the stage depth along z; spawns lie in `[-z, z]`
    pub stage_half_extent_z: f64,
    /// Height at which agent, goal and obstacles are placed
    pub spawn_height: f64,
    /// Cruising speed at full forward input, units per second
    pub target_speed: f64,
    /// Turn rate at full turn input, degrees per second
    pub target_turn_rate: f64,
    /// Minimum agent–goal distance as a fraction of the full stage width
    pub goal_separation_factor: f64,
    /// Extra clearance added to every obstacle footprint during placement
    pub obstacle_margin: f64,
    /// Footprint radius of each obstacle; the length is the obstacle count
    pub obstacle_footprints: Vec<f64>,
    /// Range of the forward goal-sight ray
    pub goal_ray_range: f64,
    /// Cap on rejection-sampling attempts per placed entity
    pub max_placement_attempts: usize,
    /// Length of one fixed physics tick in seconds
    pub fixed_delta_time: f64,
    /// Physics ticks taken per policy decision
    pub physics_ticks_per_decision: u32,
    /// Reward magnitudes
    pub rewards: RewardWeights,
    /// Which terms are summed into the reward
    pub reward_policy: RewardPolicy,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            stage_half_extent_x: 20.0,
            stage_half_extent_z: 20.0,
            spawn_height: 0.5,
            target_speed: 10.0,
            target_turn_rate: 100.0,
            goal_separation_factor: 0.25,
            obstacle_margin: 0.0,
            obstacle_footprints: vec![2.0; 4],
            goal_ray_range: 30.0,
            max_placement_attempts: 10_000,
            fixed_delta_time: 0.02,
            physics_ticks_per_decision: 1,
            rewards: RewardWeights::default(),
            reward_policy: RewardPolicy::ProgressOnly,
        }
    }
}

impl DriveConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build from the generic environment parameters.
    ///
    /// Missing keys fall back to the defaults; unknown keys are ignored.
    pub fn from_env_config(env_config: &EnvironmentConfig) -> Result<Self> {
        let config: Self =
            serde_json::from_value(serde_json::Value::Object(env_config.params.clone()))?;
        config.validate()?;
        Ok(config)
    }

    /// Full stage width along x
    #[must_use]
    pub fn stage_width_x(&self) -> f64 {
        2.0 * self.stage_half_extent_x
    }

    /// Agent and goal start at least this far apart
    #[must_use]
    pub fn min_goal_separation(&self) -> f64 {
        self.goal_separation_factor * self.stage_width_x()
    }

    /// Range of the rear obstruction ray: half the stage depth
    #[must_use]
    pub fn rear_ray_range(&self) -> f64 {
        self.stage_half_extent_z
    }

    /// Simulated time covered by one policy decision
    #[must_use]
    pub fn decision_interval(&self) -> f64 {
        self.fixed_delta_time * f64::from(self.physics_ticks_per_decision)
    }

    /// Reject configurations the core cannot run with
    pub fn validate(&self) -> Result<()> {
        positive("stage_half_extent_x", self.stage_half_extent_x)?;
        positive("stage_half_extent_z", self.stage_half_extent_z)?;
        // sampling spans the full width and depth
        positive("stage width", self.stage_width_x())?;
        positive("stage depth", 2.0 * self.stage_half_extent_z)?;
        positive("target_speed", self.target_speed)?;
        positive("target_turn_rate", self.target_turn_rate)?;
        positive("goal_ray_range", self.goal_ray_range)?;
        positive("fixed_delta_time", self.fixed_delta_time)?;
        non_negative("goal_separation_factor", self.goal_separation_factor)?;
        non_negative("obstacle_margin", self.obstacle_margin)?;
        if !self.spawn_height.is_finite() {
            return Err(RLError::Config("spawn_height must be finite".to_string()));
        }
        for (i, footprint) in self.obstacle_footprints.iter().enumerate() {
            non_negative(&format!("obstacle_footprints[{i}]"), *footprint)?;
        }
        if self.max_placement_attempts == 0 {
            return Err(RLError::Config("max_placement_attempts must be at least 1".to_string()));
        }
        if self.physics_ticks_per_decision == 0 {
            return Err(RLError::Config("physics_ticks_per_decision must be at least 1".to_string()));
        }

        let w = &self.rewards;
        for (name, value) in [
            ("rewards.progress_scale", w.progress_scale),
            ("rewards.heading_penalty_scale", w.heading_penalty_scale),
            ("rewards.goal_sight_bonus", w.goal_sight_bonus),
            ("rewards.tick_cost", w.tick_cost),
            ("rewards.collision_penalty", w.collision_penalty),
            ("rewards.goal_reward", w.goal_reward),
            ("rewards.direction_bonus_scale", w.direction_bonus_scale),
        ] {
            non_negative(name, value)?;
        }
        if !matches!(
            w.speed_bonus_min.partial_cmp(&w.speed_bonus_max),
            Some(Ordering::Less | Ordering::Equal)
        ) {
            return Err(RLError::Config(
                "rewards.speed_bonus_min must not exceed rewards.speed_bonus_max".to_string(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RLError::Config(format!("{name} must be finite and > 0, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RLError::Config(format!("{name} must be finite and >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DriveConfig::default();
        config.validate().unwrap();
        assert!((config.min_goal_separation() - 10.0).abs() < 1e-12);
        assert!((config.rear_ray_range() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_divisors() {
        let mutations: [fn(&mut DriveConfig); 7] = [
            |c| c.stage_half_extent_x = 0.0,
            |c| c.target_speed = -1.0,
            |c| c.target_turn_rate = f64::NAN,
            |c| c.fixed_delta_time = 0.0,
            |c| c.max_placement_attempts = 0,
            |c| c.obstacle_footprints = vec![1.0, -2.0],
            |c| c.rewards.speed_bonus_min = 1.0,
        ];
        for mutate in mutations {
            let mut config = DriveConfig::default();
            mutate(&mut config);
            let err = config.validate().unwrap_err();
            assert!(err.is_config(), "{err}");
        }
    }

    #[test]
    fn test_rejects_stage_too_wide_to_sample() {
        for (hx, hz) in [(1e308, 20.0), (20.0, f64::MAX)] {
            let config = DriveConfig {
                stage_half_extent_x: hx,
                stage_half_extent_z: hz,
                ..DriveConfig::default()
            };
            assert!(config.validate().unwrap_err().is_config());
        }
    }

    #[test]
    fn test_rejects_nan_speed_bonus_bounds() {
        let mut config = DriveConfig::default();
        config.rewards.speed_bonus_max = f64::NAN;
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DriveConfig::from_json_str(
            r#"{ "stage_half_extent_x": 15.0, "reward_policy": "composite", "rewards": { "tick_cost": 0.002 } }"#,
        )
        .unwrap();
        assert_eq!(config.stage_half_extent_x, 15.0);
        assert_eq!(config.stage_half_extent_z, 20.0);
        assert_eq!(config.reward_policy, RewardPolicy::Composite);
        assert_eq!(config.rewards.tick_cost, 0.002);
        assert_eq!(config.rewards.goal_reward, 5.0);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(DriveConfig::from_json_str(r#"{ "target_speed": 0.0 }"#).is_err());
        assert!(matches!(
            DriveConfig::from_json_str("not json"),
            Err(RLError::Serialization(_))
        ));
    }

    #[test]
    fn test_from_env_config_params() {
        let mut env_config = EnvironmentConfig::default();
        env_config
            .params
            .insert("obstacle_footprints".to_string(), serde_json::json!([1.0, 3.0]));
        let config = DriveConfig::from_env_config(&env_config).unwrap();
        assert_eq!(config.obstacle_footprints, vec![1.0, 3.0]);
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join(format!("drive-config-{}.json", std::process::id()));
        let mut config = DriveConfig::default();
        config.target_speed = 12.5;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = DriveConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
