//! Observation encoder

use drive_rl_core::{BoxObservationSpace, Observation, ObservationSpace, VectorObservation};
use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;
use crate::geometry::{angle_degrees, planar_direction, planar_distance};
use crate::probe::WorldProbe;
use crate::state::{AgentState, GoalState};
use crate::surface::SurfaceKind;

/// Number of features in a [`DriveObservation`]
pub const OBSERVATION_DIM: usize = 8;

/// Fixed-size feature vector handed to the policy.
///
/// Layout:
/// 0. to-goal unit vector, x
/// 1. to-goal unit vector, z
/// 2. linear velocity x / target speed
/// 3. linear velocity z / target speed
/// 4. angle between heading and goal direction, degrees / 180
/// 5. planar distance to goal / stage half-extent x
/// 6. yaw rate (deg/s) / target turn rate
/// 7. rear obstruction distance / ray range, or 1.0 when clear
///
/// Nothing is clamped; extreme kinematics can push entries past their
/// nominal range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveObservation(pub [f64; OBSERVATION_DIM]);

impl DriveObservation {
    /// Build from a slice of exactly [`OBSERVATION_DIM`] values
    pub fn from_slice(values: &[f64]) -> drive_rl_core::Result<Self> {
        let array: [f64; OBSERVATION_DIM] =
            values
                .try_into()
                .map_err(|_| drive_rl_core::RLError::DimensionMismatch {
                    expected: OBSERVATION_DIM,
                    actual: values.len(),
                })?;
        Ok(Self(array))
    }

    /// Raw features
    #[must_use]
    pub fn as_array(&self) -> &[f64; OBSERVATION_DIM] {
        &self.0
    }

    /// Planar unit vector toward the goal, `(x, z)`
    #[must_use]
    pub fn goal_direction(&self) -> (f64, f64) {
        (self.0[0], self.0[1])
    }

    /// Rear obstruction feature
    #[must_use]
    pub fn rear_clearance(&self) -> f64 {
        self.0[7]
    }
}

impl Observation for DriveObservation {
    fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    fn shape(&self) -> Vec<usize> {
        vec![OBSERVATION_DIM]
    }
}

/// Encode the current geometry and kinematics
pub fn observe(
    agent: &AgentState,
    goal: &GoalState,
    config: &DriveConfig,
    probe: &dyn WorldProbe,
) -> DriveObservation {
    let to_goal = planar_direction(&agent.position, &goal.position);
    let forward = agent.forward();
    let speed = config.target_speed;

    DriveObservation([
        to_goal.x,
        to_goal.z,
        agent.linear_velocity.x / speed,
        agent.linear_velocity.z / speed,
        angle_degrees(&forward, &to_goal) / 180.0,
        planar_distance(&agent.position, &goal.position) / config.stage_half_extent_x,
        // body reports rad/s, turn rate is configured in deg/s
        agent.angular_velocity.y.to_degrees() / config.target_turn_rate,
        rear_clearance(agent, config, probe),
    ])
}

fn rear_clearance(agent: &AgentState, config: &DriveConfig, probe: &dyn WorldProbe) -> f64 {
    let range = config.rear_ray_range();
    match probe.cast(&agent.position, &-agent.forward(), range) {
        Some(hit) => match hit.surface {
            SurfaceKind::Wall | SurfaceKind::Obstacle => hit.distance / range,
            SurfaceKind::Goal | SurfaceKind::Other => 1.0,
        },
        None => 1.0,
    }
}

/// Nominal bounds of [`DriveObservation`]
pub struct DriveObservationSpace {
    inner: BoxObservationSpace,
}

impl DriveObservationSpace {
    /// Nominal ranges of the eight features
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: BoxObservationSpace {
                low: vec![-1.0, -1.0, -1.0, -1.0, 0.0, 0.0, -1.0, 0.0],
                high: vec![1.0, 1.0, 1.0, 1.0, 1.0, 3.0, 1.0, 1.0],
                shape: vec![OBSERVATION_DIM],
            },
        }
    }
}

impl Default for DriveObservationSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationSpace for DriveObservationSpace {
    type Observation = DriveObservation;

    fn sample(&self) -> DriveObservation {
        let VectorObservation { data } = self.inner.sample();
        let mut features = [0.0; OBSERVATION_DIM];
        features.copy_from_slice(&data);
        DriveObservation(features)
    }

    fn contains(&self, obs: &DriveObservation) -> bool {
        self.inner.contains_slice(&obs.0)
    }

    fn shape(&self) -> Vec<usize> {
        self.inner.shape.clone()
    }
}
