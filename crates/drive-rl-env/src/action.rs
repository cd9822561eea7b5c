//! Action decoder and kinematic motion applier

use drive_rl_core::{Action, ActionSpace, ContinuousSpace, RLError, Result};
use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;
use crate::geometry::yaw_rotation;
use crate::state::AgentState;

/// Continuous drive command.
///
/// Both components are nominally in `[-1, 1]` but any real value is applied
/// as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveAction {
    /// Throttle along the current heading; negative reverses
    pub forward: f64,
    /// Yaw input; positive turns toward +x when facing +z
    pub turn: f64,
}

impl DriveAction {
    /// No throttle, no steering
    pub const IDLE: Self = Self {
        forward: 0.0,
        turn: 0.0,
    };

    /// Create an action
    #[must_use]
    pub fn new(forward: f64, turn: f64) -> Self {
        Self { forward, turn }
    }

    /// Decode the discrete control scheme: `0` idle, `1` full forward,
    /// `2` turn left, `3` turn right
    pub fn from_discrete(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Self::IDLE),
            1 => Ok(Self::new(1.0, 0.0)),
            2 => Ok(Self::new(0.0, -1.0)),
            3 => Ok(Self::new(0.0, 1.0)),
            _ => Err(RLError::InvalidAction(format!(
                "discrete drive action must be 0..=3, got {index}"
            ))),
        }
    }

    /// Decode a raw two-component vector as produced by a learning backend
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [forward, turn] => Ok(Self::new(*forward, *turn)),
            _ => Err(RLError::DimensionMismatch {
                expected: 2,
                actual: values.len(),
            }),
        }
    }
}

impl Action for DriveAction {
    fn to_vec(&self) -> Vec<f64> {
        vec![self.forward, self.turn]
    }
}

/// The `[-1, 1]²` box a policy is expected to act in
#[derive(Debug, Clone)]
pub struct DriveActionSpace {
    inner: ContinuousSpace,
}

impl DriveActionSpace {
    /// Nominal `[-1, 1]` range for both components
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: ContinuousSpace {
                low: vec![-1.0, -1.0],
                high: vec![1.0, 1.0],
            },
        }
    }
}

impl Default for DriveActionSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionSpace for DriveActionSpace {
    type Action = DriveAction;

    fn sample(&self) -> DriveAction {
        let v = self.inner.sample_vec(&mut rand::thread_rng());
        DriveAction::new(v[0], v[1])
    }

    fn contains(&self, action: &DriveAction) -> bool {
        self.inner.contains_slice(&action.to_vec())
    }

    fn dim(&self) -> Option<usize> {
        Some(self.inner.len())
    }
}

/// Move the body along its current heading and yaw it.
///
/// Kinematic only: velocities are left to the host, which owns the physical
/// proxy and derives them from the motion.
#[must_use]
pub fn apply(action: DriveAction, dt: f64, state: &AgentState, config: &DriveConfig) -> AgentState {
    let displacement = state.forward() * (action.forward * config.target_speed * dt);
    let yaw = yaw_rotation(action.turn * config.target_turn_rate * dt);

    AgentState {
        position: state.position + displacement,
        orientation: state.orientation * yaw,
        ..state.clone()
    }
}
