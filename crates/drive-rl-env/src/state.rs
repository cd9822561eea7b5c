//! Per-episode entities owned by the driving core

use drive_rl_core::{State, Terminal};
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Rotation, Vec3};

/// Kinematic state of the agent body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Body position
    pub position: Vec3,
    /// Body orientation; only yaw is ever applied
    pub orientation: Rotation,
    /// Linear velocity, units per second
    pub linear_velocity: Vec3,
    /// Angular velocity, radians per second
    pub angular_velocity: Vec3,
}

impl AgentState {
    /// Body at rest at `position` with heading `yaw_degrees`
    #[must_use]
    pub fn at_rest(position: Vec3, yaw_degrees: f64) -> Self {
        Self {
            position,
            orientation: geometry::yaw_rotation(yaw_degrees),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
        }
    }

    /// Facing direction
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        geometry::forward(&self.orientation)
    }
}

/// Goal marker placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalState {
    /// Marker position
    pub position: Vec3,
}

/// One placed obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Obstacle centre
    pub position: Vec3,
    /// Clearance kept around the obstacle during placement
    pub footprint_radius: f64,
}

/// Obstacles of one episode, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSet {
    /// Placed obstacles
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    /// Iterate the obstacles
    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    /// Number of obstacles
    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether there are no obstacles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ObstacleSet {
    type Item = &'a Obstacle;
    type IntoIter = std::slice::Iter<'a, Obstacle>;

    fn into_iter(self) -> Self::IntoIter {
        self.obstacles.iter()
    }
}

/// Values carried from one tick to the next within an episode.
///
/// Always reflects the end of the previous tick, or the reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeContext {
    /// Planar agent–goal distance at the end of the previous tick
    pub previous_distance_to_goal: f64,
    /// Agent position at the end of the previous tick
    pub previous_position: Vec3,
}

impl EpisodeContext {
    /// Context for an agent that has not moved yet
    #[must_use]
    pub fn start(agent: &AgentState, goal: &GoalState) -> Self {
        Self {
            previous_distance_to_goal: geometry::planar_distance(&agent.position, &goal.position),
            previous_position: agent.position,
        }
    }
}

/// Snapshot of the episode exposed through [`drive_rl_core::Step::state`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    /// Agent body after the step
    pub agent: AgentState,
    /// Goal of the episode
    pub goal: GoalState,
    /// Whether the episode has ended
    pub terminal: Terminal,
}

impl State for DriveState {
    fn features(&self) -> Vec<f64> {
        let p = &self.agent.position;
        vec![
            p.x,
            p.z,
            geometry::yaw_degrees(&self.agent.orientation),
            geometry::planar_distance(p, &self.goal.position),
        ]
    }

    fn is_terminal(&self) -> bool {
        self.terminal.is_terminal()
    }
}
