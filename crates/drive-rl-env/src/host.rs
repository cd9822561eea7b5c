//! Boundary to the host simulation
//!
//! The host owns physics, rendering and scene objects. The driving core
//! reads and writes the agent body through this trait, places the goal and
//! obstacles at reset, and receives contact events after each fixed tick.

use crate::probe::WorldProbe;
use crate::state::{AgentState, GoalState, ObstacleSet};
use crate::surface::ContactEvent;

/// Host simulation as seen by the driving core
pub trait DriveHost: WorldProbe + Send + Sync {
    /// Current state of the agent's physical proxy
    fn body(&self) -> AgentState;

    /// Teleport the agent's physical proxy (kinematic write)
    fn set_body(&mut self, state: &AgentState);

    /// Move the goal marker
    fn place_goal(&mut self, goal: &GoalState);

    /// Move and activate the obstacles
    fn place_obstacles(&mut self, obstacles: &ObstacleSet);

    /// Lay out a fresh episode. Completes before any further tick.
    fn reset_scene(&mut self, agent: &AgentState, goal: &GoalState, obstacles: &ObstacleSet) {
        self.place_obstacles(obstacles);
        self.place_goal(goal);
        self.set_body(agent);
    }

    /// Advance the host by one fixed physics tick and report the contacts
    /// that began during it
    fn fixed_step(&mut self, dt: f64) -> Vec<ContactEvent>;

    /// Simulation speed multiplier chosen by the driver
    fn set_time_scale(&mut self, _scale: f64) {}
}
