//! Headless arena host
//!
//! A kinematic stand-in for a game engine: walls just outside the stage,
//! round obstacles, a round goal trigger, analytic ray casts and
//! overlap-based contact events. There is no mass or force model; the body
//! only moves when the core writes it.

use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;
use crate::geometry::{planar_distance, yaw_degrees, Rotation, Vec3};
use crate::host::DriveHost;
use crate::probe::{RayHit, WorldProbe};
use crate::state::{AgentState, GoalState, ObstacleSet};
use crate::surface::{ContactEvent, SurfaceKind};

/// Arena dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Walls stand at `x = ±wall_x`
    pub wall_x: f64,
    /// Walls stand at `z = ±wall_z`
    pub wall_z: f64,
    /// Collision radius of the agent body
    pub agent_radius: f64,
    /// Radius of the goal trigger
    pub goal_radius: f64,
    /// Obstacle collider radius as a fraction of its footprint radius
    pub obstacle_body_scale: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::for_stage(&DriveConfig::default())
    }
}

impl ArenaConfig {
    /// Walls one unit outside the spawn area of `config`
    #[must_use]
    pub fn for_stage(config: &DriveConfig) -> Self {
        Self {
            wall_x: config.stage_half_extent_x + 1.0,
            wall_z: config.stage_half_extent_z + 1.0,
            agent_radius: 0.5,
            goal_radius: 1.0,
            obstacle_body_scale: 0.5,
        }
    }
}

#[derive(Debug, Default)]
struct Contacts {
    wall: bool,
    goal: bool,
    obstacles: Vec<bool>,
}

/// In-process host with analytic geometry
#[derive(Debug)]
pub struct HeadlessArena {
    config: ArenaConfig,
    body: AgentState,
    tick_start_position: Vec3,
    tick_start_orientation: Rotation,
    goal: Option<GoalState>,
    obstacles: ObstacleSet,
    contacts: Contacts,
    time_scale: f64,
    ticks: u64,
}

impl HeadlessArena {
    /// Empty arena with the body at the origin
    #[must_use]
    pub fn new(config: ArenaConfig) -> Self {
        let body = AgentState::at_rest(Vec3::zeros(), 0.0);
        Self {
            config,
            tick_start_position: body.position,
            tick_start_orientation: body.orientation,
            body,
            goal: None,
            obstacles: ObstacleSet::default(),
            contacts: Contacts::default(),
            time_scale: 1.0,
            ticks: 0,
        }
    }

    /// Arena sized for a drive configuration
    #[must_use]
    pub fn for_stage(config: &DriveConfig) -> Self {
        Self::new(ArenaConfig::for_stage(config))
    }

    /// Arena dimensions
    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Time scale last requested by the driver
    #[must_use]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Fixed ticks simulated so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current goal, if one has been placed
    #[must_use]
    pub fn goal(&self) -> Option<&GoalState> {
        self.goal.as_ref()
    }

    /// Current obstacles
    #[must_use]
    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    fn obstacle_radius(&self, footprint_radius: f64) -> f64 {
        footprint_radius * self.config.obstacle_body_scale
    }

    fn wall_distance(&self, origin: &Vec3, d: &Vec3) -> Option<f64> {
        let mut nearest: Option<f64> = None;
        for (o, dir, bound) in [
            (origin.x, d.x, self.config.wall_x),
            (origin.z, d.z, self.config.wall_z),
        ] {
            let t = if dir > 0.0 {
                (bound - o) / dir
            } else if dir < 0.0 {
                (-bound - o) / dir
            } else {
                continue;
            };
            if t >= 0.0 {
                nearest = Some(nearest.map_or(t, |n| n.min(t)));
            }
        }
        nearest
    }

    fn refresh_velocities(&mut self, dt: f64) {
        self.body.linear_velocity = (self.body.position - self.tick_start_position) / dt;
        let turned = (yaw_degrees(&self.body.orientation) - yaw_degrees(&self.tick_start_orientation)
            + 180.0)
            .rem_euclid(360.0)
            - 180.0;
        self.body.angular_velocity = Vec3::new(0.0, turned.to_radians() / dt, 0.0);
        self.tick_start_position = self.body.position;
        self.tick_start_orientation = self.body.orientation;
    }
}

/// Entry distance of a planar ray into a circle; `None` from inside
fn circle_distance(origin: &Vec3, d: &Vec3, center: &Vec3, radius: f64) -> Option<f64> {
    let fx = origin.x - center.x;
    let fz = origin.z - center.z;
    let c = fx * fx + fz * fz - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = fx * d.x + fz * d.z;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

impl WorldProbe for HeadlessArena {
    fn cast(&self, origin: &Vec3, direction: &Vec3, max_range: f64) -> Option<RayHit> {
        let d = Vec3::new(direction.x, 0.0, direction.z).try_normalize(1e-9)?;

        let mut best: Option<RayHit> = self.wall_distance(origin, &d).map(|distance| RayHit {
            distance,
            surface: SurfaceKind::Wall,
        });
        let mut consider = |distance: Option<f64>, surface: SurfaceKind| {
            if let Some(distance) = distance {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(RayHit { distance, surface });
                }
            }
        };

        for obstacle in &self.obstacles {
            let r = self.obstacle_radius(obstacle.footprint_radius);
            consider(circle_distance(origin, &d, &obstacle.position, r), SurfaceKind::Obstacle);
        }
        if let Some(goal) = &self.goal {
            consider(
                circle_distance(origin, &d, &goal.position, self.config.goal_radius),
                SurfaceKind::Goal,
            );
        }

        best.filter(|hit| hit.distance <= max_range)
    }
}

impl DriveHost for HeadlessArena {
    fn body(&self) -> AgentState {
        self.body.clone()
    }

    fn set_body(&mut self, state: &AgentState) {
        self.body = state.clone();
    }

    fn place_goal(&mut self, goal: &GoalState) {
        self.goal = Some(*goal);
    }

    fn place_obstacles(&mut self, obstacles: &ObstacleSet) {
        self.obstacles = obstacles.clone();
    }

    fn reset_scene(&mut self, agent: &AgentState, goal: &GoalState, obstacles: &ObstacleSet) {
        self.place_obstacles(obstacles);
        self.place_goal(goal);
        self.set_body(agent);
        self.tick_start_position = agent.position;
        self.tick_start_orientation = agent.orientation;
        self.contacts = Contacts {
            wall: false,
            goal: false,
            obstacles: vec![false; obstacles.len()],
        };
    }

    fn fixed_step(&mut self, dt: f64) -> Vec<ContactEvent> {
        self.ticks += 1;
        self.refresh_velocities(dt);

        let mut events = Vec::new();
        let p = self.body.position;
        let r = self.config.agent_radius;

        let in_wall = p.x.abs() + r > self.config.wall_x || p.z.abs() + r > self.config.wall_z;
        if in_wall && !self.contacts.wall {
            events.push(ContactEvent::EnteredSolid(SurfaceKind::Wall));
        }
        self.contacts.wall = in_wall;

        self.contacts.obstacles.resize(self.obstacles.len(), false);
        for (i, obstacle) in self.obstacles.obstacles.iter().enumerate() {
            let reach = r + obstacle.footprint_radius * self.config.obstacle_body_scale;
            let touching = planar_distance(&p, &obstacle.position) < reach;
            if touching && !self.contacts.obstacles[i] {
                events.push(ContactEvent::EnteredSolid(SurfaceKind::Obstacle));
            }
            self.contacts.obstacles[i] = touching;
        }

        if let Some(goal) = &self.goal {
            let inside = planar_distance(&p, &goal.position) < r + self.config.goal_radius;
            if inside && !self.contacts.goal {
                events.push(ContactEvent::EnteredTrigger(SurfaceKind::Goal));
            }
            self.contacts.goal = inside;
        }

        events
    }

    fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale;
    }
}
