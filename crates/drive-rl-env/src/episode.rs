//! Episode initializer: randomized, non-overlapping placement

use drive_rl_core::{RLError, Result};
use rand::Rng;
use tracing::debug;

use crate::config::DriveConfig;
use crate::geometry::{planar_distance, Vec3};
use crate::state::{AgentState, EpisodeContext, GoalState, Obstacle, ObstacleSet};

/// Everything placed by a reset
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStart {
    /// Agent at rest at its spawn point
    pub agent: AgentState,
    /// Goal marker
    pub goal: GoalState,
    /// Obstacles in configuration order
    pub obstacles: ObstacleSet,
    /// Context for the first tick
    pub context: EpisodeContext,
}

/// Place agent, goal and obstacles for a new episode.
///
/// Agent and goal are at least `min_goal_separation` apart; every obstacle
/// keeps its footprint (plus margin) clear of both. Obstacles may overlap
/// each other. Each rejection loop gives up after `max_placement_attempts`
/// with [`RLError::InfeasiblePlacement`].
pub fn reset<R: Rng + ?Sized>(config: &DriveConfig, rng: &mut R) -> Result<EpisodeStart> {
    let min_separation = config.min_goal_separation();
    let (agent_position, goal_position) = sample_until(config, "agent and goal", rng, |rng| {
        let a = sample_point(config, rng);
        let g = sample_point(config, rng);
        (planar_distance(&a, &g) >= min_separation).then_some((a, g))
    })?;

    let mut obstacles = Vec::with_capacity(config.obstacle_footprints.len());
    for (i, &footprint_radius) in config.obstacle_footprints.iter().enumerate() {
        let clearance = footprint_radius + config.obstacle_margin;
        let position = sample_until(config, &format!("obstacle {i}"), rng, |rng| {
            let p = sample_point(config, rng);
            let clear = planar_distance(&p, &agent_position) >= clearance
                && planar_distance(&p, &goal_position) >= clearance;
            clear.then_some(p)
        })?;
        obstacles.push(Obstacle {
            position,
            footprint_radius,
        });
    }

    let yaw = rng.gen_range(0.0..360.0);
    let agent = AgentState::at_rest(agent_position, yaw);
    let goal = GoalState {
        position: goal_position,
    };
    let context = EpisodeContext::start(&agent, &goal);

    debug!(
        agent_x = agent_position.x,
        agent_z = agent_position.z,
        goal_x = goal_position.x,
        goal_z = goal_position.z,
        yaw,
        distance = context.previous_distance_to_goal,
        obstacles = obstacles.len(),
        "episode placed"
    );

    Ok(EpisodeStart {
        agent,
        goal,
        obstacles: ObstacleSet { obstacles },
        context,
    })
}

fn sample_point<R: Rng + ?Sized>(config: &DriveConfig, rng: &mut R) -> Vec3 {
    let hx = config.stage_half_extent_x;
    let hz = config.stage_half_extent_z;
    Vec3::new(
        rng.gen_range(-hx..=hx),
        config.spawn_height,
        rng.gen_range(-hz..=hz),
    )
}

fn sample_until<R, T, F>(config: &DriveConfig, entity: &str, rng: &mut R, mut candidate: F) -> Result<T>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Option<T>,
{
    for _ in 0..config.max_placement_attempts {
        if let Some(found) = candidate(rng) {
            return Ok(found);
        }
    }
    Err(RLError::InfeasiblePlacement {
        entity: entity.to_string(),
        attempts: config.max_placement_attempts,
    })
}
