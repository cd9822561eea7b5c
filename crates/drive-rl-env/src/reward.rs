//! Reward shaper
//!
//! Per decision the agent earns a progress term, a heading penalty and a
//! goal-sight bonus. Each fixed physics tick costs a little, and terminal
//! events pay out once on top of whatever the tick already accrued.

use serde::{Deserialize, Serialize};

use crate::config::{DriveConfig, RewardPolicy};
use crate::geometry::{planar_direction, planar_distance};
use crate::probe::WorldProbe;
use crate::state::{AgentState, EpisodeContext, GoalState};
use crate::surface::{SurfaceKind, TerminalOutcome};

/// Every term of one step's reward.
///
/// `direction_bonus` and `speed_bonus` are always filled in for telemetry;
/// whether they reach `total` depends on [`RewardPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    /// Normalized distance closed since the previous tick
    pub progress: f64,
    /// Penalty for facing away from the goal, `<= 0`
    pub heading: f64,
    /// Bonus for having the goal straight ahead
    pub goal_sight: f64,
    /// Heading alignment bonus
    pub direction_bonus: f64,
    /// Displacement-toward-goal bonus
    pub speed_bonus: f64,
    /// Planar distance to goal after the step
    pub distance_to_goal: f64,
    /// Sum fed to the learner
    pub total: f64,
}

impl RewardBreakdown {
    /// Fold a later tick into this one; terms add up, distance is the latest
    pub fn accumulate(&mut self, later: &RewardBreakdown) {
        self.progress += later.progress;
        self.heading += later.heading;
        self.goal_sight += later.goal_sight;
        self.direction_bonus += later.direction_bonus;
        self.speed_bonus += later.speed_bonus;
        self.total += later.total;
        self.distance_to_goal = later.distance_to_goal;
    }
}

/// Score the motion that just happened and roll the context forward.
///
/// `context` holds the end of the previous tick; the returned context holds
/// the end of this one.
pub fn shape(
    agent: &AgentState,
    goal: &GoalState,
    context: &EpisodeContext,
    config: &DriveConfig,
    probe: &dyn WorldProbe,
) -> (RewardBreakdown, EpisodeContext) {
    let w = &config.rewards;
    let distance = planar_distance(&agent.position, &goal.position);
    let to_goal = planar_direction(&agent.position, &goal.position);
    let forward = agent.forward();
    let dot = forward.dot(&to_goal);

    let progress =
        (context.previous_distance_to_goal - distance) / config.stage_half_extent_x * w.progress_scale;

    let heading = if dot < 0.0 {
        dot * w.heading_penalty_scale
    } else {
        0.0
    };

    let goal_sight = match probe.cast(&agent.position, &forward, config.goal_ray_range) {
        Some(hit) if hit.surface == SurfaceKind::Goal => w.goal_sight_bonus,
        _ => 0.0,
    };

    let direction_bonus = dot * w.direction_bonus_scale;
    let displacement = agent.position - context.previous_position;
    let speed_bonus = (displacement.dot(&to_goal) / config.target_speed)
        .clamp(w.speed_bonus_min, w.speed_bonus_max);

    let mut total = progress + heading + goal_sight;
    if config.reward_policy == RewardPolicy::Composite {
        total += direction_bonus + speed_bonus;
    }

    let breakdown = RewardBreakdown {
        progress,
        heading,
        goal_sight,
        direction_bonus,
        speed_bonus,
        distance_to_goal: distance,
        total,
    };
    let next = EpisodeContext {
        previous_distance_to_goal: distance,
        previous_position: agent.position,
    };
    (breakdown, next)
}

/// Reward charged on every fixed physics tick
#[must_use]
pub fn tick_cost(config: &DriveConfig) -> f64 {
    -config.rewards.tick_cost
}

/// One-time reward for how the episode ended
#[must_use]
pub fn terminal_reward(outcome: TerminalOutcome, config: &DriveConfig) -> f64 {
    match outcome {
        TerminalOutcome::Collision => -config.rewards.collision_penalty,
        TerminalOutcome::GoalReached => config.rewards.goal_reward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::probe::{OpenSky, RayHit};
    use approx::assert_relative_eq;

    struct SeesGoal;

    impl WorldProbe for SeesGoal {
        fn cast(&self, _origin: &Vec3, _direction: &Vec3, _max_range: f64) -> Option<RayHit> {
            Some(RayHit {
                distance: 3.0,
                surface: SurfaceKind::Goal,
            })
        }
    }

    fn goal_ahead() -> (AgentState, GoalState, EpisodeContext) {
        let agent = AgentState::at_rest(Vec3::new(0.0, 0.5, 0.0), 0.0);
        let goal = GoalState {
            position: Vec3::new(0.0, 0.5, 10.0),
        };
        let context = EpisodeContext::start(&agent, &goal);
        (agent, goal, context)
    }

    #[test]
    fn test_one_unit_toward_goal() {
        let config = DriveConfig::default();
        let (mut agent, goal, context) = goal_ahead();
        agent.position.z = 1.0;

        let (b, next) = shape(&agent, &goal, &context, &config, &OpenSky);
        assert_relative_eq!(b.progress, 0.25, epsilon = 1e-12);
        assert_eq!(b.heading, 0.0);
        assert_eq!(b.goal_sight, 0.0);
        assert_relative_eq!(b.total + tick_cost(&config), 0.249, epsilon = 1e-12);
        assert_relative_eq!(next.previous_distance_to_goal, 9.0, epsilon = 1e-12);
        assert_eq!(next.previous_position, agent.position);
    }

    #[test]
    fn test_facing_away_is_penalized() {
        let config = DriveConfig::default();
        let (_, goal, context) = goal_ahead();
        let agent = AgentState::at_rest(Vec3::new(0.0, 0.5, 0.0), 180.0);
        let (b, _) = shape(&agent, &goal, &context, &config, &OpenSky);
        assert_relative_eq!(b.heading, -0.05, epsilon = 1e-12);

        let sideways = AgentState::at_rest(Vec3::new(0.0, 0.5, 0.0), 90.0);
        let (b, _) = shape(&sideways, &goal, &context, &config, &OpenSky);
        assert_eq!(b.heading, 0.0);
    }

    #[test]
    fn test_goal_sight_bonus_is_flat() {
        let config = DriveConfig::default();
        let (agent, goal, context) = goal_ahead();
        let (b, _) = shape(&agent, &goal, &context, &config, &SeesGoal);
        assert_relative_eq!(b.goal_sight, 0.001);
        assert_relative_eq!(b.total, 0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_diagnostics_only_summed_when_composite() {
        let (mut agent, goal, context) = goal_ahead();
        agent.position.z = 2.0;

        let config = DriveConfig::default();
        let (plain, _) = shape(&agent, &goal, &context, &config, &OpenSky);
        assert_relative_eq!(plain.direction_bonus, 0.01, epsilon = 1e-12);
        assert_relative_eq!(plain.speed_bonus, 0.10, epsilon = 1e-12);
        assert_relative_eq!(plain.total, plain.progress, epsilon = 1e-12);

        let composite = DriveConfig {
            reward_policy: RewardPolicy::Composite,
            ..DriveConfig::default()
        };
        let (b, _) = shape(&agent, &goal, &context, &composite, &OpenSky);
        assert_relative_eq!(b.total, b.progress + 0.01 + 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_speed_bonus_clamped_low() {
        let config = DriveConfig::default();
        let (mut agent, goal, context) = goal_ahead();
        agent.position.z = -5.0;
        let (b, _) = shape(&agent, &goal, &context, &config, &OpenSky);
        assert_relative_eq!(b.speed_bonus, -0.05);
        assert!(b.progress < 0.0);
    }

    #[test]
    fn test_terminal_rewards() {
        let config = DriveConfig::default();
        assert_eq!(terminal_reward(TerminalOutcome::Collision, &config), -5.0);
        assert_eq!(terminal_reward(TerminalOutcome::GoalReached, &config), 5.0);
        assert_eq!(tick_cost(&config), -0.001);
    }
}
