//! Property tests for the pure decision functions

use drive_rl_env::episode::reset;
use drive_rl_env::geometry::{planar_direction, planar_distance, yaw_degrees};
use drive_rl_env::reward::shape;
use drive_rl_env::{
    apply, observe, AgentState, DriveAction, DriveConfig, DriveEnv, DriveHost, Environment, EpisodeContext,
    GoalState, HeadlessArena, OpenSky, Vec3, OBSERVATION_DIM,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn planar_point(extent: f64) -> impl Strategy<Value = Vec3> {
    (-extent..extent, -extent..extent).prop_map(|(x, z)| Vec3::new(x, 0.5, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reset_respects_separation(
        seed in any::<u64>(),
        hx in 5.0f64..50.0,
        hz in 5.0f64..50.0,
        margin in 0.0f64..1.0,
    ) {
        let config = DriveConfig {
            stage_half_extent_x: hx,
            stage_half_extent_z: hz,
            obstacle_margin: margin,
            ..DriveConfig::default()
        };
        let start = reset(&config, &mut StdRng::seed_from_u64(seed)).unwrap();

        let a = start.agent.position;
        let g = start.goal.position;
        prop_assert!(planar_distance(&a, &g) >= 0.25 * 2.0 * hx);
        for p in [a, g] {
            prop_assert!(p.x.abs() <= hx && p.z.abs() <= hz);
        }
        for obstacle in &start.obstacles {
            let clearance = obstacle.footprint_radius + margin;
            prop_assert!(planar_distance(&obstacle.position, &a) >= clearance);
            prop_assert!(planar_distance(&obstacle.position, &g) >= clearance);
        }
    }

    #[test]
    fn observation_has_eight_features_and_unit_direction(
        agent_pos in planar_point(20.0),
        goal_pos in planar_point(20.0),
        yaw in 0.0f64..360.0,
    ) {
        prop_assume!(planar_distance(&agent_pos, &goal_pos) > 1e-6);
        let agent = AgentState::at_rest(agent_pos, yaw);
        let goal = GoalState { position: goal_pos };

        let obs = observe(&agent, &goal, &DriveConfig::default(), &OpenSky);
        prop_assert_eq!(obs.0.len(), OBSERVATION_DIM);
        let (x, z) = obs.goal_direction();
        prop_assert!((x.hypot(z) - 1.0).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&obs.0[4]));
    }

    #[test]
    fn zero_action_does_not_move(
        pos in planar_point(20.0),
        yaw in 0.0f64..360.0,
        dt in 0.001f64..1.0,
    ) {
        let state = AgentState::at_rest(pos, yaw);
        let next = apply(DriveAction::IDLE, dt, &state, &DriveConfig::default());
        prop_assert_eq!(next.position, state.position);
        prop_assert!(next.orientation.angle_to(&state.orientation) < 1e-12);
    }

    #[test]
    fn progress_follows_distance_closed(
        agent_pos in planar_point(20.0),
        goal_pos in planar_point(20.0),
        step in -0.9f64..0.9,
    ) {
        let distance = planar_distance(&agent_pos, &goal_pos);
        prop_assume!(distance > 0.1 && step.abs() > 1e-3);
        let config = DriveConfig::default();
        let goal = GoalState { position: goal_pos };
        let before = AgentState::at_rest(agent_pos, 0.0);
        let context = EpisodeContext::start(&before, &goal);

        // slide along the line to the goal without changing heading
        let mut after = before.clone();
        after.position = agent_pos + (goal_pos - agent_pos) * step;

        let (b, _) = shape(&after, &goal, &context, &config, &OpenSky);
        let closed = distance - planar_distance(&after.position, &goal_pos);
        prop_assert!((b.progress - closed / config.stage_half_extent_x * 5.0).abs() < 1e-9);
        prop_assert_eq!(b.progress > 0.0, step > 0.0);
    }

    #[test]
    fn heading_penalty_only_when_facing_away(
        agent_pos in planar_point(20.0),
        goal_pos in planar_point(20.0),
        yaw in 0.0f64..360.0,
    ) {
        prop_assume!(planar_distance(&agent_pos, &goal_pos) > 1e-3);
        let agent = AgentState::at_rest(agent_pos, yaw);
        let goal = GoalState { position: goal_pos };
        let context = EpisodeContext::start(&agent, &goal);

        let (b, _) = shape(&agent, &goal, &context, &DriveConfig::default(), &OpenSky);
        let to_goal = planar_direction(&agent_pos, &goal_pos);
        let dot = agent.forward().dot(&to_goal);
        if dot >= 0.0 {
            prop_assert_eq!(b.heading, 0.0);
        } else {
            prop_assert!((b.heading - dot * 0.05).abs() < 1e-12);
        }
    }

    #[test]
    fn env_steps_keep_heading_consistent(seed in any::<u64>(), turns in prop::collection::vec(-1.0f64..1.0, 1..20)) {
        let config = DriveConfig { obstacle_footprints: Vec::new(), ..DriveConfig::default() };
        let arena = HeadlessArena::for_stage(&config);
        let mut env = DriveEnv::with_seed(config, arena, seed).unwrap();
        tokio_test::block_on(async {
            env.reset().await.unwrap();
            let mut expected = yaw_degrees(&env.host().body().orientation);
            for turn in turns {
                env.step(DriveAction::new(0.0, turn)).await.unwrap();
                expected = (expected + turn * 100.0 * 0.02).rem_euclid(360.0);
                let actual = yaw_degrees(&env.host().body().orientation);
                let diff = (actual - expected + 180.0).rem_euclid(360.0) - 180.0;
                assert!(diff.abs() < 1e-6);
            }
        });
    }
}
