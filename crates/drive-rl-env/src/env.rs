//! Goal-seeking drive environment
//!
//! Glues the pure pieces (episode reset, observation, action, reward) to a
//! [`DriveHost`]. Each [`Environment::step`] is one policy decision covering
//! `physics_ticks_per_decision` fixed physics ticks.

use async_trait::async_trait;
use drive_rl_core::{
    ActionSpace, Environment, EnvironmentConfig, ObservationSpace, RLError, Result, Reward, Step,
    StepInfo, Terminal,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::action::{self, DriveAction, DriveActionSpace};
use crate::config::DriveConfig;
use crate::episode;
use crate::host::DriveHost;
use crate::observation::{observe, DriveObservation, DriveObservationSpace};
use crate::reward::{self, RewardBreakdown};
use crate::state::{DriveState, EpisodeContext, GoalState, ObstacleSet};
use crate::surface::TerminalOutcome;

#[derive(Debug, Clone)]
struct EpisodeRun {
    goal: GoalState,
    obstacles: ObstacleSet,
    context: EpisodeContext,
    outcome: Option<TerminalOutcome>,
    decisions: usize,
}

/// Single-agent drive-to-goal environment over a host simulation
pub struct DriveEnv<H> {
    config: DriveConfig,
    host: H,
    rng: StdRng,
    run: Option<EpisodeRun>,
}

impl<H: DriveHost> DriveEnv<H> {
    /// Create an environment with an entropy-seeded placement RNG
    pub fn new(config: DriveConfig, host: H) -> Result<Self> {
        Self::build(config, host, StdRng::from_entropy())
    }

    /// Create an environment whose resets are reproducible
    pub fn with_seed(config: DriveConfig, host: H, seed: u64) -> Result<Self> {
        Self::build(config, host, StdRng::seed_from_u64(seed))
    }

    /// Create from generic environment parameters
    pub fn from_env_config(env_config: &EnvironmentConfig, host: H) -> Result<Self> {
        let config = DriveConfig::from_env_config(env_config)?;
        match env_config.seed {
            Some(seed) => Self::with_seed(config, host, seed),
            None => Self::new(config, host),
        }
    }

    fn build(config: DriveConfig, host: H, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            host,
            rng,
            run: None,
        })
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// The host simulation
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host simulation
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Goal of the current episode
    #[must_use]
    pub fn goal(&self) -> Option<&GoalState> {
        self.run.as_ref().map(|run| &run.goal)
    }

    /// Obstacles of the current episode
    #[must_use]
    pub fn obstacles(&self) -> Option<&ObstacleSet> {
        self.run.as_ref().map(|run| &run.obstacles)
    }

    /// Carry-over values from the last tick
    #[must_use]
    pub fn context(&self) -> Option<&EpisodeContext> {
        self.run.as_ref().map(|run| &run.context)
    }

    /// How the current episode ended, if it has
    #[must_use]
    pub fn outcome(&self) -> Option<TerminalOutcome> {
        self.run.as_ref().and_then(|run| run.outcome)
    }

    /// Encode the current body without stepping
    pub fn observe(&self) -> Result<DriveObservation> {
        let run = self.run.as_ref().ok_or_else(not_started)?;
        Ok(observe(&self.host.body(), &run.goal, &self.config, &self.host))
    }

    fn snapshot(&self, goal: GoalState, terminal: Terminal) -> DriveState {
        DriveState {
            agent: self.host.body(),
            goal,
            terminal,
        }
    }
}

fn not_started() -> RLError {
    RLError::Environment("step called before reset".to_string())
}

fn breakdown_info(breakdown: &RewardBreakdown, info: &mut StepInfo) -> Result<()> {
    if let serde_json::Value::Object(fields) = serde_json::to_value(breakdown)? {
        info.fields.extend(fields);
    }
    Ok(())
}

#[async_trait]
impl<H: DriveHost> Environment for DriveEnv<H> {
    type Observation = DriveObservation;
    type Action = DriveAction;
    type State = DriveState;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = DriveObservation>> {
        Box::new(DriveObservationSpace::new())
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = DriveAction>> {
        Box::new(DriveActionSpace::new())
    }

    async fn reset(&mut self) -> Result<(DriveObservation, StepInfo)> {
        self.run = None;
        let start = episode::reset(&self.config, &mut self.rng)?;
        self.host
            .reset_scene(&start.agent, &start.goal, &start.obstacles);

        let observation = observe(&self.host.body(), &start.goal, &self.config, &self.host);
        let mut info = StepInfo::default();
        info.insert("distance_to_goal", start.context.previous_distance_to_goal);
        info.insert("obstacles", start.obstacles.len());

        debug!(
            distance = start.context.previous_distance_to_goal,
            obstacles = start.obstacles.len(),
            "episode reset"
        );
        self.run = Some(EpisodeRun {
            goal: start.goal,
            obstacles: start.obstacles,
            context: start.context,
            outcome: None,
            decisions: 0,
        });
        Ok((observation, info))
    }

    async fn step(&mut self, action: DriveAction) -> Result<Step<DriveObservation, DriveState>> {
        let Self {
            config, host, run, ..
        } = self;
        let run = run.as_mut().ok_or_else(not_started)?;

        if let Some(outcome) = run.outcome {
            warn!(?outcome, "step after the episode ended; call reset");
            let goal = run.goal;
            let mut info = StepInfo::default();
            info.insert("outcome", serde_json::to_value(outcome)?);
            return Ok(Step {
                observation: self.observe()?,
                reward: Reward::ZERO,
                done: true,
                truncated: false,
                info,
                state: Some(self.snapshot(goal, Terminal::Yes)),
            });
        }

        let dt = config.fixed_delta_time;
        let mut breakdown = RewardBreakdown::default();
        let mut tick_costs = 0.0;
        let mut terminal = 0.0;
        let mut ticks = 0u32;

        for _ in 0..config.physics_ticks_per_decision {
            let moved = action::apply(action, dt, &host.body(), config);
            host.set_body(&moved);

            let (shaped, next) = reward::shape(&moved, &run.goal, &run.context, config, &*host);
            breakdown.accumulate(&shaped);
            run.context = next;

            let events = host.fixed_step(dt);
            tick_costs += reward::tick_cost(config);
            ticks += 1;

            // first terminal contact in the tick decides the outcome
            if let Some(outcome) = events.into_iter().find_map(TerminalOutcome::from_event) {
                terminal = reward::terminal_reward(outcome, config);
                run.outcome = Some(outcome);
                debug!(?outcome, decision = run.decisions, "episode ended");
                break;
            }
        }
        run.decisions += 1;

        let total = breakdown.total + tick_costs + terminal;
        let mut info = StepInfo::default();
        breakdown_info(&breakdown, &mut info)?;
        info.insert("tick_cost", tick_costs);
        info.insert("terminal", terminal);
        info.insert("physics_ticks", ticks);
        info.insert("outcome", serde_json::to_value(run.outcome)?);

        let done = run.outcome.is_some();
        let goal = run.goal;
        Ok(Step {
            observation: self.observe()?,
            reward: Reward(total),
            done,
            truncated: false,
            info,
            state: Some(self.snapshot(goal, if done { Terminal::Yes } else { Terminal::No })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::HeadlessArena;
    use crate::geometry::Vec3;
    use crate::state::AgentState;
    use approx::assert_relative_eq;

    fn env(seed: u64) -> DriveEnv<HeadlessArena> {
        let config = DriveConfig::default();
        let arena = HeadlessArena::for_stage(&config);
        DriveEnv::with_seed(config, arena, seed).unwrap()
    }

    #[tokio::test]
    async fn test_step_before_reset_is_an_error() {
        let mut env = env(1);
        assert!(env.step(DriveAction::IDLE).await.is_err());
        assert!(env.observe().is_err());
    }

    #[tokio::test]
    async fn test_failed_reset_discards_previous_episode() {
        let mut env = env(3);
        env.reset().await.unwrap();
        env.step(DriveAction::IDLE).await.unwrap();

        env.config.goal_separation_factor = 10.0;
        env.config.max_placement_attempts = 5;
        assert!(matches!(
            env.reset().await,
            Err(RLError::InfeasiblePlacement { attempts: 5, .. })
        ));
        assert!(env.goal().is_none());
        assert!(env.observe().is_err());
        assert!(matches!(
            env.step(DriveAction::IDLE).await,
            Err(RLError::Environment(_))
        ));
    }

    #[tokio::test]
    async fn test_idle_step_costs_one_tick() {
        let mut env = env(2);
        let (obs, info) = env.reset().await.unwrap();
        assert_eq!(obs.0.len(), 8);
        assert!(info.get_f64("distance_to_goal").unwrap() >= env.config().min_goal_separation());

        let step = env.step(DriveAction::IDLE).await.unwrap();
        assert!(!step.done);
        assert_eq!(step.info.get_f64("progress"), Some(0.0));
        assert_eq!(step.info.get_f64("tick_cost"), Some(-0.001));
        assert_eq!(step.info.get_f64("physics_ticks"), Some(1.0));
        let shaped = step.info.get_f64("total").unwrap();
        assert_relative_eq!(step.reward.0, shaped - 0.001, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_reset_is_reproducible_with_seed() {
        let mut a = env(7);
        let mut b = env(7);
        let (oa, _) = a.reset().await.unwrap();
        let (ob, _) = b.reset().await.unwrap();
        assert_eq!(oa, ob);
        assert_eq!(a.goal(), b.goal());
    }

    #[tokio::test]
    async fn test_driving_into_goal_pays_out_once() {
        let config = DriveConfig {
            obstacle_footprints: Vec::new(),
            ..DriveConfig::default()
        };
        let arena = HeadlessArena::for_stage(&config);
        let mut env = DriveEnv::with_seed(config, arena, 3).unwrap();
        env.reset().await.unwrap();
        let goal = *env.goal().unwrap();

        // park the agent just outside the trigger on the stage side, facing the goal
        let (offset, yaw) = if goal.position.z > 0.0 { (-1.6, 0.0) } else { (1.6, 180.0) };
        let start = Vec3::new(goal.position.x, 0.5, goal.position.z + offset);
        env.host_mut().set_body(&AgentState::at_rest(start, yaw));
        let context = EpisodeContext::start(&env.host().body(), &goal);
        env.run.as_mut().unwrap().context = context;

        let step = env.step(DriveAction::new(1.0, 0.0)).await.unwrap();
        assert!(step.done);
        assert_eq!(env.outcome(), Some(TerminalOutcome::GoalReached));
        assert!(step.reward.0 > 5.0 - 0.01);

        let after = env.step(DriveAction::new(1.0, 0.0)).await.unwrap();
        assert!(after.done);
        assert_eq!(after.reward, Reward::ZERO);
    }

    #[tokio::test]
    async fn test_multiple_ticks_per_decision() {
        let config = DriveConfig {
            physics_ticks_per_decision: 4,
            obstacle_footprints: Vec::new(),
            ..DriveConfig::default()
        };
        let arena = HeadlessArena::for_stage(&config);
        let mut env = DriveEnv::with_seed(config, arena, 11).unwrap();
        env.reset().await.unwrap();
        let before = env.host().body().position;

        let step = env.step(DriveAction::IDLE).await.unwrap();
        assert_relative_eq!(step.info.get_f64("tick_cost").unwrap(), -0.004, epsilon = 1e-12);
        let shaped = step.info.get_f64("total").unwrap();
        assert_relative_eq!(step.reward.0, shaped - 0.004, epsilon = 1e-12);
        assert_eq!(env.host().body().position, before);
        assert_eq!(env.host().ticks(), 4);
    }
}
