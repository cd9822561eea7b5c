//! Environment wrappers

use async_trait::async_trait;
use tracing::debug;

use drive_rl_core::{
    ActionSpace, Environment, ObservationSpace, Result, Step, StepInfo,
};

/// Ends an episode as truncated after a fixed number of decisions
pub struct TimeLimit<E> {
    /// Inner environment
    pub env: E,
    /// Decisions allowed per episode
    pub max_steps: usize,
    /// Decisions taken in the current episode
    pub steps: usize,
}

impl<E> TimeLimit<E> {
    /// Wrap `env` with a budget of `max_steps` decisions
    pub fn new(env: E, max_steps: usize) -> Self {
        Self {
            env,
            max_steps,
            steps: 0,
        }
    }
}

#[async_trait]
impl<E> Environment for TimeLimit<E>
where
    E: Environment,
{
    type Observation = E::Observation;
    type Action = E::Action;
    type State = E::State;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        self.env.action_space()
    }

    async fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        self.steps = 0;
        self.env.reset().await
    }

    async fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation, Self::State>> {
        self.steps += 1;
        let mut step = self.env.step(action).await?;

        if self.steps >= self.max_steps && !step.done {
            debug!(steps = self.steps, "episode truncated");
            step.truncated = true;
            step.done = true;
        }

        Ok(step)
    }

    async fn close(&mut self) -> Result<()> {
        self.env.close().await
    }

    fn episode_info(&self) -> Option<drive_rl_core::Episode> {
        self.env.episode_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DriveAction;
    use crate::arena::HeadlessArena;
    use crate::config::DriveConfig;
    use crate::env::DriveEnv;

    #[tokio::test]
    async fn test_time_limit_truncates_idle_agent() {
        let config = DriveConfig::default();
        let arena = HeadlessArena::for_stage(&config);
        let mut env = TimeLimit::new(DriveEnv::with_seed(config, arena, 5).unwrap(), 3);

        env.reset().await.unwrap();
        assert!(!env.step(DriveAction::IDLE).await.unwrap().done);
        assert!(!env.step(DriveAction::IDLE).await.unwrap().done);
        let last = env.step(DriveAction::IDLE).await.unwrap();
        assert!(last.done);
        assert!(last.truncated);

        env.reset().await.unwrap();
        assert_eq!(env.steps, 0);
    }
}
