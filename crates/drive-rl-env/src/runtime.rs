//! Explicit driver loop
//!
//! Whoever owns the clock (a training backend, a demo binary, a test) calls
//! into the environment through these functions; nothing here runs on its
//! own.

use drive_rl_core::{Environment, Policy, Result, Reward, StepInfo};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::host::DriveHost;
use crate::surface::TerminalOutcome;

/// How the driver runs the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Whether a learning backend is supplying actions
    pub training_backend_attached: bool,
    /// Speed-up applied while training
    pub simulation_time_scale: f64,
    /// Decision budget per episode; `None` runs until a terminal event
    pub max_steps_per_episode: Option<usize>,
    /// Episodes to run
    pub episodes: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            training_backend_attached: false,
            simulation_time_scale: 20.0,
            max_steps_per_episode: Some(1_000),
            episodes: 1,
        }
    }
}

impl DriverConfig {
    /// Time scale the host should run at: real time unless a backend is attached
    #[must_use]
    pub fn effective_time_scale(&self) -> f64 {
        if self.training_backend_attached {
            self.simulation_time_scale
        } else {
            1.0
        }
    }

    /// Push the time scale to the host
    pub fn apply_to<H: DriveHost + ?Sized>(&self, host: &mut H) {
        host.set_time_scale(self.effective_time_scale());
    }
}

/// What happened in one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Decisions taken
    pub steps: usize,
    /// Sum of rewards
    pub total_reward: f64,
    /// Terminal event, if the episode ended on one
    pub outcome: Option<TerminalOutcome>,
    /// Whether the step budget cut the episode short
    pub truncated: bool,
}

fn outcome_of(info: &StepInfo) -> Option<TerminalOutcome> {
    info.fields
        .get("outcome")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Reset and drive one episode to its end or to `max_steps` decisions
pub async fn run_episode<E, P>(env: &mut E, policy: &P, max_steps: Option<usize>) -> Result<EpisodeSummary>
where
    E: Environment,
    P: Policy<Observation = E::Observation, Action = E::Action>,
{
    let (mut observation, _info) = env.reset().await?;
    let mut summary = EpisodeSummary {
        steps: 0,
        total_reward: 0.0,
        outcome: None,
        truncated: false,
    };
    let mut total = Reward::ZERO;

    loop {
        if max_steps.is_some_and(|limit| summary.steps >= limit) {
            summary.truncated = true;
            break;
        }

        let action = policy.act(&observation).await?;
        let step = env.step(action).await?;
        summary.steps += 1;
        total += step.reward;
        summary.total_reward = total.value();

        if step.done || step.truncated {
            summary.outcome = outcome_of(&step.info);
            summary.truncated = step.truncated;
            break;
        }
        observation = step.observation;
    }

    Ok(summary)
}

/// Run `driver.episodes` episodes back to back
pub async fn run<E, P>(env: &mut E, policy: &P, driver: &DriverConfig) -> Result<Vec<EpisodeSummary>>
where
    E: Environment,
    P: Policy<Observation = E::Observation, Action = E::Action>,
{
    let mut summaries = Vec::with_capacity(driver.episodes);
    for episode in 0..driver.episodes {
        let summary = run_episode(env, policy, driver.max_steps_per_episode).await?;
        info!(
            episode = episode + 1,
            steps = summary.steps,
            total_reward = summary.total_reward,
            outcome = ?summary.outcome,
            truncated = summary.truncated,
            "episode finished"
        );
        summaries.push(summary);
    }
    Ok(summaries)
}
