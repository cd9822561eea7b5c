//! Example: random policy driving in the headless arena

use drive_rl_env::prelude::*;
use drive_rl_env::{run, RandomPolicy, TerminalOutcome, TrackedEnvironment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG=debug shows resets and terminal events
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => DriveConfig::from_file(path)?,
        None => DriveConfig::default(),
    };
    let driver = DriverConfig {
        training_backend_attached: true,
        episodes: 10,
        ..DriverConfig::default()
    };

    let mut arena = HeadlessArena::for_stage(&config);
    driver.apply_to(&mut arena);

    let env = DriveEnv::with_seed(config, arena, 42)?;
    let env = TimeLimit::new(env, 500);
    let mut env = TrackedEnvironment::new(env);
    let policy = RandomPolicy::new();

    let summaries = run(&mut env, &policy, &DriverConfig { max_steps_per_episode: None, ..driver }).await?;

    let goals = summaries.iter().filter(|s| s.outcome == Some(TerminalOutcome::GoalReached)).count();
    let avg_reward = summaries.iter().map(|s| s.total_reward).sum::<f64>() / summaries.len() as f64;
    println!("\nGoals reached: {goals}/{}", summaries.len());
    println!("Average reward: {avg_reward:.3}");

    env.close().await?;
    Ok(())
}
