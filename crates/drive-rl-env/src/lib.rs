//! Goal-seeking driving agent
//!
//! An agent on a bounded flat stage learns to reach a randomly placed goal
//! while avoiding walls and obstacles. This crate provides:
//! - Episode reset with non-overlapping random placement
//! - The eight-feature observation encoder
//! - Action decoding and kinematic motion
//! - Reward shaping and terminal event handling
//! - A host boundary ([`DriveHost`]) with a headless arena implementation
//! - An [`Environment`] adapter and a small driver loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod arena;
pub mod config;
pub mod control;
pub mod env;
pub mod episode;
pub mod geometry;
pub mod host;
pub mod observation;
pub mod probe;
pub mod reward;
pub mod runtime;
pub mod state;
pub mod surface;
pub mod wrappers;

pub use action::{apply, DriveAction, DriveActionSpace};
pub use arena::{ArenaConfig, HeadlessArena};
pub use config::{DriveConfig, RewardPolicy, RewardWeights};
pub use control::{InputAxes, ManualControl, RandomPolicy, ScriptedAxes};
pub use env::DriveEnv;
pub use episode::EpisodeStart;
pub use geometry::{Rotation, Vec3};
pub use host::DriveHost;
pub use observation::{observe, DriveObservation, DriveObservationSpace, OBSERVATION_DIM};
pub use probe::{OpenSky, RayHit, WorldProbe};
pub use reward::RewardBreakdown;
pub use runtime::{run, run_episode, DriverConfig, EpisodeSummary};
pub use state::{AgentState, DriveState, EpisodeContext, GoalState, Obstacle, ObstacleSet};
pub use surface::{ContactEvent, SurfaceKind, TerminalOutcome};
pub use wrappers::TimeLimit;

// Re-export core types
pub use drive_rl_core::{
    Environment, EnvironmentConfig, Episode, Policy, RLError, Result, Reward, Step, StepInfo,
    TrackedEnvironment,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DriveAction, DriveConfig, DriveEnv, DriveHost, DriveObservation, DriverConfig,
        HeadlessArena, TimeLimit,
    };
    pub use drive_rl_core::prelude::*;
}
