//! Core reinforcement learning traits and types for the driving agent
//!
//! This crate provides the vocabulary shared between an agent core and the
//! host that drives it: environments, policies, actions, observations,
//! rewards and the error type.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod environment;
pub mod error;
pub mod observation;
pub mod policy;
pub mod reward;
pub mod state;

// Re-export core traits and types
pub use action::{Action, ActionSpace, ContinuousSpace};
pub use environment::{Environment, EnvironmentConfig, Episode, Step, StepInfo, TrackedEnvironment};
pub use error::{RLError, Result};
pub use observation::{BoxObservationSpace, Observation, ObservationSpace, VectorObservation};
pub use policy::Policy;
pub use reward::Reward;
pub use state::{State, Terminal};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, ActionSpace, Environment, Observation, ObservationSpace, Policy, Result, Reward,
        State, Step, Terminal,
    };
}
