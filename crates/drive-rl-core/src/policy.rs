//! Policy abstraction for action selection

use async_trait::async_trait;

use crate::{Action, Observation};

/// Core policy trait for selecting actions
///
/// A learning backend, a scripted controller or a human at the keyboard all
/// sit behind this trait; the driver loop does not care which.
#[async_trait]
pub trait Policy: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;

    /// Select an action given an observation
    async fn act(&self, observation: &Self::Observation) -> crate::Result<Self::Action>;
}
