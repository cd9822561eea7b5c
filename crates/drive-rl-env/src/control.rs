//! Policies that are not a learning backend: manual input and random play

use async_trait::async_trait;
use drive_rl_core::{ActionSpace, Policy, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::action::{DriveAction, DriveActionSpace};
use crate::observation::DriveObservation;

/// Source of two analog input axes, e.g. a keyboard or gamepad
pub trait InputAxes: Send + Sync {
    /// Throttle axis, nominally `[-1, 1]`
    fn vertical(&self) -> f64;
    /// Steering axis, nominally `[-1, 1]`
    fn horizontal(&self) -> f64;

    /// Called once after both axes of a frame were read
    fn end_frame(&self) {}
}

/// Manual-control fallback used when no learning backend drives the agent
pub struct ManualControl<I> {
    input: I,
}

impl<I: InputAxes> ManualControl<I> {
    /// Wrap an input source
    pub fn new(input: I) -> Self {
        Self { input }
    }

    /// Read the axes into a drive command
    pub fn read(&self) -> DriveAction {
        let action = DriveAction::new(self.input.vertical(), self.input.horizontal());
        self.input.end_frame();
        action
    }
}

#[async_trait]
impl<I: InputAxes> Policy for ManualControl<I> {
    type Observation = DriveObservation;
    type Action = DriveAction;

    async fn act(&self, _observation: &DriveObservation) -> Result<DriveAction> {
        Ok(self.read())
    }
}

/// Replays a fixed list of axis readings, holding the last one.
///
/// Stands in for a human in demos and tests.
pub struct ScriptedAxes {
    readings: Vec<(f64, f64)>,
    cursor: AtomicUsize,
}

impl ScriptedAxes {
    /// Script of `(vertical, horizontal)` pairs
    #[must_use]
    pub fn new(readings: Vec<(f64, f64)>) -> Self {
        Self {
            readings,
            cursor: AtomicUsize::new(0),
        }
    }

    fn current(&self) -> (f64, f64) {
        let i = self.cursor.load(Ordering::Relaxed);
        self.readings
            .get(i)
            .or_else(|| self.readings.last())
            .copied()
            .unwrap_or((0.0, 0.0))
    }

}

impl InputAxes for ScriptedAxes {
    fn vertical(&self) -> f64 {
        self.current().0
    }

    fn horizontal(&self) -> f64 {
        self.current().1
    }

    fn end_frame(&self) {
        // saturating: the last reading stays held
        let _ = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| c.checked_add(1));
    }
}

/// Uniformly random actions in the nominal action box
#[derive(Default)]
pub struct RandomPolicy {
    space: DriveActionSpace,
}

impl RandomPolicy {
    /// Create a random policy
    #[must_use]
    pub fn new() -> Self {
        Self {
            space: DriveActionSpace::new(),
        }
    }
}

#[async_trait]
impl Policy for RandomPolicy {
    type Observation = DriveObservation;
    type Action = DriveAction;

    async fn act(&self, _observation: &DriveObservation) -> Result<DriveAction> {
        Ok(self.space.sample())
    }
}
