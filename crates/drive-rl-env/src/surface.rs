//! Surface kinds and contact events reported by the host

use serde::{Deserialize, Serialize};

/// What a ray or a contact touched.
///
/// Hosts usually label scene objects with free-form tags; those are resolved
/// once at the boundary with [`SurfaceKind::from_tag`] and matched
/// exhaustively from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Stage boundary
    Wall,
    /// Placed obstacle
    Obstacle,
    /// Goal marker
    Goal,
    /// Anything else (floor, decoration)
    Other,
}

impl SurfaceKind {
    /// Resolve a host tag; unknown tags become [`SurfaceKind::Other`]
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Wall" => Self::Wall,
            "Obstacle" => Self::Obstacle,
            "Goal" => Self::Goal,
            _ => Self::Other,
        }
    }

    /// Surfaces that end the episode with a penalty when driven into
    #[must_use]
    pub fn is_hazard(self) -> bool {
        match self {
            Self::Wall | Self::Obstacle => true,
            Self::Goal | Self::Other => false,
        }
    }
}

/// Discrete collision/trigger notification from the host physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactEvent {
    /// The agent body started touching a solid collider
    EnteredSolid(SurfaceKind),
    /// The agent body entered a trigger volume
    EnteredTrigger(SurfaceKind),
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalOutcome {
    /// Drove into a wall or obstacle
    Collision,
    /// Entered the goal trigger
    GoalReached,
}

impl TerminalOutcome {
    /// Map a contact event to the outcome it causes, if any
    #[must_use]
    pub fn from_event(event: ContactEvent) -> Option<Self> {
        match event {
            ContactEvent::EnteredSolid(kind) if kind.is_hazard() => Some(Self::Collision),
            ContactEvent::EnteredTrigger(SurfaceKind::Goal) => Some(Self::GoalReached),
            ContactEvent::EnteredSolid(_) | ContactEvent::EnteredTrigger(_) => None,
        }
    }
}
