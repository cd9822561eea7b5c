//! Geometric ray probe supplied by the host

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::surface::SurfaceKind;

/// Nearest surface struck by a ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Distance from the ray origin
    pub distance: f64,
    /// What was hit
    pub surface: SurfaceKind,
}

/// Ray-cast primitive of the host world
pub trait WorldProbe {
    /// Cast from `origin` along unit `direction`, returning the nearest hit
    /// within `max_range`
    fn cast(&self, origin: &Vec3, direction: &Vec3, max_range: f64) -> Option<RayHit>;
}

impl<P: WorldProbe + ?Sized> WorldProbe for &P {
    fn cast(&self, origin: &Vec3, direction: &Vec3, max_range: f64) -> Option<RayHit> {
        (**self).cast(origin, direction, max_range)
    }
}

/// Probe for an empty world: nothing is ever hit
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSky;

impl WorldProbe for OpenSky {
    fn cast(&self, _origin: &Vec3, _direction: &Vec3, _max_range: f64) -> Option<RayHit> {
        None
    }
}
