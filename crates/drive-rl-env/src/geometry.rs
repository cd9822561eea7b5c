//! Ground-plane geometry helpers on top of nalgebra
//!
//! The stage is the x/z plane with +y up. An orientation of identity faces
//! +z, and a positive yaw turns +z toward +x.

use nalgebra::{UnitQuaternion, Vector3};

/// Position or direction in stage space
pub type Vec3 = Vector3<f64>;

/// Body orientation
pub type Rotation = UnitQuaternion<f64>;

const DIRECTION_EPSILON: f64 = 1e-9;

/// Rotation of `degrees` about the vertical axis
#[must_use]
pub fn yaw_rotation(degrees: f64) -> Rotation {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), degrees.to_radians())
}

/// Facing direction of a body with the given orientation
#[must_use]
pub fn forward(orientation: &Rotation) -> Vec3 {
    orientation * Vector3::z()
}

/// Heading of `orientation` in degrees, in `[0, 360)`
#[must_use]
pub fn yaw_degrees(orientation: &Rotation) -> f64 {
    let f = forward(orientation);
    f.x.atan2(f.z).to_degrees().rem_euclid(360.0)
}

/// Distance between two points ignoring height
#[must_use]
pub fn planar_distance(a: &Vec3, b: &Vec3) -> f64 {
    (b.x - a.x).hypot(b.z - a.z)
}

/// Unit vector in the ground plane from `from` toward `to`.
///
/// Returns the zero vector when the points coincide.
#[must_use]
pub fn planar_direction(from: &Vec3, to: &Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z)
        .try_normalize(DIRECTION_EPSILON)
        .unwrap_or_else(Vec3::zeros)
}

/// Unsigned angle between two vectors in degrees, `0` if either is degenerate
#[must_use]
pub fn angle_degrees(a: &Vec3, b: &Vec3) -> f64 {
    let denom = (a.norm_squared() * b.norm_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_faces_plus_z() {
        let f = forward(&Rotation::identity());
        assert_relative_eq!(f, Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(yaw_degrees(&Rotation::identity()), 0.0);
    }

    #[test]
    fn test_positive_yaw_turns_toward_plus_x() {
        let f = forward(&yaw_rotation(90.0));
        assert_relative_eq!(f, Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(yaw_degrees(&yaw_rotation(270.0)), 270.0, epsilon = 1e-9);
        assert_relative_eq!(yaw_degrees(&yaw_rotation(-90.0)), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_planar_helpers_ignore_height() {
        let a = Vec3::new(0.0, 0.5, 0.0);
        let b = Vec3::new(3.0, 7.0, 4.0);
        assert_relative_eq!(planar_distance(&a, &b), 5.0);
        let d = planar_direction(&a, &b);
        assert_relative_eq!(d, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-12);
        assert_eq!(planar_direction(&a, &a), Vec3::zeros());
    }

    #[test]
    fn test_angle_degrees() {
        assert_relative_eq!(angle_degrees(&Vec3::z(), &Vec3::x()), 90.0, epsilon = 1e-9);
        assert_relative_eq!(angle_degrees(&Vec3::z(), &-Vec3::z()), 180.0, epsilon = 1e-9);
        assert_relative_eq!(angle_degrees(&Vec3::z(), &Vec3::zeros()), 0.0);
    }
}
