use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// A position or displacement in the creature's 2D plane.
pub type Point = Vec2;

/// Scalar helpers over [`Point`] used by the joints and solvers.
pub trait PointExt {
    /// Euclidean length, `sqrt(x² + y²)`.
    fn magnitude(self) -> f32;

    /// Bearing of the vector, `atan2(y, x)`, in `(-π, π]`. The zero vector has bearing 0.
    fn angle_of(self) -> f32;

    /// Bearing of `self` as seen from `other`, i.e. of `self - other`.
    fn bearing_from(self, other: Point) -> f32;

    /// Same direction, magnitude exactly `magnitude`. Vectors too short to
    /// normalize, including zero, give zero.
    fn with_magnitude(self, magnitude: f32) -> Point;
}

impl PointExt for Point {
    fn magnitude(self) -> f32 {
        self.length()
    }

    fn angle_of(self) -> f32 {
        if self == Vec2::ZERO {
            return 0.0;
        }
        wrap_angle(self.y.atan2(self.x))
    }

    fn bearing_from(self, other: Point) -> f32 {
        (self - other).angle_of()
    }

    fn with_magnitude(self, magnitude: f32) -> Point {
        self.normalize_or_zero() * magnitude
    }
}

pub fn distance(p: Point, q: Point) -> f32 {
    (p - q).magnitude()
}

/// Moves `position` onto the circle of radius `max_length` around `anchor`,
/// keeping its bearing from the anchor.
///
/// When `position` coincides with `anchor` there is no bearing to keep and the
/// result lies along +X, so the returned point is still exactly `max_length` away.
pub fn distance_constrained_position(position: Point, anchor: Point, max_length: f32) -> Point {
    let dir = (position - anchor).normalize_or_zero();
    if dir == Vec2::ZERO {
        return anchor + Vec2::X * max_length;
    }
    anchor + dir * max_length
}

/// Wraps an angle into `(-π, π]`. Non-finite input wraps to 0.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
