use crate::math::{wrap_angle, Point, PointExt, Vec2};
use std::f32::consts::FRAC_PI_2;

/// Fraction of the wrapped angular error a CCD step applies at full responsiveness.
pub const CCD_STEP_FRACTION: f32 = 0.1;

/// A rigid link: a pivot, a fixed segment length and an orientation.
///
/// Joints are created by their [`Chain`](super::Chain) and only mutated by the solvers.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub(crate) position: Point,
    pub(crate) length: f32,
    pub(crate) radius: f32,
    pub(crate) angle: f32,
    pub(crate) responsiveness: f32,
}

impl Joint {
    pub fn new(position: Point, length: f32, radius: f32) -> Self {
        Self {
            position,
            length,
            radius,
            angle: 0.0,
            responsiveness: 1.0,
        }
    }

    pub fn with_responsiveness(mut self, responsiveness: f32) -> Self {
        self.responsiveness = responsiveness;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn responsiveness(&self) -> f32 {
        self.responsiveness
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Far end of this joint's segment.
    pub fn endpoint(&self) -> Point {
        self.position + self.direction() * self.length
    }

    /// Point at `radius + length_offset` from the pivot, rotated `angle_offset` from the heading.
    pub fn offset(&self, angle_offset: f32, length_offset: f32) -> Point {
        self.position + Vec2::from_angle(self.angle + angle_offset) * (self.radius + length_offset)
    }

    pub fn left(&self) -> Point {
        self.offset(-FRAC_PI_2, 0.0)
    }

    pub fn right(&self) -> Point {
        self.offset(FRAC_PI_2, 0.0)
    }

    pub(crate) fn set_angle(&mut self, angle: f32) {
        self.angle = wrap_angle(angle);
    }

    pub(crate) fn face(&mut self, target: Point) {
        self.set_angle((target - self.position).angle_of());
    }

    /// Turns toward `target` and, if it is more than one segment away, moves along
    /// the new heading by the excess. Closer targets only turn the joint.
    pub fn chase(&mut self, target: Point) {
        self.face(target);

        let dist = (target - self.position).magnitude();
        if dist > self.length {
            self.position += self.direction() * (dist - self.length);
        }
    }

    /// One damped CCD rotation: turns so that `endpoint` (as seen from this pivot)
    /// swings toward `target` by a fraction of the wrapped angular error.
    pub fn rotate_toward(&mut self, endpoint: Point, target: Point, step_fraction: f32) {
        let current = (endpoint - self.position).angle_of();
        let desired = (target - self.position).angle_of();
        let delta = wrap_angle(desired - current);
        self.set_angle(self.angle + delta * self.responsiveness * step_fraction);
    }
}
