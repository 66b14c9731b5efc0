//! Math utilities module
//!
//! 2D point helpers shared by the joints and solvers.

mod point;

pub use point::{distance, distance_constrained_position, wrap_angle, Point, PointExt};

// Re-export commonly used glam types
pub use glam::Vec2;
