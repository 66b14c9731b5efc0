//! # lizard-ik
//!
//! 2D procedural animation for an articulated creature: a spine that chases a
//! moving target and four legs that reach for planted feet.
//!
//! ## Features
//! - Direct-follow chase propagation for long spines
//! - FABRIK (Forward And Backward Reaching Inverse Kinematics) solver
//! - Damped CCD (Cyclic Coordinate Descent) solver
//! - Foot-stepping policy with hysteresis
//!
//! ## Example
//! ```rust,ignore
//! use lizard_ik::{Creature, Point};
//!
//! let mut lizard = Creature::lizard(Point::new(400.0, 300.0))?;
//!
//! // Once per frame, toward the pointer
//! let report = lizard.step(Point::new(900.0, 120.0));
//! if report.any_stepped() {
//!     println!("{} feet moved", report.step_count());
//! }
//! for joint in lizard.spine().joints() {
//!     let (left, right) = (joint.left(), joint.right());
//! }
//! ```

pub mod creature;
pub mod error;
pub mod ik;
pub mod math;

pub use creature::{Creature, CreatureBuilder, Limb, LimbConfig, Region, Side, StepReport};
pub use error::BuildError;
pub use ik::{
    CcdSolver, Chain, ChainBuilder, ChaseSolver, FabrikSolver, Goal, HeadMode, Joint, PoseSolver,
    SolveResult,
};
pub use math::{Point, PointExt};
