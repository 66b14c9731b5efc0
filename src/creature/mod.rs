//! Creature module
//!
//! A spine chain plus legs that plant their feet in discrete steps.

pub mod body;
pub mod limb;

pub use body::{
    Creature, CreatureBuilder, StepReport, LIZARD_PROFILE, LIZARD_SPACING, LIZARD_STEP_THRESHOLD,
};
pub use limb::{Limb, LimbConfig, Region, Side, Stance};
