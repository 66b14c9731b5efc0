//! Inverse Kinematics module
//!
//! This module contains the joint and chain types and the three pose solvers:
//! direct-follow chase, FABRIK and CCD.

pub mod chain;
pub mod joint;
pub mod solver;

pub use chain::{Chain, ChainBuilder};
pub use joint::{Joint, CCD_STEP_FRACTION};
pub use solver::{
    CcdSolver, ChaseSolver, FabrikSolver, Goal, HeadMode, PoseSolver, SolveResult,
};
