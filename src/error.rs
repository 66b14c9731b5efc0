use thiserror::Error;

/// Malformed construction-time configuration.
///
/// Every builder validates its input once; solvers and `step` calls never fail afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("chain must have at least one joint")]
    EmptyChain,
    #[error("chain needs at least {required} joints, got {actual}")]
    ChainTooShort { required: usize, actual: usize },
    #[error("joint spacing must be positive and finite, got {0}")]
    InvalidSpacing(f32),
    #[error("joint {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("responsiveness must lie in [0, 1], got {0}")]
    InvalidResponsiveness(f32),
    #[error("limb anchor index {index} out of range for a spine of {len} joints")]
    AnchorOutOfRange { index: usize, len: usize },
    #[error("step threshold must be positive and finite, got {0}")]
    InvalidStepThreshold(f32),
    #[error("shoulder inset must be finite, got {0}")]
    InvalidInset(f32),
}
