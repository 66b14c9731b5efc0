use super::joint::Joint;
use crate::error::BuildError;
use crate::math::{Point, Vec2};

/// An ordered, fixed-length run of joints from the head (index 0) to the tail.
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) joints: Vec<Joint>,
    pub(crate) spacing: f32,
    pub(crate) base: Point,
    pub(crate) heading: f32,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn total_length(&self) -> f32 {
        self.joints.iter().map(Joint::length).sum()
    }

    pub fn head(&self) -> &Joint {
        &self.joints[0]
    }

    pub fn tail(&self) -> &Joint {
        &self.joints[self.joints.len() - 1]
    }

    /// Last commanded head position.
    pub fn base(&self) -> Point {
        self.base
    }

    /// Last commanded head direction.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.joints.iter().map(|j| j.position)
    }
}

/// Builds a [`Chain`] from a per-joint radius profile.
///
/// Joints are laid out head first along -X from `origin`, `spacing` apart,
/// every joint using `spacing` as its rest length.
pub struct ChainBuilder {
    radii: Vec<f32>,
    spacing: f32,
    origin: Point,
    responsiveness: f32,
    min_joints: usize,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            radii: Vec::new(),
            spacing: 1.0,
            origin: Point::ZERO,
            responsiveness: 1.0,
            min_joints: 1,
        }
    }

    pub fn add_joint(mut self, radius: f32) -> Self {
        self.radii.push(radius);
        self
    }

    pub fn profile<I: IntoIterator<Item = f32>>(mut self, radii: I) -> Self {
        self.radii.extend(radii);
        self
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn responsiveness(mut self, responsiveness: f32) -> Self {
        self.responsiveness = responsiveness;
        self
    }

    pub fn min_joints(mut self, min_joints: usize) -> Self {
        self.min_joints = min_joints;
        self
    }

    pub fn build(self) -> Result<Chain, BuildError> {
        self.validate()?;

        let joints = self
            .radii
            .iter()
            .enumerate()
            .map(|(i, &radius)| {
                let position = self.origin - Vec2::X * (i as f32 * self.spacing);
                Joint::new(position, self.spacing, radius).with_responsiveness(self.responsiveness)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "built chain of {} joints, spacing {}, at {:?}",
            joints.len(),
            self.spacing,
            self.origin
        );

        Ok(Chain {
            joints,
            spacing: self.spacing,
            base: self.origin,
            heading: 0.0,
        })
    }

    fn validate(&self) -> Result<(), BuildError> {
        if self.radii.is_empty() {
            return Err(BuildError::EmptyChain);
        }
        if self.radii.len() < self.min_joints {
            return Err(BuildError::ChainTooShort {
                required: self.min_joints,
                actual: self.radii.len(),
            });
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(BuildError::InvalidSpacing(self.spacing));
        }
        if let Some((index, &radius)) = self
            .radii
            .iter()
            .enumerate()
            .find(|(_, r)| !(r.is_finite() && **r >= 0.0))
        {
            return Err(BuildError::InvalidRadius { index, radius });
        }
        if !(0.0..=1.0).contains(&self.responsiveness) {
            return Err(BuildError::InvalidResponsiveness(self.responsiveness));
        }
        Ok(())
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
