use crate::error::BuildError;
use crate::ik::{Chain, FabrikSolver, Goal, Joint, PoseSolver};
use crate::math::{distance, Point, Vec2};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

/// Default fraction of the maximum reach the foot may trail before it steps.
pub const DEFAULT_STEP_THRESHOLD: f32 = 0.7;

/// Which side of the body a limb hangs from, seen from above with the head leading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Front,
    Back,
}

impl Region {
    /// Forward lean of the idle foot placement, away from the body axis.
    fn lean(self) -> f32 {
        match self {
            Region::Front => FRAC_PI_8,
            Region::Back => FRAC_PI_4,
        }
    }

    /// Share of the maximum reach used for the idle foot placement.
    fn stride(self) -> f32 {
        match self {
            Region::Front => 1.0,
            Region::Back => 0.5,
        }
    }
}

/// Construction parameters for one [`Limb`].
#[derive(Debug, Clone)]
pub struct LimbConfig {
    pub anchor_index: usize,
    pub side: Side,
    pub region: Region,
    pub spacing: f32,
    pub radii: Vec<f32>,
    /// How far inside the body outline the shoulder sits.
    pub inset: f32,
    pub step_threshold: f32,
    pub solver: Box<dyn PoseSolver>,
}

impl LimbConfig {
    pub fn new(anchor_index: usize, side: Side, region: Region) -> Self {
        Self {
            anchor_index,
            side,
            region,
            spacing: 40.0,
            radii: vec![20.0, 40.0, 30.0],
            inset: 14.0,
            step_threshold: DEFAULT_STEP_THRESHOLD,
            solver: Box::new(FabrikSolver::default()),
        }
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_radii<I: IntoIterator<Item = f32>>(mut self, radii: I) -> Self {
        self.radii = radii.into_iter().collect();
        self
    }

    pub fn with_inset(mut self, inset: f32) -> Self {
        self.inset = inset;
        self
    }

    pub fn with_step_threshold(mut self, step_threshold: f32) -> Self {
        self.step_threshold = step_threshold;
        self
    }

    pub fn with_solver<S: PoseSolver + 'static>(mut self, solver: S) -> Self {
        self.solver = Box::new(solver);
        self
    }

    fn validate(&self) -> Result<(), BuildError> {
        if !(self.step_threshold.is_finite() && self.step_threshold > 0.0) {
            return Err(BuildError::InvalidStepThreshold(self.step_threshold));
        }
        if !self.inset.is_finite() {
            return Err(BuildError::InvalidInset(self.inset));
        }
        Ok(())
    }
}

/// Where the limb attaches this frame and where its foot would land if it stepped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stance {
    pub shoulder: Point,
    pub candidate: Point,
}

/// A short leg chain hanging off one spine joint, planting its foot in discrete steps.
///
/// The limb refers to its spine joint by index only; the caller passes the
/// current joint to every update.
#[derive(Debug, Clone)]
pub struct Limb {
    chain: Chain,
    solver: Box<dyn PoseSolver>,
    anchor_index: usize,
    side: Side,
    region: Region,
    foot: Point,
    max_reach: f32,
    step_threshold: f32,
    inset: f32,
}

impl Limb {
    /// Builds the leg at `anchor` and plants its foot at the idle position.
    pub fn new(config: LimbConfig, anchor: &Joint) -> Result<Self, BuildError> {
        config.validate()?;

        let chain = Chain::builder()
            .profile(config.radii.iter().copied())
            .spacing(config.spacing)
            .min_joints(2)
            .build()?;
        let max_reach = chain.joint_count() as f32 * config.spacing;

        let mut limb = Self {
            chain,
            solver: config.solver,
            anchor_index: config.anchor_index,
            side: config.side,
            region: config.region,
            foot: Point::ZERO,
            max_reach,
            step_threshold: config.step_threshold,
            inset: config.inset,
        };
        limb.plant(anchor);
        Ok(limb)
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Current foot target.
    pub fn foot(&self) -> Point {
        self.foot
    }

    pub fn max_reach(&self) -> f32 {
        self.max_reach
    }

    pub fn step_threshold(&self) -> f32 {
        self.step_threshold
    }

    /// Distance the foot may trail from the anchor joint before the limb steps.
    pub fn step_distance(&self) -> f32 {
        self.step_threshold * self.max_reach
    }

    pub fn stance(&self, anchor: &Joint) -> Stance {
        let sign = self.side.sign();
        let move_angle = anchor.angle() + sign * self.region.lean();
        let reach = self.max_reach * self.region.stride();

        let flank = match self.side {
            Side::Left => anchor.left(),
            Side::Right => anchor.right(),
        };

        Stance {
            shoulder: anchor.offset(sign * FRAC_PI_2, -self.inset),
            candidate: flank + Vec2::from_angle(move_angle) * reach,
        }
    }

    /// Puts the foot on the idle position unconditionally and re-solves the leg.
    pub fn plant(&mut self, anchor: &Joint) {
        let stance = self.stance(anchor);
        self.foot = stance.candidate;
        self.solver
            .solve(&mut self.chain, Goal::anchored(self.foot, stance.shoulder));
    }

    /// Re-poses the leg against the anchor joint's current pose. Returns `true`
    /// when the foot trailed too far and was moved to a new target this call.
    pub fn update(&mut self, anchor: &Joint) -> bool {
        let stance = self.stance(anchor);

        let stepped = distance(anchor.position(), self.foot) > self.step_distance();
        if stepped {
            log::trace!(
                "limb on spine joint {} steps from {:?} to {:?}",
                self.anchor_index,
                self.foot,
                stance.candidate
            );
            self.foot = stance.candidate;
        }

        self.solver
            .solve(&mut self.chain, Goal::anchored(self.foot, stance.shoulder));
        stepped
    }
}
