use super::limb::{Limb, LimbConfig, Region, Side};
use crate::error::BuildError;
use crate::ik::{Chain, ChaseSolver, Goal, HeadMode, PoseSolver, SolveResult};
use crate::math::Point;

/// Spine radii of the reference lizard, head first.
pub const LIZARD_PROFILE: [f32; 15] = [
    52.0, 58.0, 40.0, 60.0, 68.0, 71.0, 65.0, 50.0, 28.0, 15.0, 11.0, 9.0, 7.0, 7.0, 7.0,
];
pub const LIZARD_SPACING: f32 = 64.0;
/// The lizard's feet trail until `0.7 * distance` exceeds their reach.
pub const LIZARD_STEP_THRESHOLD: f32 = 1.0 / 0.7;

/// Outcome of one [`Creature::step`].
#[derive(Debug, Clone, Copy)]
pub struct StepReport<'a> {
    pub head: SolveResult,
    /// Per limb, in construction order: whether the foot moved to a new target.
    pub stepped: &'a [bool],
}

impl StepReport<'_> {
    pub fn any_stepped(&self) -> bool {
        self.stepped.iter().any(|&s| s)
    }

    pub fn step_count(&self) -> usize {
        self.stepped.iter().filter(|&&s| s).count()
    }
}

/// A spine chain with legs hung off fixed spine joints.
#[derive(Debug, Clone)]
pub struct Creature {
    spine: Chain,
    solver: Box<dyn PoseSolver>,
    limbs: Vec<Limb>,
    stepped: Vec<bool>,
}

impl Creature {
    pub fn builder() -> CreatureBuilder {
        CreatureBuilder::new()
    }

    /// The reference four-legged lizard with its head at `origin`.
    pub fn lizard(origin: Point) -> Result<Self, BuildError> {
        let leg = |index, side, region| {
            LimbConfig::new(index, side, region).with_step_threshold(LIZARD_STEP_THRESHOLD)
        };

        Self::builder()
            .profile(LIZARD_PROFILE)
            .spacing(LIZARD_SPACING)
            .origin(origin)
            .limb(leg(3, Side::Right, Region::Front))
            .limb(leg(7, Side::Left, Region::Back))
            .limb(leg(3, Side::Left, Region::Front))
            .limb(leg(7, Side::Right, Region::Back))
            .build()
    }

    pub fn spine(&self) -> &Chain {
        &self.spine
    }

    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Advances the pose one frame toward `target`: the spine first, root to
    /// tail, then every limb against its freshly moved spine joint.
    pub fn step(&mut self, target: Point) -> StepReport<'_> {
        let head = self.solver.solve(&mut self.spine, Goal::toward(target));

        for (limb, stepped) in self.limbs.iter_mut().zip(self.stepped.iter_mut()) {
            let anchor = &self.spine.joints[limb.anchor_index()];
            *stepped = limb.update(anchor);
        }

        StepReport {
            head,
            stepped: &self.stepped,
        }
    }
}

pub struct CreatureBuilder {
    profile: Vec<f32>,
    spacing: f32,
    origin: Point,
    solver: Box<dyn PoseSolver>,
    limbs: Vec<LimbConfig>,
}

impl CreatureBuilder {
    pub fn new() -> Self {
        Self {
            profile: Vec::new(),
            spacing: LIZARD_SPACING,
            origin: Point::ZERO,
            solver: Box::new(ChaseSolver::default()),
            limbs: Vec::new(),
        }
    }

    pub fn profile<I: IntoIterator<Item = f32>>(mut self, radii: I) -> Self {
        self.profile.extend(radii);
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

    pub fn head_mode(mut self, head: HeadMode) -> Self {
        self.solver = Box::new(ChaseSolver::new(head));
        self
    }

    pub fn solver<S: PoseSolver + 'static>(mut self, solver: S) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn limb(mut self, limb: LimbConfig) -> Self {
        self.limbs.push(limb);
        self
    }

    pub fn build(self) -> Result<Creature, BuildError> {
        let spine = Chain::builder()
            .profile(self.profile)
            .spacing(self.spacing)
            .origin(self.origin)
            .build()?;

        let limbs = self
            .limbs
            .into_iter()
            .map(|config| {
                let anchor = spine
                    .joint(config.anchor_index)
                    .ok_or(BuildError::AnchorOutOfRange {
                        index: config.anchor_index,
                        len: spine.joint_count(),
                    })?;
                Limb::new(config, anchor)
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "built creature: {} spine joints, {} limbs",
            spine.joint_count(),
            limbs.len()
        );

        Ok(Creature {
            stepped: vec![false; limbs.len()],
            spine,
            solver: self.solver,
            limbs,
        })
    }
}

impl Default for CreatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}
