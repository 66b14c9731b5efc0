use super::chain::Chain;
use super::joint::CCD_STEP_FRACTION;
use crate::math::{distance, distance_constrained_position, wrap_angle, Point, PointExt};
use std::fmt::Debug;

/// What a solver is asked to reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub target: Point,
    /// Where the chain's head must sit. `None` keeps the current head position.
    pub anchor: Option<Point>,
}

impl Goal {
    pub fn toward(target: Point) -> Self {
        Self {
            target,
            anchor: None,
        }
    }

    pub fn anchored(target: Point, anchor: Point) -> Self {
        Self {
            target,
            anchor: Some(anchor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    pub reached: bool,
    pub iterations: u32,
    pub final_distance: f32,
}

impl SolveResult {
    fn untouched() -> Self {
        Self {
            reached: true,
            iterations: 0,
            final_distance: 0.0,
        }
    }
}

/// A pose-propagation algorithm over a [`Chain`].
///
/// Solvers only move joint positions and angles; they never change the number
/// of joints or their rest lengths.
pub trait PoseSolver: Send + Sync + Debug {
    fn solve(&self, chain: &mut Chain, goal: Goal) -> SolveResult;
    fn clone_box(&self) -> Box<dyn PoseSolver>;
}

impl Clone for Box<dyn PoseSolver> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// How the head of a chased chain reacts to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadMode {
    /// Head is placed on the target.
    Snap,
    /// Head turns by `turn_rate` of its heading error and advances `speed`
    /// per call while the target is more than one segment away.
    Steer { turn_rate: f32, speed: f32 },
}

impl Default for HeadMode {
    fn default() -> Self {
        HeadMode::Steer {
            turn_rate: 0.01,
            speed: 2.0,
        }
    }
}

/// Direct-follow ("rope with slack") propagation for long spines.
///
/// Every joint after the head chases its predecessor's fresh position, so
/// joints trail behind and may sit closer than one segment length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaseSolver {
    pub head: HeadMode,
}

impl ChaseSolver {
    pub fn new(head: HeadMode) -> Self {
        Self { head }
    }

    fn move_head(&self, chain: &mut Chain, target: Point) {
        let head = &mut chain.joints[0];
        match self.head {
            HeadMode::Snap => {
                head.face(target);
                head.position = target;
            }
            HeadMode::Steer { turn_rate, speed } => {
                let desired = (target - head.position).angle_of();
                let delta = wrap_angle(desired - head.angle);
                head.set_angle(head.angle + delta * turn_rate);

                if distance(target, head.position) > head.length {
                    head.position += head.direction() * speed;
                }
            }
        }
        chain.base = chain.joints[0].position;
        chain.heading = chain.joints[0].angle;
    }

    fn propagate(chain: &mut Chain) {
        for i in 1..chain.joints.len() {
            let prev = chain.joints[i - 1].position;
            chain.joints[i].chase(prev);
        }
    }
}

impl PoseSolver for ChaseSolver {
    fn solve(&self, chain: &mut Chain, goal: Goal) -> SolveResult {
        if chain.joints.is_empty() {
            return SolveResult::untouched();
        }

        self.move_head(chain, goal.target);
        Self::propagate(chain);

        let final_distance = distance(chain.joints[0].position, goal.target);
        SolveResult {
            reached: final_distance <= chain.joints[0].length,
            iterations: 1,
            final_distance,
        }
    }

    fn clone_box(&self) -> Box<dyn PoseSolver> {
        Box::new(*self)
    }
}

/// Forward-and-backward reaching IK. One iteration is exact for the
/// anchor/target pair and leaves every segment at its rest length.
#[derive(Debug, Clone, Copy)]
pub struct FabrikSolver {
    pub max_iterations: u32,
    pub tolerance: f32,
}

impl Default for FabrikSolver {
    fn default() -> Self {
        Self {
            max_iterations: 1,
            tolerance: 0.001,
        }
    }
}

impl FabrikSolver {
    pub fn new(max_iterations: u32, tolerance: f32) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            tolerance,
        }
    }

    fn backward_pass(chain: &mut Chain, target: Point) {
        let n = chain.joints.len();

        chain.joints[n - 1].position = target;

        for i in (0..n - 1).rev() {
            let next_pos = chain.joints[i + 1].position;
            let curr = &mut chain.joints[i];
            curr.position = distance_constrained_position(curr.position, next_pos, curr.length);
        }
    }

    fn forward_pass(chain: &mut Chain, anchor: Point) {
        let n = chain.joints.len();

        chain.joints[0].position = anchor;

        for i in 1..n {
            let prev_pos = chain.joints[i - 1].position;
            let bone_length = chain.joints[i - 1].length;
            let curr = &mut chain.joints[i];
            curr.position = distance_constrained_position(curr.position, prev_pos, bone_length);
            curr.set_angle(curr.position.bearing_from(prev_pos));
        }

        let next = chain.joints[1].position;
        chain.joints[0].face(next);
    }
}

impl PoseSolver for FabrikSolver {
    fn solve(&self, chain: &mut Chain, goal: Goal) -> SolveResult {
        let n = chain.joints.len();
        if n == 0 {
            return SolveResult::untouched();
        }

        let anchor = goal.anchor.unwrap_or(chain.joints[0].position);
        if n < 2 {
            chain.joints[0].position = anchor;
            chain.joints[0].face(goal.target);
            return SolveResult {
                reached: distance(anchor, goal.target) <= self.tolerance,
                iterations: 0,
                final_distance: distance(anchor, goal.target),
            };
        }

        let max_iterations = self.max_iterations.max(1);
        let mut final_distance = f32::INFINITY;
        let mut iterations = 0;
        while iterations < max_iterations {
            Self::backward_pass(chain, goal.target);
            Self::forward_pass(chain, anchor);
            iterations += 1;

            final_distance = distance(chain.joints[n - 1].position, goal.target);
            if final_distance <= self.tolerance {
                break;
            }
        }

        SolveResult {
            reached: final_distance <= self.tolerance,
            iterations,
            final_distance,
        }
    }

    fn clone_box(&self) -> Box<dyn PoseSolver> {
        Box::new(*self)
    }
}

/// Cyclic coordinate descent. Each iteration turns every joint, tail first,
/// a damped fraction toward the target and re-lays the joints below it, so
/// several calls are needed to converge.
#[derive(Debug, Clone, Copy)]
pub struct CcdSolver {
    pub iterations: u32,
    pub step_fraction: f32,
    pub tolerance: f32,
}

impl Default for CcdSolver {
    fn default() -> Self {
        Self {
            iterations: 1,
            step_fraction: CCD_STEP_FRACTION,
            tolerance: 0.001,
        }
    }
}

impl CcdSolver {
    pub fn new(iterations: u32, step_fraction: f32) -> Self {
        Self {
            iterations,
            step_fraction,
            ..Default::default()
        }
    }

    fn relay_from(chain: &mut Chain, start: usize) {
        for j in start..chain.joints.len() - 1 {
            let end = chain.joints[j].endpoint();
            chain.joints[j + 1].position = end;
        }
    }

    fn iterate(&self, chain: &mut Chain, target: Point) {
        let last = chain.joints.len() - 1;
        for i in (0..=last).rev() {
            let effector = chain.joints[last].endpoint();
            chain.joints[i].rotate_toward(effector, target, self.step_fraction);
            Self::relay_from(chain, i);
        }
    }
}

impl PoseSolver for CcdSolver {
    fn solve(&self, chain: &mut Chain, goal: Goal) -> SolveResult {
        if chain.joints.is_empty() {
            return SolveResult::untouched();
        }

        if let Some(anchor) = goal.anchor {
            chain.joints[0].position = anchor;
            Self::relay_from(chain, 0);
        }

        let mut iterations = 0;
        let mut final_distance = distance(chain.tail().endpoint(), goal.target);
        while iterations < self.iterations && final_distance > self.tolerance {
            self.iterate(chain, goal.target);
            iterations += 1;
            final_distance = distance(chain.tail().endpoint(), goal.target);
        }

        SolveResult {
            reached: final_distance <= self.tolerance,
            iterations,
            final_distance,
        }
    }

    fn clone_box(&self) -> Box<dyn PoseSolver> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::PI;

    fn limb(spacing: f32) -> Chain {
        Chain::builder()
            .profile([20.0, 40.0, 30.0])
            .spacing(spacing)
            .build()
            .unwrap()
    }

    fn spine(len: usize) -> Chain {
        Chain::builder()
            .profile(std::iter::repeat(10.0).take(len))
            .spacing(8.0)
            .origin(Point::new(50.0, 0.0))
            .build()
            .unwrap()
    }

    fn angles_bounded(chain: &Chain) -> bool {
        chain
            .joints()
            .iter()
            .all(|j| j.angle().is_finite() && j.angle() > -PI && j.angle() <= PI)
    }

    #[test]
    fn test_fabrik_compresses_colinearly() {
        let mut chain = limb(10.0);
        let result = FabrikSolver::default().solve(
            &mut chain,
            Goal::anchored(Point::new(15.0, 0.0), Point::ZERO),
        );

        let p = chain.positions().collect::<Vec<_>>();
        assert_eq!(p[0], Point::ZERO);
        assert!((p[0].distance(p[1]) - 10.0).abs() < 1e-4);
        assert!((p[1].distance(p[2]) - 10.0).abs() < 1e-4);
        for q in &p {
            assert!(q.y.abs() < 1e-4);
        }
        assert!(p[1].distance(Point::new(10.0, 0.0)) < 1e-4);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_fabrik_sets_angles_along_segments() {
        let mut chain = limb(10.0);
        FabrikSolver::default().solve(
            &mut chain,
            Goal::anchored(Point::new(5.0, 12.0), Point::new(0.0, 0.0)),
        );

        let joints = chain.joints();
        let head_bearing = (joints[1].position() - joints[0].position()).angle_of();
        assert!((joints[0].angle() - head_bearing).abs() < 1e-5);
        let bearing = (joints[2].position() - joints[1].position()).angle_of();
        assert!((joints[2].angle() - bearing).abs() < 1e-5);
    }

    #[test]
    fn test_fabrik_uses_current_head_without_anchor() {
        let mut chain = limb(10.0);
        let head = chain.head().position();
        FabrikSolver::default().solve(&mut chain, Goal::toward(Point::new(0.0, 15.0)));
        assert_eq!(chain.head().position(), head);
    }

    #[test]
    fn test_fabrik_random_keeps_rest_lengths() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut chain = limb(40.0);
        let solver = FabrikSolver::default();

        for _ in 0..300 {
            let anchor = Point::new(
                rng.random_range(-200.0..200.0),
                rng.random_range(-200.0..200.0),
            );
            let reach = rng.random_range(0.0..80.0);
            let target = anchor + Vec2::from_angle(rng.random_range(-PI..PI)) * reach;
            solver.solve(&mut chain, Goal::anchored(target, anchor));

            let p = chain.positions().collect::<Vec<_>>();
            assert_eq!(p[0], anchor);
            assert!((p[0].distance(p[1]) - 40.0).abs() < 1e-2);
            assert!((p[1].distance(p[2]) - 40.0).abs() < 1e-2);
            assert!(angles_bounded(&chain));
        }
    }

    #[test]
    fn test_fabrik_iterates_to_tolerance() {
        let mut chain = limb(10.0);
        let solver = FabrikSolver::new(50, 0.01);
        let target = Point::new(12.0, 9.0);
        let result = solver.solve(&mut chain, Goal::anchored(target, Point::ZERO));

        assert!(result.reached);
        assert!(chain.tail().position().distance(target) <= 0.01);
    }

    #[test]
    fn test_fabrik_zero_iterations_still_solves_once() {
        let mut chain = limb(10.0);
        let solver = FabrikSolver {
            max_iterations: 0,
            tolerance: 0.001,
        };
        let anchor = Point::new(100.0, 100.0);
        let result = solver.solve(&mut chain, Goal::anchored(Point::new(110.0, 105.0), anchor));

        assert_eq!(result.iterations, 1);
        assert!(result.final_distance.is_finite());
        assert_eq!(chain.head().position(), anchor);
    }

    #[test]
    fn test_fabrik_coincident_joints_stay_finite() {
        let mut chain = limb(10.0);
        for joint in chain.joints.iter_mut() {
            joint.position = Point::ZERO;
        }
        FabrikSolver::default().solve(&mut chain, Goal::anchored(Point::ZERO, Point::ZERO));

        assert!(chain.positions().all(|p| p.is_finite()));
        assert!(angles_bounded(&chain));
    }

    #[test]
    fn test_chase_snap_places_head_on_target() {
        let mut chain = spine(5);
        let target = Point::new(80.0, 30.0);
        ChaseSolver::new(HeadMode::Snap).solve(&mut chain, Goal::toward(target));

        assert_eq!(chain.head().position(), target);
        assert_eq!(chain.base(), target);
        assert_eq!(chain.heading(), chain.head().angle());
        assert!((chain.heading() - (30.0f32).atan2(30.0)).abs() < 1e-5);
        for w in chain.joints().windows(2) {
            assert!(w[0].position().distance(w[1].position()) <= 8.0 + 1e-3);
        }
    }

    #[test]
    fn test_chase_steer_caps_head_movement() {
        let mut chain = spine(5);
        let start = chain.head().position();
        let solver = ChaseSolver::new(HeadMode::Steer {
            turn_rate: 0.5,
            speed: 3.0,
        });
        solver.solve(&mut chain, Goal::toward(Point::new(550.0, 500.0)));

        assert!((chain.head().position().distance(start) - 3.0).abs() < 1e-4);
        assert!((chain.head().angle() - PI / 8.0).abs() < 1e-5);
        assert_eq!(chain.heading(), chain.head().angle());
        assert_eq!(chain.base(), chain.head().position());
    }

    #[test]
    fn test_chase_steer_holds_when_target_is_near() {
        let mut chain = spine(3);
        let start = chain.head().position();
        ChaseSolver::default().solve(&mut chain, Goal::toward(start + Point::new(4.0, 0.0)));
        assert_eq!(chain.head().position(), start);
    }

    #[test]
    fn test_chase_random_never_stretches() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut chain = spine(15);
        let solver = ChaseSolver::new(HeadMode::Snap);

        for _ in 0..300 {
            let target = Point::new(
                rng.random_range(-300.0..300.0),
                rng.random_range(-300.0..300.0),
            );
            solver.solve(&mut chain, Goal::toward(target));
            for w in chain.joints().windows(2) {
                assert!(w[0].position().distance(w[1].position()) <= 8.0 + 1e-3);
            }
            assert!(chain.positions().all(|p| p.is_finite()));
            assert!(angles_bounded(&chain));
        }
    }

    #[test]
    fn test_chase_coincident_target_is_finite() {
        let mut chain = spine(4);
        let head = chain.head().position();
        ChaseSolver::new(HeadMode::Snap).solve(&mut chain, Goal::toward(head));
        ChaseSolver::default().solve(&mut chain, Goal::toward(head));
        assert!(chain.positions().all(|p| p.is_finite()));
        assert!(angles_bounded(&chain));
    }

    #[test]
    fn test_ccd_keeps_chain_contiguous() {
        let mut chain = limb(10.0);
        let solver = CcdSolver::default();
        solver.solve(&mut chain, Goal::anchored(Point::new(5.0, 20.0), Point::ZERO));

        let joints = chain.joints();
        assert_eq!(joints[0].position(), Point::ZERO);
        for w in joints.windows(2) {
            assert!(w[0].endpoint().distance(w[1].position()) < 1e-4);
        }
        assert!(angles_bounded(&chain));
    }

    #[test]
    fn test_ccd_converges_over_repeated_calls() {
        let mut chain = limb(10.0);
        let solver = CcdSolver::default();
        let goal = Goal::anchored(Point::new(10.0, 15.0), Point::ZERO);

        let first = solver.solve(&mut chain, goal);
        let mut last = first;
        for _ in 0..300 {
            last = solver.solve(&mut chain, goal);
        }

        assert_eq!(first.iterations, 1);
        assert!(last.final_distance < first.final_distance);
        assert!(last.final_distance < 1.0);
    }

    #[test]
    fn test_ccd_single_call_is_partial() {
        let mut chain = limb(10.0);
        let goal = Goal::anchored(Point::new(0.0, 30.0), Point::ZERO);
        let laid = CcdSolver::new(0, CCD_STEP_FRACTION).solve(&mut chain, goal);
        assert_eq!(laid.iterations, 0);

        let result = CcdSolver::default().solve(&mut chain, goal);

        assert_eq!(result.iterations, 1);
        assert!(result.final_distance < laid.final_distance);
        assert!(!result.reached);
    }

    #[test]
    fn test_solvers_are_swappable_behind_trait() {
        let ccd: Box<dyn PoseSolver> = Box::new(CcdSolver::default());
        let solvers: Vec<Box<dyn PoseSolver>> = vec![
            Box::new(ChaseSolver::default()),
            Box::new(FabrikSolver::default()),
            ccd.clone(),
        ];
        for solver in &solvers {
            let mut chain = limb(10.0);
            let count = chain.joint_count();
            solver.solve(&mut chain, Goal::anchored(Point::new(3.0, 4.0), Point::ZERO));
            assert_eq!(chain.joint_count(), count);
            assert!(chain.joints().iter().all(|j| j.length() == 10.0));
        }
    }
}
