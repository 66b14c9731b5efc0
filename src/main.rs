use lizard_ik::{Creature, Point, PointExt};
use std::process::ExitCode;

const DEFAULT_FRAMES: u32 = 600;
const SCREEN: Point = Point::new(1280.0, 720.0);

/// Stand-in for the pointer: a slow figure-eight across the screen.
fn pointer(frame: u32) -> Point {
    let t = frame as f32 / 120.0;
    let center = SCREEN * 0.5;
    center + Point::new(t.sin() * 450.0, (2.0 * t).sin() * 220.0)
}

fn main() -> ExitCode {
    env_logger::init();

    let frames = match std::env::args().nth(1).map(|arg| arg.parse::<u32>()) {
        None => DEFAULT_FRAMES,
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::error!("Invalid frame count: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut lizard = match Creature::lizard(SCREEN * 0.5) {
        Ok(lizard) => lizard,
        Err(e) => {
            log::error!("Failed to build creature: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut total_steps = 0;
    for frame in 0..frames {
        let target = pointer(frame);
        let report = lizard.step(target);
        if report.any_stepped() {
            log::info!(
                "frame {}: {} feet stepped {:?}",
                frame,
                report.step_count(),
                report.stepped
            );
        }
        total_steps += report.step_count();
        log::trace!("frame {}: head {:.1} from pointer", frame, report.head.final_distance);
    }

    let head = lizard.spine().head();
    println!(
        "{} frames, {} steps, head at ({:.1}, {:.1}) facing {:.2} rad",
        frames,
        total_steps,
        head.position().x,
        head.position().y,
        head.angle()
    );
    for (i, limb) in lizard.limbs().iter().enumerate() {
        let anchor = lizard.spine().joints()[limb.anchor_index()].position();
        println!(
            "limb {} ({:?} {:?}): foot ({:.1}, {:.1}), {:.1} from spine joint {}",
            i,
            limb.region(),
            limb.side(),
            limb.foot().x,
            limb.foot().y,
            (limb.foot() - anchor).magnitude(),
            limb.anchor_index()
        );
    }

    ExitCode::SUCCESS
}
