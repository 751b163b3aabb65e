pub mod click;
pub mod movement;
pub mod phase;
pub mod snapshot;

use std::time::Duration;

use crate::cat::animation::EyeAnimation;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::feedback;
use crate::session::Session;
use movement::MotionParams;
use snapshot::CatSnapshot;

/// Run all simulation systems for one fixed tick.
/// `elapsed` is wall-clock time since the session started.
pub fn tick(
    world: &mut hecs::World,
    session: &mut Session,
    elapsed: Duration,
    dt: f32,
    flash_step_ms: f32,
    motion: &MotionParams,
    rng: &mut fastrand::Rng,
    snapshots: &mut Vec<CatSnapshot>,
    timers: &mut SystemTimers,
) {
    // 1. Phase timers (recolor / stop)
    timers.begin();
    phase::update(world, session, elapsed, rng);
    timers.end(SystemPhase::Phase);

    // 2. Eye animation runs in every phase
    timers.begin();
    for (_, anim) in world.query_mut::<&mut EyeAnimation>() {
        anim.update(dt);
    }
    timers.end(SystemPhase::Animation);

    // 3. Flash decay
    timers.begin();
    feedback::decay(&mut session.flash, flash_step_ms);
    timers.end(SystemPhase::Feedback);

    // 4. Movement integration, only until the cats stop
    timers.begin();
    if session.movement_active() {
        snapshot::rebuild(world, snapshots);
        movement::integrate(world, snapshots, motion);
    } else {
        movement::hold(world);
    }
    timers.end(SystemPhase::Movement);
}
