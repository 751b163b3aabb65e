use glam::Vec2;

use super::snapshot::CatSnapshot;
use crate::config::GameConfig;
use crate::ecs::components::{Body, Position, PrevPosition, Velocity};

/// Physics constants for one integration step.
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    pub canvas: Vec2,
    pub padding: f32,
    pub repulsion_force: f32,
    pub max_velocity: f32,
    pub friction: f32,
}

impl MotionParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            canvas: config.canvas,
            padding: config.padding,
            repulsion_force: config.repulsion_force,
            max_velocity: config.max_velocity,
            friction: config.friction,
        }
    }
}

/// Constant-magnitude push away from every neighbor closer than the
/// average body width plus padding.
pub fn repulsion(snapshots: &[CatSnapshot], i: usize, params: &MotionParams) -> Vec2 {
    let me = &snapshots[i];
    let mut push = Vec2::ZERO;
    for (j, other) in snapshots.iter().enumerate() {
        if j == i {
            continue;
        }
        let delta = me.pos - other.pos;
        let dist = delta.length();
        let min_dist = (me.width + other.width) * 0.5 + params.padding;
        if dist > 0.0 && dist < min_dist {
            push += delta / dist * params.repulsion_force;
        }
    }
    push
}

/// Advance every cat one tick: repulsion from the pre-tick snapshot,
/// velocity cap, integrate, friction, wall bounce, clamp to canvas.
pub fn integrate(world: &mut hecs::World, snapshots: &[CatSnapshot], params: &MotionParams) {
    // Forces first, from the snapshot only.
    let pushes: Vec<Vec2> = (0..snapshots.len())
        .map(|i| repulsion(snapshots, i, params))
        .collect();

    let max_v = Vec2::splat(params.max_velocity);
    for (snap, push) in snapshots.iter().zip(pushes) {
        let Ok((pos, prev_pos, vel, body)) = world
            .query_one_mut::<(&mut Position, &mut PrevPosition, &mut Velocity, &Body)>(snap.entity)
        else {
            continue;
        };

        prev_pos.0 = pos.0;

        vel.0 = (vel.0 + push).clamp(-max_v, max_v);

        // Integrate velocity
        pos.0 += vel.0;

        // Apply friction
        vel.0 *= params.friction;

        // Bounce off walls
        let half = body.half_size();
        if pos.0.x <= half.x || pos.0.x >= params.canvas.x - half.x {
            vel.0.x = -vel.0.x;
        }
        if pos.0.y <= half.y || pos.0.y >= params.canvas.y - half.y {
            vel.0.y = -vel.0.y;
        }

        pos.0.x = clamp_axis(pos.0.x, half.x, params.canvas.x - half.x);
        pos.0.y = clamp_axis(pos.0.y, half.y, params.canvas.y - half.y);
    }
}

/// Movement is off: pin interpolation so frozen cats render exactly in place.
pub fn hold(world: &mut hecs::World) {
    for (_, (pos, prev_pos)) in world.query_mut::<(&Position, &mut PrevPosition)>() {
        prev_pos.0 = pos.0;
    }
}

/// Clamp that tolerates a body wider than the canvas (pins to the middle).
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        v.clamp(lo, hi)
    }
}
