use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::cat::animation::EyeAnimation;
use crate::ecs::components::{Body, Eye, Position, PrevPosition};
use crate::feedback::Flash;

/// Shader frame index for a flat rectangle (bodies, flash overlay).
pub const FRAME_SOLID: u32 = 0;
/// Shader frame index of eye animation frame 0; frames 1..=4 are eyes.
pub const FRAME_EYES: u32 = 1;

/// Per-instance data uploaded to GPU each frame.
/// Stride = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct CatInstance {
    /// Center in canvas pixels.
    pub position: [f32; 2],
    /// Quad size in pixels.
    pub size: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// What the fragment shader draws (see `FRAME_*`).
    pub frame: u32,
}

/// Lerp between previous and current position for smooth rendering.
pub fn interpolate(pos: &Position, prev_pos: &PrevPosition, alpha: f32) -> Vec2 {
    Vec2::lerp(prev_pos.0, pos.0, alpha)
}

impl CatInstance {
    pub fn body(center: Vec2, body: &Body) -> Self {
        Self {
            position: center.into(),
            size: body.size.into(),
            color: body.color.rgba(),
            frame: FRAME_SOLID,
        }
    }

    /// Eye marker for a body drawn at `center`.
    pub fn eye(center: Vec2, eye: &Eye, anim: &EyeAnimation, eye_size: Vec2) -> Self {
        Self {
            position: eye.position(center).into(),
            size: eye_size.into(),
            color: 0xFFFF_FFFF,
            frame: FRAME_EYES + anim.frame as u32,
        }
    }

    /// Translucent tint over the whole canvas.
    pub fn flash(flash: &Flash, canvas: Vec2) -> Self {
        Self {
            position: (canvas * 0.5).into(),
            size: canvas.into(),
            color: flash.kind.rgba(),
            frame: FRAME_SOLID,
        }
    }
}

/// Fill `out` in draw order: bodies, eyes on top, then the flash overlay.
pub fn build(
    world: &hecs::World,
    flash: Option<&Flash>,
    canvas: Vec2,
    eye_size: Vec2,
    alpha: f32,
    out: &mut Vec<CatInstance>,
) {
    out.clear();

    let mut query = world.query::<(&Position, &PrevPosition, &Body, &Eye, &EyeAnimation)>();
    let cats: Vec<_> = query.iter().map(|(_, c)| c).collect();

    for &(pos, prev_pos, body, _, _) in &cats {
        out.push(CatInstance::body(interpolate(pos, prev_pos, alpha), body));
    }
    for &(pos, prev_pos, _, eye, anim) in &cats {
        out.push(CatInstance::eye(interpolate(pos, prev_pos, alpha), eye, anim, eye_size));
    }

    if let Some(flash) = flash {
        out.push(CatInstance::flash(flash, canvas));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat;
    use crate::ecs::components::{BodyColor, Side};
    use crate::feedback::FlashKind;

    const EYE: Vec2 = Vec2::new(54.4, 32.8);

    #[test]
    fn instance_stride_matches_pipeline() {
        assert_eq!(std::mem::size_of::<CatInstance>(), 24);
    }

    #[test]
    fn bodies_then_eyes_then_flash() {
        let mut world = hecs::World::new();
        let body = Vec2::new(100.0, 60.0);
        let anim = EyeAnimation { frame: 2, elapsed: 0.0 };
        cat::spawn_cat(&mut world, 1, Vec2::new(100.0, 100.0), Vec2::ZERO, body, Side::Right, anim);
        cat::spawn_cat(&mut world, 2, Vec2::new(300.0, 200.0), Vec2::ZERO, body, Side::Left, anim);

        let flash = Flash::new(FlashKind::Success, 300.0);
        let canvas = Vec2::new(800.0, 600.0);
        let mut out = Vec::new();
        build(&world, Some(&flash), canvas, EYE, 1.0, &mut out);

        assert_eq!(out.len(), 5);
        assert!(out[..2].iter().all(|i| i.frame == FRAME_SOLID && i.color == BodyColor::Initial.rgba()));
        assert!(out[2..4].iter().all(|i| i.frame == FRAME_EYES + 2));
        assert_eq!(out[4].size, [800.0, 600.0]);
        assert_eq!(out[4].color, FlashKind::Success.rgba());

        // each eye sits at its body plus offset
        for (b, e) in out[..2].iter().zip(&out[2..4]) {
            let dx = e.position[0] - b.position[0];
            assert_eq!(dx.abs(), 25.0);
            assert_eq!(e.position[1] - b.position[1], -15.0);
        }
    }

    #[test]
    fn interpolates_between_ticks() {
        let p = interpolate(
            &Position(Vec2::new(10.0, 20.0)),
            &PrevPosition(Vec2::new(0.0, 0.0)),
            0.5,
        );
        assert_eq!(p, Vec2::new(5.0, 10.0));
    }
}
