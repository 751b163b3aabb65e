pub mod animation;

use glam::Vec2;

use crate::config::GameConfig;
use crate::ecs::components::*;
use animation::EyeAnimation;

/// Rectangle that initial cat centers are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRegion {
    pub min: Vec2,
    pub max: Vec2,
}

impl PlacementRegion {
    /// Canvas inset by the larger of the eye/body half-extents plus padding,
    /// with extra room at the top for the eye marker above the body.
    pub fn for_canvas(canvas: Vec2, body_size: Vec2, eye_size: Vec2, padding: f32, eye_gap: f32) -> Self {
        let half = (eye_size * 0.5).max(body_size * 0.5);
        let top_reserve = eye_size.y * 0.5 + eye_gap;
        let (min_x, max_x) = span(half.x + padding, canvas.x - half.x - padding, canvas.x);
        let (min_y, max_y) = span(
            half.y + padding + top_reserve,
            canvas.y - half.y - padding,
            canvas.y,
        );
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec2 {
        Vec2::new(
            self.min.x + rng.f32() * (self.max.x - self.min.x),
            self.min.y + rng.f32() * (self.max.y - self.min.y),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Empty ranges collapse to the canvas midpoint on that axis.
fn span(lo: f32, hi: f32, extent: f32) -> (f32, f32) {
    if lo <= hi {
        (lo, hi)
    } else {
        (extent * 0.5, extent * 0.5)
    }
}

/// Minimum center distance between two freshly placed cats.
pub fn separation(a: Vec2, b: Vec2, padding: f32) -> f32 {
    let avg_a = (a.x + a.y) * 0.5;
    let avg_b = (b.x + b.y) * 0.5;
    (avg_a + avg_b) * 0.5 + padding
}

/// Rejection-sample `count` centers. After `attempts` rejected draws the
/// last candidate is kept anyway, so this always returns `count` points.
pub fn place(
    rng: &mut fastrand::Rng,
    region: &PlacementRegion,
    count: usize,
    body_size: Vec2,
    padding: f32,
    attempts: u32,
) -> Vec<Vec2> {
    let min_dist = separation(body_size, body_size, padding);
    let mut placed: Vec<Vec2> = Vec::with_capacity(count);

    for i in 0..count {
        let mut candidate = region.sample(rng);
        let mut tries = 1;
        while tries < attempts && placed.iter().any(|p| p.distance(candidate) < min_dist) {
            candidate = region.sample(rng);
            tries += 1;
        }
        if placed.iter().any(|p| p.distance(candidate) < min_dist) {
            log::debug!("Cat {} placed with overlap after {} attempts", i + 1, tries);
        }
        debug_assert!(region.contains(candidate));
        placed.push(candidate);
    }

    placed
}

/// Spawn a single cat. The building block for `spawn_cats` and for tests
/// that need an exact layout.
pub fn spawn_cat(
    world: &mut hecs::World,
    id: u32,
    pos: Vec2,
    vel: Vec2,
    body_size: Vec2,
    side: Side,
    anim: EyeAnimation,
) -> hecs::Entity {
    world.spawn((
        CatId(id),
        Position(pos),
        PrevPosition(pos),
        Velocity(vel),
        Body {
            size: body_size,
            color: BodyColor::Initial,
        },
        Eye::new(side, body_size),
        anim,
    ))
}

/// Spawn the session's cats: non-overlapping (best effort) positions,
/// small random drift, random eye side and eye animation phase.
pub fn spawn_cats(world: &mut hecs::World, config: &GameConfig, rng: &mut fastrand::Rng) {
    let region = PlacementRegion::for_canvas(
        config.canvas,
        config.body_size,
        config.eye_size(),
        config.padding,
        config.eye_gap,
    );
    let positions = place(
        rng,
        &region,
        config.num_cats as usize,
        config.body_size,
        config.padding,
        config.placement_attempts,
    );

    for (i, pos) in positions.into_iter().enumerate() {
        let vel = Vec2::new((rng.f32() - 0.5) * 2.0, (rng.f32() - 0.5) * 2.0);
        let side = Side::random(rng);
        let anim = EyeAnimation::random(rng);
        spawn_cat(world, i as u32 + 1, pos, vel, config.body_size, side, anim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_reserves_room_for_eyes() {
        let cfg = GameConfig::default();
        let r = PlacementRegion::for_canvas(cfg.canvas, cfg.body_size, cfg.eye_size(), 20.0, 10.0);
        assert_eq!(r.min.x, 70.0);
        assert_eq!(r.max.x, 1024.0 - 70.0);
        // 30 half body + 20 pad + 16.4 half eye + 10 gap
        assert!((r.min.y - 76.4).abs() < 1e-4);
        assert_eq!(r.max.y, 768.0 - 50.0);
    }

    #[test]
    fn tiny_canvas_collapses_to_center() {
        let r = PlacementRegion::for_canvas(
            Vec2::new(80.0, 60.0),
            Vec2::new(100.0, 60.0),
            Vec2::new(54.4, 32.8),
            20.0,
            10.0,
        );
        assert_eq!(r.min, Vec2::new(40.0, 30.0));
        assert_eq!(r.max, Vec2::new(40.0, 30.0));
    }

    #[test]
    fn placements_stay_in_region_and_apart() {
        let cfg = GameConfig::default();
        let region = PlacementRegion::for_canvas(cfg.canvas, cfg.body_size, cfg.eye_size(), 20.0, 10.0);
        let min_dist = separation(cfg.body_size, cfg.body_size, cfg.padding);

        for seed in 0..20 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let pts = place(&mut rng, &region, 10, cfg.body_size, cfg.padding, 50);
            assert_eq!(pts.len(), 10);
            for (i, a) in pts.iter().enumerate() {
                assert!(region.contains(*a));
                for b in &pts[i + 1..] {
                    assert!(a.distance(*b) >= min_dist, "seed {seed}: overlap");
                }
            }
        }
    }

    #[test]
    fn crowded_canvas_still_places_everyone() {
        let region = PlacementRegion {
            min: Vec2::new(50.0, 50.0),
            max: Vec2::new(60.0, 60.0),
        };
        let mut rng = fastrand::Rng::with_seed(1);
        let pts = place(&mut rng, &region, 25, Vec2::new(100.0, 60.0), 20.0, 50);
        assert_eq!(pts.len(), 25);
        assert!(pts.iter().all(|p| region.contains(*p)));
    }

    #[test]
    fn spawn_cats_builds_full_entities() {
        let cfg = GameConfig::default();
        let mut world = hecs::World::new();
        let mut rng = fastrand::Rng::with_seed(3);
        spawn_cats(&mut world, &cfg, &mut rng);

        let mut ids = Vec::new();
        for (_, (id, vel, body, eye)) in world.query::<(&CatId, &Velocity, &Body, &Eye)>().iter() {
            ids.push(id.0);
            assert!(vel.0.x.abs() <= 1.0 && vel.0.y.abs() <= 1.0);
            assert_eq!(body.color, BodyColor::Initial);
            assert_eq!(eye.offset().x, 25.0 * eye.side().sign());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<u32>>());
    }
}
