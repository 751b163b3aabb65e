use std::time::Duration;

use crate::ecs::components::{Body, BodyColor, Eye, Side};
use crate::session::{PhaseEvent, Session};

/// Fire whatever phase timers are due at `elapsed` and apply them to the
/// world. Returns the events that took effect.
pub fn update(
    world: &mut hecs::World,
    session: &mut Session,
    elapsed: Duration,
    rng: &mut fastrand::Rng,
) -> Vec<PhaseEvent> {
    let mut fired = Vec::new();
    for event in session.due_events(elapsed) {
        match event {
            PhaseEvent::ColorChange => {
                if session.begin_frozen() {
                    recolor_and_shuffle(world, rng);
                    log::info!(
                        "Cats turned black and their eyes moved! Click the side without eyes."
                    );
                    fired.push(event);
                }
            }
            PhaseEvent::Stop => {
                if session.begin_scoring() {
                    log::info!("Cats stopped moving! Start clicking.");
                    fired.push(event);
                }
            }
        }
    }
    fired
}

/// Paint every body the frozen color and give every cat a fresh random eye
/// side, independent of the old one.
pub fn recolor_and_shuffle(world: &mut hecs::World, rng: &mut fastrand::Rng) {
    for (_, (body, eye)) in world.query_mut::<(&mut Body, &mut Eye)>() {
        body.color = BodyColor::Frozen;
        eye.set_side(Side::random(rng), body.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat;
    use crate::config::GameConfig;
    use crate::session::Phase;

    fn setup() -> (hecs::World, Session, fastrand::Rng) {
        let cfg = GameConfig::default();
        let mut world = hecs::World::new();
        let mut rng = fastrand::Rng::with_seed(5);
        cat::spawn_cats(&mut world, &cfg, &mut rng);
        (world, Session::new(&cfg), rng)
    }

    fn colors(world: &hecs::World) -> Vec<BodyColor> {
        world.query::<&Body>().iter().map(|(_, b)| b.color).collect()
    }

    #[test]
    fn recolor_then_stop() {
        let (mut world, mut session, mut rng) = setup();

        let ms = Duration::from_millis;
        assert!(update(&mut world, &mut session, ms(1000), &mut rng).is_empty());
        assert!(colors(&world).iter().all(|c| *c == BodyColor::Initial));

        let fired = update(&mut world, &mut session, ms(3016), &mut rng);
        assert_eq!(fired, vec![PhaseEvent::ColorChange]);
        assert!(colors(&world).iter().all(|c| *c == BodyColor::Frozen));
        assert!(session.movement_active());
        assert!(!session.scoring_active());

        let fired = update(&mut world, &mut session, ms(5001), &mut rng);
        assert_eq!(fired, vec![PhaseEvent::Stop]);
        assert!(!session.movement_active());
        assert!(session.scoring_active());
        assert_eq!(session.phase(), Phase::Scoring);

        assert!(update(&mut world, &mut session, ms(90_000), &mut rng).is_empty());
    }

    #[test]
    fn stalled_frame_fires_both_in_order() {
        let (mut world, mut session, mut rng) = setup();
        let fired = update(&mut world, &mut session, Duration::from_secs(8), &mut rng);
        assert_eq!(fired, vec![PhaseEvent::ColorChange, PhaseEvent::Stop]);
        assert_eq!(session.phase(), Phase::Scoring);
    }

    #[test]
    fn shuffle_keeps_offsets_consistent() {
        let (mut world, _, mut rng) = setup();
        recolor_and_shuffle(&mut world, &mut rng);
        for (_, (body, eye)) in world.query::<(&Body, &Eye)>().iter() {
            assert_eq!(eye.offset().x, body.size.x / 4.0 * eye.side().sign());
            assert_eq!(eye.offset().y, -body.size.y / 4.0);
        }
    }

    #[test]
    fn shuffle_is_independent_of_old_side() {
        let cfg = GameConfig {
            num_cats: 200,
            canvas: glam::Vec2::new(4000.0, 4000.0),
            ..GameConfig::default()
        };
        let mut world = hecs::World::new();
        let mut rng = fastrand::Rng::with_seed(9);
        cat::spawn_cats(&mut world, &cfg, &mut rng);
        let before: Vec<Side> = world.query::<&Eye>().iter().map(|(_, e)| e.side()).collect();
        recolor_and_shuffle(&mut world, &mut rng);
        let after: Vec<Side> = world.query::<&Eye>().iter().map(|(_, e)| e.side()).collect();
        let flipped = before.iter().zip(&after).filter(|(a, b)| a != b).count();
        // neither "always flip" nor "never flip"
        assert!(flipped > 40 && flipped < 160, "flipped {flipped}");
    }
}
