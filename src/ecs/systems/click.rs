use glam::Vec2;

use crate::ecs::components::{Body, CatId, Eye, Position, Side};
use crate::feedback::FlashKind;
use crate::session::{FinalScore, Session, Verdict};

/// One cat body under the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatHit {
    pub cat: CatId,
    pub clicked: Side,
    pub verdict: Verdict,
}

/// Everything one accepted click changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Hit cats in id order. Empty on a miss.
    pub hits: Vec<CatHit>,
    pub score_gained: u32,
    pub flash: FlashKind,
    pub clicks_remaining: u32,
    /// Set on the click that spends the last of the budget.
    pub final_score: Option<FinalScore>,
}

/// Test `point` against every cat body independently. Clicking the half
/// that doesn't hold the eyes is correct.
pub fn hit_test(world: &hecs::World, point: Vec2) -> Vec<CatHit> {
    let mut hits: Vec<CatHit> = world
        .query::<(&CatId, &Position, &Body, &Eye)>()
        .iter()
        .filter(|(_, (_, pos, body, _))| body.contains(pos.0, point))
        .map(|(_, (id, pos, _, eye))| {
            let clicked = Side::of_point(point.x, pos.0.x);
            let verdict = if clicked != eye.side() {
                Verdict::Correct
            } else {
                Verdict::WrongSide
            };
            CatHit {
                cat: *id,
                clicked,
                verdict,
            }
        })
        .collect();
    hits.sort_by_key(|h| h.cat);
    hits
}

/// Resolve a canvas-local click against the session. `None` when scoring
/// is closed (before the cats stop, or after the budget is spent).
pub fn handle(world: &hecs::World, session: &mut Session, point: Vec2) -> Option<ClickOutcome> {
    if !session.accepts_clicks() {
        return None;
    }

    let hits = hit_test(world, point);
    let verdicts: Vec<Verdict> = hits.iter().map(|h| h.verdict).collect();
    let (score_gained, final_score) = session.apply_click(&verdicts)?;

    if hits.is_empty() {
        log::info!("Missed! No cat clicked. Score: {}", session.score());
    }
    for hit in &hits {
        match hit.verdict {
            Verdict::Correct => log::info!(
                "Correct! Clicked cat {} on the side without eyes! Score: {}",
                hit.cat.0,
                session.score()
            ),
            Verdict::WrongSide => log::info!(
                "Wrong side! You clicked the eye side of cat {}. Score: {}",
                hit.cat.0,
                session.score()
            ),
        }
    }
    if let Some(fin) = final_score {
        log::info!("Game Over! {fin}");
    }

    Some(ClickOutcome {
        hits,
        score_gained,
        flash: session.flash.map_or(FlashKind::Failure, |f| f.kind),
        clicks_remaining: session.clicks_remaining(),
        final_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat::{self, animation::EyeAnimation};
    use crate::config::GameConfig;
    use crate::ecs::systems::phase;
    use std::time::Duration;

    const BODY: Vec2 = Vec2::new(100.0, 60.0);

    /// Session past the stop event, with exactly the given cats.
    fn scoring(cats: &[(Vec2, Side)]) -> (hecs::World, Session) {
        let cfg = GameConfig {
            num_cats: cats.len() as u32,
            ..GameConfig::default()
        };
        let mut world = hecs::World::new();
        for (i, (pos, side)) in cats.iter().enumerate() {
            cat::spawn_cat(&mut world, i as u32 + 1, *pos, Vec2::ZERO, BODY, *side, EyeAnimation::default());
        }
        let mut session = Session::new(&cfg);
        for ev in session.due_events(Duration::from_secs(5)) {
            match ev {
                crate::session::PhaseEvent::ColorChange => {
                    session.begin_frozen();
                }
                crate::session::PhaseEvent::Stop => {
                    session.begin_scoring();
                }
            }
        }
        (world, session)
    }

    #[test]
    fn clicking_away_from_eyes_scores() {
        let (world, mut session) = scoring(&[(Vec2::new(100.0, 100.0), Side::Right)]);
        let out = handle(&world, &mut session, Vec2::new(60.0, 100.0)).unwrap();
        assert_eq!(out.hits.len(), 1);
        assert_eq!(out.hits[0].clicked, Side::Left);
        assert_eq!(out.score_gained, 1);
        assert_eq!(out.flash, FlashKind::Success);
        assert_eq!(out.clicks_remaining, 0);
        assert_eq!(out.final_score.unwrap().to_string(), "Final Score: 1/1");
        assert!(!session.scoring_active());
    }

    #[test]
    fn clicking_eye_side_scores_nothing() {
        let (world, mut session) = scoring(&[(Vec2::new(100.0, 100.0), Side::Right)]);
        let out = handle(&world, &mut session, Vec2::new(140.0, 100.0)).unwrap();
        assert_eq!(out.hits[0].verdict, Verdict::WrongSide);
        assert_eq!(out.score_gained, 0);
        assert_eq!(out.flash, FlashKind::Failure);
        assert_eq!(out.final_score.unwrap().to_string(), "Final Score: 0/1");
    }

    #[test]
    fn miss_still_spends_a_click() {
        let (world, mut session) = scoring(&[
            (Vec2::new(100.0, 100.0), Side::Right),
            (Vec2::new(400.0, 300.0), Side::Left),
        ]);
        let out = handle(&world, &mut session, Vec2::new(0.0, 0.0)).unwrap();
        assert!(out.hits.is_empty());
        assert_eq!(out.flash, FlashKind::Failure);
        assert_eq!(session.score(), 0);
        assert_eq!(out.clicks_remaining, 1);
        assert_eq!(out.final_score, None);

        // off-canvas points are plain misses too
        let out = handle(&world, &mut session, Vec2::new(-50.0, 9000.0)).unwrap();
        assert!(out.hits.is_empty());
        assert_eq!(out.clicks_remaining, 0);
        assert!(handle(&world, &mut session, Vec2::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn overlapping_cats_both_score() {
        // Click at x=130 is right of cat 1's center and left of cat 2's.
        let (world, mut session) = scoring(&[
            (Vec2::new(100.0, 100.0), Side::Left),
            (Vec2::new(160.0, 110.0), Side::Right),
        ]);
        let out = handle(&world, &mut session, Vec2::new(130.0, 105.0)).unwrap();
        assert_eq!(out.hits.len(), 2);
        assert_eq!(out.score_gained, 2);
        assert_eq!(session.score(), 2);
        assert_eq!(out.clicks_remaining, 1);
    }

    #[test]
    fn ignored_while_cats_move() {
        let cfg = GameConfig {
            num_cats: 1,
            ..GameConfig::default()
        };
        let mut world = hecs::World::new();
        cat::spawn_cat(&mut world, 1, Vec2::new(100.0, 100.0), Vec2::ZERO, BODY, Side::Right, EyeAnimation::default());
        let mut session = Session::new(&cfg);
        let mut rng = fastrand::Rng::with_seed(2);
        phase::update(&mut world, &mut session, Duration::from_millis(4000), &mut rng);

        assert!(handle(&world, &mut session, Vec2::new(60.0, 100.0)).is_none());
        assert_eq!(session.clicks_remaining(), 1);
        assert!(session.flash.is_none());
    }

    #[test]
    fn same_state_same_outcome() {
        let cats = [
            (Vec2::new(100.0, 100.0), Side::Left),
            (Vec2::new(300.0, 200.0), Side::Right),
        ];
        let points = [Vec2::new(120.0, 90.0), Vec2::new(280.0, 220.0), Vec2::new(5.0, 5.0)];
        for p in points {
            let (w1, mut s1) = scoring(&cats);
            let (w2, mut s2) = scoring(&cats);
            assert_eq!(handle(&w1, &mut s1, p), handle(&w2, &mut s2, p));
        }
    }
}
