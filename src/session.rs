use std::fmt;
use std::time::Duration;

use crate::config::GameConfig;
use crate::feedback::{Flash, FlashKind};
use crate::schedule::{Scheduler, TimerHandle};

/// Timed events scheduled at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Recolor every body and reshuffle the eyes.
    ColorChange,
    /// Freeze the cats and open scoring.
    Stop,
}

/// Where the playthrough is. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Orange cats drifting.
    Moving,
    /// Black cats with reshuffled eyes, still drifting.
    Frozen,
    /// Cats stopped, clicks count.
    Scoring,
    /// Click budget spent.
    Over,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Moving => "Moving",
            Phase::Frozen => "Recolored",
            Phase::Scoring => "Scoring",
            Phase::Over => "Game Over",
        }
    }
}

/// End-of-session result, shown to the player once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub max: u32,
}

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Final Score: {}/{}", self.score, self.max)
    }
}

/// Per-hit verdict, produced by the click system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    WrongSide,
}

/// Counters and flags for one playthrough. Owned by the app and touched
/// only by the tick systems and the click handler.
pub struct Session {
    num_cats: u32,
    score: u32,
    clicks_remaining: u32,
    movement_active: bool,
    scoring_active: bool,
    phase: Phase,
    pub flash: Option<Flash>,
    flash_ms: f32,
    final_score: Option<FinalScore>,
    timers: Scheduler<PhaseEvent>,
    color_timer: TimerHandle,
    stop_timer: TimerHandle,
}

impl Session {
    /// Start a session at time zero, scheduling both phase events.
    pub fn new(config: &GameConfig) -> Self {
        let mut timers = Scheduler::new();
        let color_timer = timers.schedule(PhaseEvent::ColorChange, config.color_change_after);
        let stop_timer = timers.schedule(PhaseEvent::Stop, config.stop_after);
        Self {
            num_cats: config.num_cats,
            score: 0,
            clicks_remaining: config.num_cats,
            movement_active: true,
            scoring_active: false,
            phase: Phase::Moving,
            flash: None,
            flash_ms: config.flash_ms,
            final_score: None,
            timers,
            color_timer,
            stop_timer,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn clicks_remaining(&self) -> u32 {
        self.clicks_remaining
    }

    pub fn num_cats(&self) -> u32 {
        self.num_cats
    }

    pub fn movement_active(&self) -> bool {
        self.movement_active
    }

    pub fn scoring_active(&self) -> bool {
        self.scoring_active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn final_score(&self) -> Option<FinalScore> {
        self.final_score
    }

    /// Phase events due at `elapsed` since session start, in firing order.
    pub fn due_events(&mut self, elapsed: Duration) -> Vec<PhaseEvent> {
        self.timers.poll(elapsed)
    }

    /// Cancel the pending phase timers. Used when the app shuts down early.
    pub fn cancel_timers(&mut self) {
        let mut cancelled = 0;
        for handle in [self.color_timer, self.stop_timer] {
            if self.timers.is_pending(handle) && self.timers.cancel(handle) {
                cancelled += 1;
            }
        }
        log::debug!(
            "Cancelled {} phase timer(s), {} left",
            cancelled,
            self.timers.len()
        );
    }

    /// Record the recolor. Returns false if it already happened.
    pub fn begin_frozen(&mut self) -> bool {
        if self.phase != Phase::Moving {
            return false;
        }
        self.phase = Phase::Frozen;
        true
    }

    /// Stop movement and open scoring. Returns false unless the recolor has
    /// happened and the stop hasn't.
    pub fn begin_scoring(&mut self) -> bool {
        if self.phase != Phase::Frozen {
            return false;
        }
        self.movement_active = false;
        if self.clicks_remaining > 0 {
            self.phase = Phase::Scoring;
            self.scoring_active = true;
        } else {
            self.end();
        }
        true
    }

    /// Whether a click should be evaluated at all.
    pub fn accepts_clicks(&self) -> bool {
        self.scoring_active && self.clicks_remaining > 0
    }

    /// Apply one evaluated click: per-hit verdicts in cat order (empty for a
    /// miss). Returns the score gained and the session result if this click
    /// used up the budget. No-op when clicks aren't accepted.
    pub fn apply_click(&mut self, verdicts: &[Verdict]) -> Option<(u32, Option<FinalScore>)> {
        if !self.accepts_clicks() {
            return None;
        }

        let gained = verdicts.iter().filter(|v| **v == Verdict::Correct).count() as u32;
        self.score += gained;

        let flash_kind = match verdicts.last() {
            Some(Verdict::Correct) => FlashKind::Success,
            Some(Verdict::WrongSide) | None => FlashKind::Failure,
        };
        self.flash = Some(Flash::new(flash_kind, self.flash_ms));

        self.clicks_remaining -= 1;
        if self.clicks_remaining == 0 {
            self.end();
        }
        Some((gained, self.final_score))
    }

    fn end(&mut self) {
        self.scoring_active = false;
        self.phase = Phase::Over;
        self.final_score = Some(FinalScore {
            score: self.score,
            max: self.num_cats,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n: u32) -> GameConfig {
        GameConfig {
            num_cats: n,
            ..GameConfig::default()
        }
    }

    fn started(n: u32) -> Session {
        let mut s = Session::new(&config(n));
        for ev in s.due_events(Duration::from_secs(5)) {
            match ev {
                PhaseEvent::ColorChange => assert!(s.begin_frozen()),
                PhaseEvent::Stop => assert!(s.begin_scoring()),
            }
        }
        s
    }

    #[test]
    fn starts_moving_without_scoring() {
        let s = Session::new(&config(10));
        assert_eq!(s.phase(), Phase::Moving);
        assert!(s.movement_active());
        assert!(!s.scoring_active());
        assert_eq!(s.clicks_remaining(), 10);
    }

    #[test]
    fn timers_fire_in_order_exactly_once() {
        let mut s = Session::new(&config(10));
        assert!(s.due_events(Duration::from_millis(2999)).is_empty());
        assert_eq!(s.due_events(Duration::from_millis(3000)), vec![PhaseEvent::ColorChange]);
        assert!(s.due_events(Duration::from_millis(4999)).is_empty());
        assert_eq!(s.due_events(Duration::from_millis(5000)), vec![PhaseEvent::Stop]);
        assert!(s.due_events(Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn transitions_only_go_forward() {
        let mut s = Session::new(&config(10));
        assert!(!s.begin_scoring());
        assert!(s.begin_frozen());
        assert!(!s.begin_frozen());
        assert!(s.movement_active());
        assert!(s.begin_scoring());
        assert!(!s.begin_scoring());
        assert!(!s.movement_active());
        assert!(s.scoring_active());
    }

    #[test]
    fn clicks_ignored_before_scoring() {
        let mut s = Session::new(&config(3));
        assert_eq!(s.apply_click(&[Verdict::Correct]), None);
        assert_eq!(s.score(), 0);
        assert_eq!(s.clicks_remaining(), 3);
        assert!(s.flash.is_none());
    }

    #[test]
    fn budget_runs_out_exactly_once() {
        let mut s = started(2);
        assert_eq!(s.apply_click(&[]), Some((0, None)));
        assert_eq!(s.flash.map(|f| f.kind), Some(FlashKind::Failure));
        assert_eq!(s.clicks_remaining(), 1);

        let fin = FinalScore { score: 1, max: 2 };
        assert_eq!(s.apply_click(&[Verdict::Correct]), Some((1, Some(fin))));
        assert_eq!(s.flash.map(|f| f.kind), Some(FlashKind::Success));
        assert_eq!(s.phase(), Phase::Over);
        assert!(!s.scoring_active());

        assert_eq!(s.apply_click(&[Verdict::Correct]), None);
        assert_eq!(s.clicks_remaining(), 0);
        assert_eq!(s.score(), 1);
        assert_eq!(s.final_score().map(|f| f.to_string()), Some("Final Score: 1/2".into()));
    }

    #[test]
    fn last_verdict_picks_flash() {
        let mut s = started(3);
        s.apply_click(&[Verdict::Correct, Verdict::WrongSide]);
        assert_eq!(s.score(), 1);
        assert_eq!(s.flash.map(|f| f.kind), Some(FlashKind::Failure));
        s.apply_click(&[Verdict::WrongSide, Verdict::Correct]);
        assert_eq!(s.flash.map(|f| f.kind), Some(FlashKind::Success));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut s = Session::new(&config(1));
        s.cancel_timers();
        assert!(s.due_events(Duration::from_secs(60)).is_empty());
        assert_eq!(s.phase(), Phase::Moving);
    }
}
