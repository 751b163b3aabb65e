use std::time::Duration;

/// Handle to a scheduled one-shot event, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

struct Pending<E> {
    id: u64,
    due: Duration,
    event: E,
}

/// One-shot timers keyed on session time. Events are removed as they fire,
/// so each fires at most once no matter how often `poll` runs.
pub struct Scheduler<E> {
    pending: Vec<Pending<E>>,
    next_id: u64,
    /// Latest time seen by `poll`. New timers are relative to this.
    now: Duration,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
            now: Duration::ZERO,
        }
    }

    /// Fire `event` once, `delay` after the current session time.
    pub fn schedule(&mut self, event: E, delay: Duration) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            event,
        });
        TimerHandle(id)
    }

    /// Drop a timer that hasn't fired. Returns false if it already fired or
    /// was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != handle.0);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.id == handle.0)
    }

    /// Remove and return every event due at `now`, earliest first
    /// (ties in scheduling order). Time never runs backwards.
    pub fn poll(&mut self, now: Duration) -> Vec<E> {
        self.now = self.now.max(now);
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.event).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
