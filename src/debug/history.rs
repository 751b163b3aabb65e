use std::collections::VecDeque;

/// Summary of the frames currently in the history window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub fps: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Rolling window of recent frame times (seconds), oldest first.
pub struct FrameHistory {
    times: VecDeque<f64>,
    capacity: usize,
}

impl FrameHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            times: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a frame time, evicting the oldest once full.
    pub fn push(&mut self, dt: f64) {
        if self.times.len() == self.capacity {
            self.times.pop_front();
        }
        self.times.push_back(dt);
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.iter().copied()
    }

    pub fn stats(&self) -> FrameStats {
        if self.times.is_empty() {
            return FrameStats::default();
        }
        let (sum, min, max) = self
            .times
            .iter()
            .fold((0.0, f64::MAX, 0.0f64), |(s, lo, hi), &t| (s + t, lo.min(t), hi.max(t)));
        let avg = sum / self.times.len() as f64;
        FrameStats {
            fps: if avg > 0.0 { 1.0 / avg } else { 0.0 },
            avg,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest() {
        let mut h = FrameHistory::new(3);
        for t in [0.01, 0.02, 0.03, 0.04] {
            h.push(t);
        }
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![0.02, 0.03, 0.04]);
    }

    #[test]
    fn stats_over_window() {
        let mut h = FrameHistory::new(10);
        assert_eq!(h.stats(), FrameStats::default());
        h.push(0.010);
        h.push(0.030);
        let s = h.stats();
        assert!((s.avg - 0.020).abs() < 1e-12);
        assert!((s.fps - 50.0).abs() < 1e-9);
        assert_eq!(s.min, 0.010);
        assert_eq!(s.max, 0.030);
    }
}
