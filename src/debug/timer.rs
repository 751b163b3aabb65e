use instant::Instant;

/// Which stage of a frame is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Phase = 0,
    Animation = 1,
    Feedback = 2,
    Movement = 3,
    BuildInstances = 4,
    GpuUpload = 5,
    RenderSubmit = 6,
}

/// Number of timed stages.
pub const PHASE_COUNT: usize = 7;

impl SystemPhase {
    pub const ALL: [SystemPhase; PHASE_COUNT] = [
        Self::Phase,
        Self::Animation,
        Self::Feedback,
        Self::Movement,
        Self::BuildInstances,
        Self::GpuUpload,
        Self::RenderSubmit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Phase => "Timers",
            Self::Animation => "Eyes",
            Self::Feedback => "Flash",
            Self::Movement => "Movement",
            Self::BuildInstances => "Build Inst.",
            Self::GpuUpload => "GPU Upload",
            Self::RenderSubmit => "Render",
        }
    }
}

/// Per-stage timing with exponential moving average smoothing.
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per stage.
    pub durations_us: [f64; PHASE_COUNT],
    /// Timestamp when `begin()` was called.
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; PHASE_COUNT],
            start: Instant::now(),
        }
    }

    /// Call before a stage runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a stage finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.record(phase, elapsed_us);
    }

    fn record(&mut self, phase: SystemPhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    /// Sum of all stage durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_converges_toward_samples() {
        let mut t = SystemTimers::new();
        t.record(SystemPhase::Movement, 100.0);
        assert!((t.durations_us[SystemPhase::Movement as usize] - 10.0).abs() < 1e-9);
        for _ in 0..200 {
            t.record(SystemPhase::Movement, 100.0);
        }
        assert!((t.total_us() - 100.0).abs() < 0.01);
    }

    #[test]
    fn labels_cover_every_stage() {
        for (i, phase) in SystemPhase::ALL.iter().enumerate() {
            assert_eq!(*phase as usize, i);
            assert!(!phase.label().is_empty());
        }
    }
}
