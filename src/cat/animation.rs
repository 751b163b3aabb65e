/// Frames in the eye "move" animation.
pub const EYE_FRAMES: u8 = 4;
/// Eye animation speed in frames/second.
const EYE_FRAME_RATE: f32 = 2.0;

/// Animation frame data for a cat's eyes.
#[derive(Debug, Clone, Copy)]
pub struct EyeAnimation {
    pub frame: u8,
    pub elapsed: f32,
}

impl Default for EyeAnimation {
    fn default() -> Self {
        Self {
            frame: 0,
            elapsed: 0.0,
        }
    }
}

impl EyeAnimation {
    /// Start on a random frame so the cats don't blink in unison.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self {
            frame: rng.u8(0..EYE_FRAMES),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds, wrapping around the frame list.
    pub fn update(&mut self, dt: f32) {
        let frame_time = 1.0 / EYE_FRAME_RATE;
        self.elapsed += dt;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            self.frame = (self.frame + 1) % EYE_FRAMES;
        }
    }
}
