/// Outcome color of a screen flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Failure,
}

impl FlashKind {
    /// Translucent RGBA packed as u32 (alpha 0.3).
    pub fn rgba(self) -> u32 {
        match self {
            FlashKind::Success => 0x00FF_004D,
            FlashKind::Failure => 0xFF00_004D,
        }
    }
}

/// Full-canvas tint left behind by a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub kind: FlashKind,
    /// Milliseconds left before the flash clears.
    pub remaining_ms: f32,
}

impl Flash {
    pub fn new(kind: FlashKind, duration_ms: f32) -> Self {
        Self {
            kind,
            remaining_ms: duration_ms,
        }
    }
}

/// Step the active flash down by `step_ms`, clearing it once it runs out.
pub fn decay(flash: &mut Option<Flash>, step_ms: f32) {
    if let Some(f) = flash {
        f.remaining_ms -= step_ms;
        if f.remaining_ms <= 0.0 {
            *flash = None;
        }
    }
}
