use glam::Vec2;
use std::time::Duration;

/// Every tunable of a session. `Default` is the classic 10-cat game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Number of cats, which is also the click budget and the max score.
    pub num_cats: u32,
    /// Canvas (window inner) size in pixels.
    pub canvas: Vec2,
    /// Body rectangle size in pixels.
    pub body_size: Vec2,
    /// One eye-sprite frame before scaling.
    pub eye_frame: Vec2,
    pub eye_scale: f32,
    /// Minimum spacing between cats, used by placement and repulsion.
    pub padding: f32,
    /// Vertical gap reserved between the eye marker and the body top.
    pub eye_gap: f32,
    pub placement_attempts: u32,
    /// Delay from session start to the recolor + eye shuffle.
    pub color_change_after: Duration,
    /// Delay from session start to the freeze. Must be after `color_change_after`.
    pub stop_after: Duration,
    /// Repulsion impulse per overlapping neighbor (px/tick).
    pub repulsion_force: f32,
    /// Per-component velocity cap (px/tick).
    pub max_velocity: f32,
    /// Multiplied into velocity every tick.
    pub friction: f32,
    pub flash_ms: f32,
    /// Flash decay per tick, independent of real frame time.
    pub flash_step_ms: f32,
    /// Fixed simulation rate (seconds per tick).
    pub tick_rate: f64,
    /// Seed for the session RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_cats: 10,
            canvas: Vec2::new(1024.0, 768.0),
            body_size: Vec2::new(100.0, 60.0),
            eye_frame: Vec2::new(136.0, 82.0),
            eye_scale: 0.4,
            padding: 20.0,
            eye_gap: 10.0,
            placement_attempts: 50,
            color_change_after: Duration::from_millis(3000),
            stop_after: Duration::from_millis(5000),
            repulsion_force: 0.5,
            max_velocity: 3.0,
            friction: 0.98,
            flash_ms: 300.0,
            flash_step_ms: 16.0,
            tick_rate: 1.0 / 60.0,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults with `SILLYCATS_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup. Invalid values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = parse_var::<u32>(&lookup, "SILLYCATS_CATS") {
            if n == 0 {
                log::warn!("SILLYCATS_CATS must be at least 1, keeping {}", self.num_cats);
            } else {
                self.num_cats = n;
            }
        }
        if let Some(w) = parse_var::<f32>(&lookup, "SILLYCATS_WIDTH") {
            if w >= 1.0 {
                self.canvas.x = w;
            } else {
                log::warn!("SILLYCATS_WIDTH too small ({w}), keeping {}", self.canvas.x);
            }
        }
        if let Some(h) = parse_var::<f32>(&lookup, "SILLYCATS_HEIGHT") {
            if h >= 1.0 {
                self.canvas.y = h;
            } else {
                log::warn!("SILLYCATS_HEIGHT too small ({h}), keeping {}", self.canvas.y);
            }
        }
        if let Some(seed) = parse_var::<u64>(&lookup, "SILLYCATS_SEED") {
            self.seed = Some(seed);
        }
        self
    }

    /// On-screen size of the eye marker.
    pub fn eye_size(&self) -> Vec2 {
        self.eye_frame * self.eye_scale
    }

    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_match_classic_game() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.num_cats, 10);
        assert!(cfg.color_change_after < cfg.stop_after);
        assert!((cfg.eye_size().x - 54.4).abs() < 1e-4);
        assert!((cfg.eye_size().y - 32.8).abs() < 1e-4);
    }

    #[test]
    fn overrides_apply() {
        let cfg = GameConfig::default().with_overrides(lookup(&[
            ("SILLYCATS_CATS", "3"),
            ("SILLYCATS_WIDTH", "640"),
            ("SILLYCATS_SEED", " 42 "),
        ]));
        assert_eq!(cfg.num_cats, 3);
        assert_eq!(cfg.canvas.x, 640.0);
        assert_eq!(cfg.canvas.y, 768.0);
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn invalid_overrides_keep_defaults() {
        let cfg = GameConfig::default().with_overrides(lookup(&[
            ("SILLYCATS_CATS", "0"),
            ("SILLYCATS_HEIGHT", "tall"),
            ("SILLYCATS_SEED", "-1"),
        ]));
        assert_eq!(cfg.num_cats, 10);
        assert_eq!(cfg.canvas.y, 768.0);
        assert_eq!(cfg.seed, None);
    }
}
