use glam::Vec2;

/// Body center in canvas pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Previous tick's position: used for render interpolation.
#[derive(Debug, Clone, Copy)]
pub struct PrevPosition(pub Vec2);

/// Velocity in pixels/tick.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// 1-based cat number, used in log lines and to order click hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CatId(pub u32);

/// Body fill. Changes exactly once, when the countdown recolors every cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyColor {
    Initial,
    Frozen,
}

impl BodyColor {
    /// RGBA packed as u32.
    pub fn rgba(self) -> u32 {
        match self {
            BodyColor::Initial => 0xFFA5_00FF, // orange
            BodyColor::Frozen => 0x0000_00FF,  // black
        }
    }
}

/// The cat's rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub size: Vec2,
    pub color: BodyColor,
}

impl Body {
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Inclusive axis-aligned containment test around `center`.
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        let half = self.half_size();
        point.x >= center.x - half.x
            && point.x <= center.x + half.x
            && point.y >= center.y - half.y
            && point.y <= center.y + half.y
    }
}

/// Left or right of a body's vertical center line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        if rng.bool() {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Which side of `center_x` a point falls on. Dead center counts as right.
    pub fn of_point(x: f32, center_x: f32) -> Self {
        if x < center_x {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Eye marker. `offset` is only ever written through `new`/`set_side`,
/// so it always matches `side`.
#[derive(Debug, Clone, Copy)]
pub struct Eye {
    side: Side,
    offset: Vec2,
}

impl Eye {
    pub fn new(side: Side, body_size: Vec2) -> Self {
        Self {
            side,
            offset: Self::offset_for(side, body_size),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_side(&mut self, side: Side, body_size: Vec2) {
        self.side = side;
        self.offset = Self::offset_for(side, body_size);
    }

    /// Where the eye marker sits for a body centered at `body_pos`.
    pub fn position(&self, body_pos: Vec2) -> Vec2 {
        body_pos + self.offset
    }

    /// A quarter body width toward `side`, a quarter body height up.
    fn offset_for(side: Side, body_size: Vec2) -> Vec2 {
        Vec2::new(body_size.x / 4.0 * side.sign(), -body_size.y / 4.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_offset_tracks_side() {
        let size = Vec2::new(100.0, 60.0);
        let mut eye = Eye::new(Side::Right, size);
        assert_eq!(eye.offset(), Vec2::new(25.0, -15.0));
        assert_eq!(eye.position(Vec2::new(100.0, 100.0)), Vec2::new(125.0, 85.0));

        eye.set_side(Side::Left, size);
        assert_eq!(eye.side(), Side::Left);
        assert_eq!(eye.position(Vec2::new(100.0, 100.0)), Vec2::new(75.0, 85.0));
    }

    #[test]
    fn body_contains_edges() {
        let body = Body {
            size: Vec2::new(100.0, 60.0),
            color: BodyColor::Initial,
        };
        let c = Vec2::new(100.0, 100.0);
        assert!(body.contains(c, Vec2::new(50.0, 70.0)));
        assert!(body.contains(c, Vec2::new(150.0, 130.0)));
        assert!(!body.contains(c, Vec2::new(150.1, 100.0)));
        assert!(!body.contains(c, Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn side_of_point_splits_at_center() {
        assert_eq!(Side::of_point(99.9, 100.0), Side::Left);
        assert_eq!(Side::of_point(100.0, 100.0), Side::Right);
    }
}
